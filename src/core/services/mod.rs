pub mod random;
pub mod scheduler;
pub mod storage;
#[cfg(test)]
pub mod testing;

pub use random::*;
pub use scheduler::*;
pub use storage::*;
