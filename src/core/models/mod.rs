pub mod column;
pub mod task;

pub use column::ColumnId;
pub use task::{StoredTask, Task, TaskId};
