pub mod kanban;

pub use kanban::Kanban;
