pub mod celebration;
pub mod kanban;
