pub mod card_renderer;
pub mod drag_drop;
pub mod task_operations;
pub mod task_store;

pub use card_renderer::{CardRenderer, CardView};
pub use drag_drop::{DragDropController, DropRequest};
pub use task_operations::{BoardServices, DropOutcome, KanbanBoard};
pub use task_store::TaskStore;
