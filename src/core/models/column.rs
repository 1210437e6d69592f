use serde::{Deserialize, Serialize};

/// Columns declared by the board layout, in display order.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ColumnId {
    Todo,
    Done,
}

impl ColumnId {
    /// Column new and corrupted tasks land in.
    pub const DEFAULT: ColumnId = ColumnId::Todo;

    /// Column whose entry fires the celebration.
    pub const TERMINAL: ColumnId = ColumnId::Done;

    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnId::Todo => "To Do",
            ColumnId::Done => "Done",
        }
    }

    /// Key used for the persisted `column` field and the element id.
    pub fn key(&self) -> &'static str {
        match self {
            ColumnId::Todo => "todo",
            ColumnId::Done => "done",
        }
    }

    pub fn from_key(key: &str) -> Option<ColumnId> {
        Self::all().into_iter().find(|column| column.key() == key)
    }

    pub fn empty_message(&self) -> &'static str {
        match self {
            ColumnId::Todo => "No tasks yet. Add one above!",
            ColumnId::Done => "Drag finished tasks here",
        }
    }

    pub fn is_terminal(&self) -> bool {
        *self == Self::TERMINAL
    }

    pub fn all() -> Vec<ColumnId> {
        vec![ColumnId::Todo, ColumnId::Done]
    }
}

impl std::fmt::Display for ColumnId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}
