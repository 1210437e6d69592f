use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::ColumnId;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(transparent)]
pub struct TaskId(String);

impl TaskId {
    /// `task_<unix millis>_<9 random chars>`; the suffix keeps ids created
    /// within the same millisecond apart.
    pub fn generate() -> Self {
        let suffix = Uuid::new_v4().simple().to_string();
        TaskId(format!("task_{}_{}", Utc::now().timestamp_millis(), &suffix[..9]))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for TaskId {
    fn from(value: &str) -> Self {
        TaskId(value.to_string())
    }
}

impl From<String> for TaskId {
    fn from(value: String) -> Self {
        TaskId(value)
    }
}

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    pub id: TaskId,
    pub text: String,
    pub column: ColumnId,
}

impl Task {
    /// Fresh task in the default column. `text` is expected to be trimmed
    /// and non-empty already.
    pub fn new(text: String) -> Self {
        Self {
            id: TaskId::generate(),
            text,
            column: ColumnId::DEFAULT,
        }
    }

    pub fn update_column(&mut self, column: ColumnId) {
        self.column = column;
    }
}

/// Shape of one record inside the persisted slot. `column` stays a raw
/// string so unknown columns survive deserialization and can be normalized.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StoredTask {
    pub text: String,
    pub column: String,
}

impl From<&Task> for StoredTask {
    fn from(task: &Task) -> Self {
        Self {
            text: task.text.clone(),
            column: task.column.key().to_string(),
        }
    }
}
