use crate::core::models::TaskId;

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("local storage is not available: {0}")]
    Unavailable(String),

    #[error("failed to read `{key}`: {reason}")]
    Read { key: String, reason: String },

    #[error("failed to write `{key}`: {reason}")]
    Write { key: String, reason: String },

    #[error("stored tasks are not valid JSON: {0}")]
    Corrupt(#[from] serde_json::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum BoardError {
    #[error("task text must not be empty")]
    EmptyTask,

    #[error("no task with id {0}")]
    UnknownTask(TaskId),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl BoardError {
    /// Errors the board recovers from locally; anything else is a storage
    /// failure the caller can only report.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, BoardError::Storage(_))
    }
}
