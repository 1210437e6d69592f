use std::collections::HashMap;

use crate::config::BoardConfig;
use crate::core::models::{ColumnId, StoredTask, Task, TaskId};
use crate::core::services::StorageBackend;
use crate::error::{BoardError, StorageError};

/// All tasks of the board, mirrored to one storage slot on every mutation.
pub struct TaskStore {
    tasks: HashMap<TaskId, Task>,
    storage: Box<dyn StorageBackend>,
    key: String,
    reset_on_first_load: bool,
    loaded_once: bool,
}

impl TaskStore {
    /// Empty store over `storage`; call [`TaskStore::load`] to read the slot.
    pub fn new(storage: Box<dyn StorageBackend>, config: &BoardConfig) -> Self {
        Self {
            tasks: HashMap::new(),
            storage,
            key: config.storage_key.clone(),
            reset_on_first_load: config.reset_on_first_load,
            loaded_once: false,
        }
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn get(&self, id: &TaskId) -> Option<&Task> {
        self.tasks.get(id)
    }

    /// Tasks in creation order; ids start with their creation timestamp.
    pub fn tasks_in_creation_order(&self) -> Vec<Task> {
        let mut tasks: Vec<Task> = self.tasks.values().cloned().collect();
        tasks.sort_by(|a, b| a.id.cmp(&b.id));
        tasks
    }

    pub fn add_task(&mut self, text: &str) -> Result<TaskId, BoardError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(BoardError::EmptyTask);
        }

        let task = Task::new(text.to_string());
        let id = task.id.clone();
        self.tasks.insert(id.clone(), task);
        // An unsaved task is dropped again so memory matches the slot
        if let Err(e) = self.persist() {
            self.tasks.remove(&id);
            return Err(e);
        }

        log::info!("Added task {}", id);
        Ok(id)
    }

    pub fn move_task(&mut self, id: &TaskId, target: ColumnId) -> Result<(), BoardError> {
        let task = self
            .tasks
            .get_mut(id)
            .ok_or_else(|| BoardError::UnknownTask(id.clone()))?;
        task.update_column(target);
        self.persist()?;

        log::info!("Moved task {} to {}", id, target);
        Ok(())
    }

    /// Replaces the in-memory map with the persisted slot. Records pointing
    /// at unknown columns are moved to the default column and the corrected
    /// map is written back straight away.
    pub fn load(&mut self) -> Result<(), BoardError> {
        let first_load = !self.loaded_once;
        self.loaded_once = true;

        let Some(raw) = self.storage.get(&self.key)? else {
            self.tasks.clear();
            return Ok(());
        };

        if first_load && self.reset_on_first_load {
            log::info!("Discarding persisted tasks on first load");
            self.tasks.clear();
            self.persist()?;
            return Ok(());
        }

        let stored: HashMap<String, StoredTask> =
            serde_json::from_str(&raw).map_err(StorageError::from)?;

        let mut normalized = 0usize;
        self.tasks = stored
            .into_iter()
            .map(|(id, record)| {
                let column = ColumnId::from_key(&record.column).unwrap_or_else(|| {
                    log::warn!(
                        "Task {} referenced unknown column `{}`, moving it to {}",
                        id,
                        record.column,
                        ColumnId::DEFAULT
                    );
                    normalized += 1;
                    ColumnId::DEFAULT
                });
                let id = TaskId::from(id);
                let task = Task {
                    id: id.clone(),
                    text: record.text,
                    column,
                };
                (id, task)
            })
            .collect();

        if normalized > 0 {
            self.persist()?;
        }

        log::info!("Loaded {} tasks ({} normalized)", self.tasks.len(), normalized);
        Ok(())
    }

    /// Overwrites the slot with the full map.
    pub fn persist(&self) -> Result<(), BoardError> {
        let stored: HashMap<&str, StoredTask> = self
            .tasks
            .iter()
            .map(|(id, task)| (id.as_str(), StoredTask::from(task)))
            .collect();
        let json = serde_json::to_string(&stored).map_err(StorageError::from)?;
        self.storage.set(&self.key, &json)?;
        Ok(())
    }
}
