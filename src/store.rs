//! The to-do store: every operation loads the whole document, validates its
//! inputs, applies one mutation and writes the whole document back.
//!
//! Lists and tasks are addressed by their position. Deleting an entry shifts
//! every later entry down by one, so callers holding indices across a delete
//! must refresh them.

use crate::models::{Task, TodoDocument, TodoList, ValidationError};
use crate::storage::{Storage, StorageError};
use std::sync::{Mutex, MutexGuard};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("List not found: {list}")]
    ListNotFound { list: usize },
    #[error("Task not found: {task} in list {list}")]
    TaskNotFound { list: usize, task: usize },
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Coarse classification of a `StoreError` for the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A required field was empty. Nothing was written.
    Validation,
    /// A list or task index does not exist. Nothing was written.
    NotFound,
    /// The backing document could not be read or written.
    Storage,
}

impl StoreError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            StoreError::Validation(_) => ErrorKind::Validation,
            StoreError::ListNotFound { .. } | StoreError::TaskNotFound { .. } => {
                ErrorKind::NotFound
            }
            StoreError::Storage(_) => ErrorKind::Storage,
        }
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

pub struct TodoStore {
    storage: Box<dyn Storage>,
    // Held across the full load-mutate-write cycle of each operation.
    lock: Mutex<()>,
}

impl TodoStore {
    pub fn new(storage: Box<dyn Storage>) -> Self {
        Self {
            storage,
            lock: Mutex::new(()),
        }
    }

    fn acquire(&self) -> StoreResult<MutexGuard<'_, ()>> {
        self.lock.lock().map_err(|e| {
            StoreError::Storage(StorageError::Storage(format!(
                "Failed to lock store: {}",
                e
            )))
        })
    }

    pub fn load(&self) -> StoreResult<Vec<TodoList>> {
        let _guard = self.acquire()?;
        Ok(self.storage.load()?.todo_lists)
    }

    pub fn get_list(&self, index: usize) -> StoreResult<TodoList> {
        let _guard = self.acquire()?;
        let mut data = self.storage.load()?;
        if index >= data.todo_lists.len() {
            return Err(StoreError::ListNotFound { list: index });
        }
        Ok(data.todo_lists.swap_remove(index))
    }

    /// Appends a new, empty list and returns its index.
    pub fn create_list(&self, name: &str, category: &str, description: &str) -> StoreResult<usize> {
        let list = TodoList::new(name, category, description)?;
        let _guard = self.acquire()?;
        let mut data = self.storage.load()?;

        data.todo_lists.push(list);
        let index = data.todo_lists.len() - 1;
        self.storage.save(&data)?;

        info!(index, name, category, "created list");
        Ok(index)
    }

    /// Removes the list at `index`. An index out of bounds is ignored and
    /// leaves the document untouched; the return value says whether a list
    /// was removed.
    pub fn delete_list(&self, index: usize) -> StoreResult<bool> {
        let _guard = self.acquire()?;
        let mut data = self.storage.load()?;
        if index >= data.todo_lists.len() {
            debug!(index, "delete of missing list ignored");
            return Ok(false);
        }

        let removed = data.todo_lists.remove(index);
        self.storage.save(&data)?;

        info!(index, name = %removed.name, "deleted list");
        Ok(true)
    }

    /// Appends a task to the list and returns the task's index.
    pub fn add_task(&self, list_index: usize, text: &str) -> StoreResult<usize> {
        let task = Task::new(text)?;
        self.mutate(|data| {
            let list = list_mut(data, list_index)?;
            list.tasks.push(task);
            Ok(list.tasks.len() - 1)
        })
        .inspect(|task_index| debug!(list_index, task_index, "added task"))
    }

    pub fn set_task_completed(
        &self,
        list_index: usize,
        task_index: usize,
        completed: bool,
    ) -> StoreResult<()> {
        self.mutate(|data| {
            task_mut(data, list_index, task_index)?.completed = completed;
            Ok(())
        })?;
        debug!(list_index, task_index, completed, "set task completion");
        Ok(())
    }

    /// Flips the task's completion flag and returns the new value.
    pub fn toggle_task(&self, list_index: usize, task_index: usize) -> StoreResult<bool> {
        self.mutate(|data| {
            let task = task_mut(data, list_index, task_index)?;
            task.completed = !task.completed;
            Ok(task.completed)
        })
    }

    pub fn set_task_text(
        &self,
        list_index: usize,
        task_index: usize,
        text: &str,
    ) -> StoreResult<()> {
        self.mutate(|data| {
            task_mut(data, list_index, task_index)?.update_text(text)?;
            Ok(())
        })?;
        debug!(list_index, task_index, "updated task text");
        Ok(())
    }

    pub fn delete_task(&self, list_index: usize, task_index: usize) -> StoreResult<()> {
        self.mutate(|data| {
            let list = list_mut(data, list_index)?;
            if task_index >= list.tasks.len() {
                return Err(StoreError::TaskNotFound {
                    list: list_index,
                    task: task_index,
                });
            }
            list.tasks.remove(task_index);
            Ok(())
        })?;
        debug!(list_index, task_index, "deleted task");
        Ok(())
    }

    /// Runs one load-mutate-write cycle under the store lock. The document is
    /// written only when `apply` succeeds.
    fn mutate<T, F>(&self, apply: F) -> StoreResult<T>
    where
        F: FnOnce(&mut TodoDocument) -> StoreResult<T>,
    {
        let _guard = self.acquire()?;
        let mut data = self.storage.load()?;
        let result = apply(&mut data)?;
        self.storage.save(&data)?;
        Ok(result)
    }
}

fn list_mut(data: &mut TodoDocument, list_index: usize) -> StoreResult<&mut TodoList> {
    data.todo_lists
        .get_mut(list_index)
        .ok_or(StoreError::ListNotFound { list: list_index })
}

fn task_mut(
    data: &mut TodoDocument,
    list_index: usize,
    task_index: usize,
) -> StoreResult<&mut Task> {
    list_mut(data, list_index)?
        .tasks
        .get_mut(task_index)
        .ok_or(StoreError::TaskNotFound {
            list: list_index,
            task: task_index,
        })
}
