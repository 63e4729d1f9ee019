use crate::config::{Config, ConfigManager};
use crate::models::{TodoDocument, TodoList};
use crate::storage::{JsonStorage, MemoryStorage};
use crate::store::TodoStore;
use std::sync::Arc;
use tempfile::TempDir;

fn test_dir() -> TempDir {
    tempfile::Builder::new()
        .prefix("todo_lists_test")
        .tempdir()
        .expect("Failed to create temporary directory")
}

/// Creates a store backed by `data.json` inside a fresh temporary directory.
/// The document itself is not created until the first write.
pub fn create_test_store() -> (TodoStore, TempDir) {
    let temp_dir = test_dir();
    let config = Config {
        storage_path: Some(
            temp_dir
                .path()
                .join("data.json")
                .to_str()
                .unwrap()
                .to_string(),
        ),
        ..Default::default()
    };

    let storage = JsonStorage::new(&config).expect("Failed to create test storage");
    (TodoStore::new(Box::new(storage)), temp_dir)
}

/// Creates an in-memory store holding `lists` empty lists named `List 0`,
/// `List 1`, ... The returned handle observes writes made through the store.
pub fn seeded_memory_store(lists: usize) -> (TodoStore, Arc<MemoryStorage>) {
    let document = TodoDocument {
        todo_lists: (0..lists)
            .map(|i| TodoList::new(&format!("List {}", i), "Other", "").unwrap())
            .collect(),
        ..Default::default()
    };
    let storage = Arc::new(MemoryStorage::with_document(document));
    (TodoStore::new(Box::new(Arc::clone(&storage))), storage)
}

/// Creates a configuration manager whose config file and data file both live
/// in a temporary directory, so tests never touch the user's real files.
pub fn create_test_config_manager() -> (ConfigManager, TempDir) {
    let temp_dir = test_dir();
    let config_path = temp_dir.path().join("config.json");
    let mut manager =
        ConfigManager::new(Some(&config_path)).expect("Failed to create config manager");

    let storage_path = temp_dir.path().join("test-data.json");
    manager
        .set("storage.path", storage_path.to_str().unwrap())
        .expect("Failed to set storage.path");

    (manager, temp_dir)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_initialization() {
        let (store, temp_dir) = create_test_store();
        assert!(store.load().unwrap().is_empty());
        assert!(!temp_dir.path().join("data.json").exists());
    }

    #[test]
    fn test_seeded_memory_store() {
        let (store, storage) = seeded_memory_store(2);
        let lists = store.load().unwrap();
        assert_eq!(lists.len(), 2);
        assert_eq!(lists[1].name, "List 1");
        assert_eq!(storage.save_count(), 0);
    }

    #[test]
    fn test_config_manager() {
        let (manager, _temp_dir) = create_test_config_manager();

        let storage_path = manager.get("storage.path").expect("Storage path not set");
        assert!(storage_path.contains("todo_lists_test"));

        let store = manager.create_store().unwrap();
        assert!(store.load().unwrap().is_empty());
    }
}
