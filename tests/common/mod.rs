#![allow(dead_code)]

use std::{
    path::PathBuf,
    sync::{Arc, Mutex},
};

use once_cell::sync::Lazy;
use propflow_core::{
    config::ConfigManager,
    storage::{JsonStorage, KeyValueStore},
};
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// Unique application root for one test.
pub fn test_home() -> PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    base
}

/// File-backed storage and config rooted in a fresh directory.
pub fn setup_test_env() -> (Arc<dyn KeyValueStore>, ConfigManager, PathBuf) {
    let base = test_home();
    let storage: Arc<dyn KeyValueStore> =
        Arc::new(JsonStorage::new(Some(base.clone())).expect("create json storage backend"));
    let config_manager =
        ConfigManager::with_base_dir(base.clone()).expect("create config manager for temp dir");
    (storage, config_manager, base)
}
