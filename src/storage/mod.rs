//! Key-value persistence standing in for the browser's per-origin local storage.

pub mod json_backend;
pub mod memory;

use crate::errors::PropFlowError;

pub type Result<T> = std::result::Result<T, PropFlowError>;

/// Well-known keys written by the dashboard.
pub mod keys {
    pub const SELECTED_FIRMS: &str = "propflow-selected-firms";
    pub const USER_PLAN: &str = "propflow-user-plan";
    pub const USER: &str = "propflow-user";
    pub const ACCESS_TOKEN: &str = "propflow-access-token";
    pub const BANK_CONNECTED: &str = "propflow-plaid-connected";
}

/// String-to-string storage with whole-store clearing.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
    fn clear(&self) -> Result<()>;

    fn contains(&self, key: &str) -> Result<bool> {
        Ok(self.get(key)?.is_some())
    }
}

pub use json_backend::JsonStorage;
pub use memory::MemoryStorage;
