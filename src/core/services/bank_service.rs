use crate::core::services::ServiceResult;
use crate::storage::{keys, KeyValueStore};

const CONNECTED: &str = "true";

/// Demo bank link. Only a flag is stored; no account data is fetched.
pub struct BankService;

impl BankService {
    pub fn is_connected(storage: &dyn KeyValueStore) -> ServiceResult<bool> {
        Ok(storage.get(keys::BANK_CONNECTED)?.as_deref() == Some(CONNECTED))
    }

    pub fn connect(storage: &dyn KeyValueStore) -> ServiceResult<()> {
        storage.set(keys::BANK_CONNECTED, CONNECTED)?;
        tracing::info!("bank account connected");
        Ok(())
    }

    pub fn disconnect(storage: &dyn KeyValueStore) -> ServiceResult<()> {
        storage.remove(keys::BANK_CONNECTED)?;
        tracing::info!("bank account disconnected");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    #[test]
    fn connect_and_disconnect_toggle_the_flag() {
        let storage = MemoryStorage::new();
        assert!(!BankService::is_connected(&storage).unwrap());
        BankService::connect(&storage).unwrap();
        assert!(BankService::is_connected(&storage).unwrap());
        BankService::disconnect(&storage).unwrap();
        assert!(!BankService::is_connected(&storage).unwrap());
    }

    #[test]
    fn only_the_literal_true_counts() {
        let storage = MemoryStorage::with_entries([(keys::BANK_CONNECTED, "yes")]);
        assert!(!BankService::is_connected(&storage).unwrap());
    }
}
