//! Plan-aware editing of the pending firm selection.

use crate::core::entitlement::{check_add_custom, check_toggle};
use crate::core::firm_selection::{FirmSelectionStore, SelectionError};
use crate::core::services::ServiceResult;
use crate::domain::{derive_firm_id, Firm, Plan};

/// Runs the entitlement guards before touching the store.
pub struct SettingsService;

impl SettingsService {
    /// Flips a firm in `pending` and returns its new selection flag.
    pub fn toggle(store: &mut FirmSelectionStore, id: &str, plan: Plan) -> ServiceResult<bool> {
        if store.pending().get(id).is_none() {
            return Err(SelectionError::UnknownFirm(id.to_string()).into());
        }
        check_toggle(store.pending(), id, plan)?;
        store.toggle(id)?;
        Ok(store.pending().is_selected(id))
    }

    /// Adds or updates a custom firm in `pending` and returns it.
    pub fn add_custom(
        store: &mut FirmSelectionStore,
        name: &str,
        keyword: &str,
        plan: Plan,
    ) -> ServiceResult<Firm> {
        check_add_custom(plan)?;
        store.add_custom(name, keyword)?;
        let id = derive_firm_id(name);
        store
            .pending()
            .get(&id)
            .cloned()
            .ok_or_else(|| SelectionError::UnknownFirm(id).into())
    }

    pub fn save(store: &mut FirmSelectionStore) -> ServiceResult<()> {
        store.commit()?;
        Ok(())
    }

    pub fn discard(store: &mut FirmSelectionStore) {
        store.discard();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::core::entitlement::EntitlementError;
    use crate::core::services::ServiceError;
    use crate::storage::MemoryStorage;

    fn store() -> FirmSelectionStore {
        FirmSelectionStore::initialize(Arc::new(MemoryStorage::new()))
    }

    #[test]
    fn rejected_toggle_leaves_pending_untouched() {
        let mut store = store();
        // Standard: deselect down to exactly the limit of three.
        SettingsService::toggle(&mut store, "mff", Plan::Standard).unwrap();
        SettingsService::toggle(&mut store, "tpt", Plan::Standard).unwrap();
        let before = store.pending().clone();

        for _ in 0..2 {
            let err = SettingsService::toggle(&mut store, "ftmo", Plan::Standard).unwrap_err();
            assert!(matches!(
                err,
                ServiceError::Entitlement(EntitlementError::FirmLimitReached { .. })
            ));
            assert_eq!(store.pending(), &before);
        }
    }

    #[test]
    fn unknown_firm_is_reported_before_the_limit() {
        let mut store = store();
        let err = SettingsService::toggle(&mut store, "ghost", Plan::Starter).unwrap_err();
        assert!(matches!(err, ServiceError::Selection(SelectionError::UnknownFirm(_))));
    }

    #[test]
    fn starter_cannot_author_custom_firms() {
        let mut store = store();
        let err =
            SettingsService::add_custom(&mut store, "Alpha", "Alpha", Plan::Starter).unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Entitlement(EntitlementError::CustomFirmsLocked { .. })
        ));
        assert!(!store.has_pending_changes());
    }

    #[test]
    fn premium_adds_and_saves_custom_firm() {
        let mut store = store();
        let firm =
            SettingsService::add_custom(&mut store, " Alpha Capital ", "Alpha", Plan::Premium)
                .unwrap();
        assert_eq!(firm.id, "alpha-capital");
        assert_eq!(firm.name, "Alpha Capital");
        assert!(!store.is_selected("alpha-capital"));

        SettingsService::save(&mut store).unwrap();
        assert!(store.is_selected("alpha-capital"));
    }
}
