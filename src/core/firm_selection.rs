//! Two-phase editing of the tracked firm catalog.
//!
//! [`FirmSelection`] is an immutable snapshot: every edit returns a new value, so the
//! committed and pending collections never alias. [`FirmSelectionStore`] owns one
//! snapshot of each kind and persists the committed one.

use std::sync::Arc;

use thiserror::Error;

use crate::domain::firm::{default_catalog, Firm};
use crate::errors::PropFlowError;
use crate::storage::{keys, KeyValueStore};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    #[error("Prop firm `{0}` not found")]
    UnknownFirm(String),
    #[error("Please provide a firm name")]
    MissingName,
    #[error("Please provide a keyword to match in transactions")]
    MissingKeyword,
}

/// Ordered firm catalog. Catalog order is the order firms were seeded or added in.
#[derive(Debug, Clone, PartialEq)]
pub struct FirmSelection {
    firms: Vec<Firm>,
}

impl FirmSelection {
    pub fn new(firms: Vec<Firm>) -> Self {
        Self { firms }
    }

    pub fn default_catalog() -> Self {
        Self::new(default_catalog())
    }

    pub fn firms(&self) -> &[Firm] {
        &self.firms
    }

    pub fn len(&self) -> usize {
        self.firms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.firms.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Firm> {
        self.firms.iter().find(|firm| firm.id == id)
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.get(id).map(|firm| firm.is_selected).unwrap_or(false)
    }

    /// Selected firms in catalog order.
    pub fn selected(&self) -> Vec<Firm> {
        self.firms
            .iter()
            .filter(|firm| firm.is_selected)
            .cloned()
            .collect()
    }

    pub fn selected_count(&self) -> usize {
        self.firms.iter().filter(|firm| firm.is_selected).count()
    }

    pub fn with_toggled(&self, id: &str) -> Result<Self, SelectionError> {
        if self.get(id).is_none() {
            return Err(SelectionError::UnknownFirm(id.to_string()));
        }
        let firms = self
            .firms
            .iter()
            .map(|firm| {
                if firm.id == id {
                    Firm {
                        is_selected: !firm.is_selected,
                        ..firm.clone()
                    }
                } else {
                    firm.clone()
                }
            })
            .collect();
        Ok(Self::new(firms))
    }

    /// Upserts a custom firm. A derived id that already exists updates that entry in place.
    pub fn with_added(&self, name: &str, keyword: &str) -> Result<Self, SelectionError> {
        if name.trim().is_empty() {
            return Err(SelectionError::MissingName);
        }
        if keyword.trim().is_empty() {
            return Err(SelectionError::MissingKeyword);
        }
        let added = Firm::custom(name, keyword);
        let mut firms = self.firms.clone();
        match firms.iter_mut().find(|firm| firm.id == added.id) {
            Some(existing) => *existing = added,
            None => firms.push(added),
        }
        Ok(Self::new(firms))
    }

    fn has_unique_ids(&self) -> bool {
        let mut ids: Vec<&str> = self.firms.iter().map(|firm| firm.id.as_str()).collect();
        ids.sort_unstable();
        let before = ids.len();
        ids.dedup();
        ids.len() == before
    }
}

impl Default for FirmSelection {
    fn default() -> Self {
        Self::default_catalog()
    }
}

/// Where the committed snapshot came from at initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionSource {
    Stored,
    DefaultCatalog,
    RecoveredFromCorruption,
}

/// Owns the committed and pending firm selections.
pub struct FirmSelectionStore {
    storage: Arc<dyn KeyValueStore>,
    committed: FirmSelection,
    pending: FirmSelection,
    dirty: bool,
    source: SelectionSource,
}

impl FirmSelectionStore {
    /// Loads the committed selection, falling back to the default catalog when the
    /// stored value is missing or malformed. Never fails.
    pub fn initialize(storage: Arc<dyn KeyValueStore>) -> Self {
        let (committed, source) = load_committed(storage.as_ref());
        tracing::debug!(firms = committed.len(), ?source, "firm selection initialized");
        Self {
            storage,
            pending: committed.clone(),
            committed,
            dirty: false,
            source,
        }
    }

    pub fn source(&self) -> SelectionSource {
        self.source
    }

    pub fn committed(&self) -> &FirmSelection {
        &self.committed
    }

    pub fn pending(&self) -> &FirmSelection {
        &self.pending
    }

    /// True once `pending` has been edited since the last commit or discard.
    pub fn has_pending_changes(&self) -> bool {
        self.dirty
    }

    pub fn toggle(&mut self, id: &str) -> Result<(), SelectionError> {
        self.pending = self.pending.with_toggled(id)?;
        self.dirty = true;
        Ok(())
    }

    pub fn add_custom(&mut self, name: &str, keyword: &str) -> Result<(), SelectionError> {
        self.pending = self.pending.with_added(name, keyword)?;
        self.dirty = true;
        Ok(())
    }

    /// Persists `pending` and promotes it to `committed`. On a storage failure
    /// nothing is promoted and the pending edits are kept.
    pub fn commit(&mut self) -> Result<(), PropFlowError> {
        let json = serde_json::to_string(self.pending.firms())?;
        self.storage.set(keys::SELECTED_FIRMS, &json)?;
        self.committed = self.pending.clone();
        self.dirty = false;
        tracing::info!(
            selected = self.committed.selected_count(),
            total = self.committed.len(),
            "firm preferences saved"
        );
        Ok(())
    }

    pub fn discard(&mut self) {
        self.pending = self.committed.clone();
        self.dirty = false;
        tracing::debug!("pending firm edits discarded");
    }

    /// Committed firms with `is_selected` set, in catalog order.
    pub fn selected(&self) -> Vec<Firm> {
        self.committed.selected()
    }

    /// Reads the committed snapshot, never the pending one.
    pub fn is_selected(&self, id: &str) -> bool {
        self.committed.is_selected(id)
    }
}

fn load_committed(storage: &dyn KeyValueStore) -> (FirmSelection, SelectionSource) {
    let raw = match storage.get(keys::SELECTED_FIRMS) {
        Ok(Some(raw)) => raw,
        Ok(None) => return (FirmSelection::default_catalog(), SelectionSource::DefaultCatalog),
        Err(err) => {
            tracing::warn!(error = %err, "could not read saved prop firms");
            return (FirmSelection::default_catalog(), SelectionSource::DefaultCatalog);
        }
    };

    match serde_json::from_str::<Vec<Firm>>(&raw) {
        Ok(firms) => {
            let selection = FirmSelection::new(firms);
            if selection.has_unique_ids() {
                return (selection, SelectionSource::Stored);
            }
            tracing::warn!("saved prop firms contain duplicate ids; discarding");
        }
        Err(err) => {
            tracing::warn!(error = %err, "failed to parse saved prop firms; discarding");
        }
    }

    if let Err(err) = storage.remove(keys::SELECTED_FIRMS) {
        tracing::warn!(error = %err, "could not clear corrupted prop firm entry");
    }
    (
        FirmSelection::default_catalog(),
        SelectionSource::RecoveredFromCorruption,
    )
}
