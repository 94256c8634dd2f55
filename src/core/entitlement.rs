//! Plan-based restriction of the firm list and the guards that run before an edit.

use thiserror::Error;

use crate::core::firm_selection::FirmSelection;
use crate::domain::{Capability, Firm, FirmLimit, Gated, Plan, PlanPolicy};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EntitlementError {
    #[error("{}", PlanPolicy::limit_message(*.plan))]
    FirmLimitReached { plan: Plan, limit: FirmLimit },
    #[error("Custom prop firms are only available on the Premium plan (current plan: {plan})")]
    CustomFirmsLocked { plan: Plan },
    #[error("{feature} requires the {required} plan")]
    FeatureLocked {
        feature: &'static str,
        required: Plan,
    },
}

/// Firms the plan may see: the first `limit` entries of `selected`, order preserved.
pub fn effective_firms(selected: &[Firm], plan: Plan) -> Vec<Firm> {
    let keep = PlanPolicy::limit_for(plan).cap(selected.len());
    selected[..keep].to_vec()
}

/// Rejects selecting another firm once the pending selection is at the plan limit.
/// Deselecting is always allowed.
pub fn check_toggle(pending: &FirmSelection, id: &str, plan: Plan) -> Result<(), EntitlementError> {
    if pending.is_selected(id) {
        return Ok(());
    }
    let limit = PlanPolicy::limit_for(plan);
    if limit.admits_another(pending.selected_count()) {
        Ok(())
    } else {
        Err(EntitlementError::FirmLimitReached { plan, limit })
    }
}

pub fn check_add_custom(plan: Plan) -> Result<(), EntitlementError> {
    if PlanPolicy::allows(plan, &Capability::CustomFirms) {
        Ok(())
    } else {
        Err(EntitlementError::CustomFirmsLocked { plan })
    }
}

pub fn check_feature(plan: Plan, feature: &impl Gated) -> Result<(), EntitlementError> {
    if PlanPolicy::allows(plan, feature) {
        Ok(())
    } else {
        Err(EntitlementError::FeatureLocked {
            feature: feature.feature_label(),
            required: feature.required_plan(),
        })
    }
}
