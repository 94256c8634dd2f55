//! Assembles the dashboard from the committed selection.

use crate::core::aggregation::{aggregate_dataset, Aggregation};
use crate::core::entitlement::{check_feature, effective_firms};
use crate::core::firm_selection::FirmSelectionStore;
use crate::core::profit_curve::{is_final_cumulative_non_negative, project, CurvePoint};
use crate::core::services::ServiceResult;
use crate::domain::{DashboardPeriod, Dataset, Firm, Plan, ReturnsScenario};

/// Everything the dashboard renders, computed fresh on every request.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardView {
    pub plan: Plan,
    pub period: DashboardPeriod,
    pub scenario: ReturnsScenario,
    pub selected: Vec<Firm>,
    pub effective: Vec<Firm>,
    pub aggregation: Aggregation,
    pub curve: Vec<CurvePoint>,
    pub curve_non_negative: bool,
}

impl DashboardView {
    /// Selected firms dropped by the plan limit.
    pub fn hidden_count(&self) -> usize {
        self.selected.len() - self.effective.len()
    }
}

pub struct DashboardService;

impl DashboardService {
    pub fn build(
        store: &FirmSelectionStore,
        plan: Plan,
        scenario: ReturnsScenario,
        period: DashboardPeriod,
    ) -> ServiceResult<DashboardView> {
        check_feature(plan, &period)?;
        Ok(Self::build_from(
            store,
            plan,
            scenario,
            period,
            Dataset::for_scenario(scenario),
        ))
    }

    /// Same pipeline over an explicit dataset.
    pub fn build_from(
        store: &FirmSelectionStore,
        plan: Plan,
        scenario: ReturnsScenario,
        period: DashboardPeriod,
        dataset: &Dataset,
    ) -> DashboardView {
        let selected = store.selected();
        let effective = effective_firms(&selected, plan);
        let aggregation = aggregate_dataset(dataset, &effective);
        let curve = project(&aggregation.transactions);
        let curve_non_negative = is_final_cumulative_non_negative(&curve);
        tracing::debug!(
            selected = selected.len(),
            effective = effective.len(),
            transactions = aggregation.totals.transaction_count,
            "dashboard computed"
        );
        DashboardView {
            plan,
            period,
            scenario,
            selected,
            effective,
            aggregation,
            curve,
            curve_non_negative,
        }
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
    fn starter_sees_only_the_first_selected_firm() {
        let store = store();
        let view = DashboardService::build(
            &store,
            Plan::Starter,
            ReturnsScenario::Positive,
            DashboardPeriod::Last30Days,
        )
        .unwrap();

        assert_eq!(view.selected.len(), 5);
        let ids: Vec<&str> = view.effective.iter().map(|firm| firm.id.as_str()).collect();
        assert_eq!(ids, vec!["topstep"]);
        assert_eq!(view.hidden_count(), 4);
        assert!(view
            .aggregation
            .transactions
            .iter()
            .all(|txn| txn.firm_id == "topstep"));
        assert_eq!(view.aggregation.totals.transaction_count, 2);
        assert_eq!(view.aggregation.totals.spent, 1200.0);
        assert_eq!(view.aggregation.totals.received, 3500.0);
        assert_eq!(view.aggregation.totals.net, 2300.0);

        let cumulative: Vec<f64> = view.curve.iter().map(|point| point.cumulative_net).collect();
        assert_eq!(cumulative, vec![-175.0, 1075.0]);
        assert!(view.curve_non_negative);
    }

    #[test]
    fn negative_scenario_turns_the_curve_red() {
        let view = DashboardService::build(
            &store(),
            Plan::Premium,
            ReturnsScenario::Negative,
            DashboardPeriod::YearToDate,
        )
        .unwrap();
        assert_eq!(view.effective.len(), 5);
        assert!(!view.curve_non_negative);
    }

    #[test]
    fn locked_period_is_rejected() {
        let err = DashboardService::build(
            &store(),
            Plan::Starter,
            ReturnsScenario::Positive,
            DashboardPeriod::Last3Months,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Entitlement(EntitlementError::FeatureLocked {
                required: Plan::Standard,
                ..
            })
        ));
    }
}
