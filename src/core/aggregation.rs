use std::collections::HashSet;

use serde::Serialize;

use crate::domain::{Dataset, Firm, FirmSummary, Transaction};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateTotals {
    pub spent: f64,
    pub received: f64,
    pub net: f64,
    pub transaction_count: usize,
}

/// Ledger view restricted to the effective firms.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Aggregation {
    pub transactions: Vec<Transaction>,
    pub firm_summaries: Vec<FirmSummary>,
    pub totals: AggregateTotals,
}

/// Keeps the rows belonging to `effective` and totals them.
///
/// Summaries follow the order of `effective`. A firm with no row in `summaries`
/// gets a zero placeholder so it still shows up.
pub fn aggregate(
    transactions: &[Transaction],
    summaries: &[FirmSummary],
    effective: &[Firm],
) -> Aggregation {
    let ids: HashSet<&str> = effective.iter().map(|firm| firm.id.as_str()).collect();

    let transactions: Vec<Transaction> = transactions
        .iter()
        .filter(|txn| ids.contains(txn.firm_id.as_str()))
        .cloned()
        .collect();

    let firm_summaries: Vec<FirmSummary> = effective
        .iter()
        .map(|firm| {
            summaries
                .iter()
                .find(|row| row.id == firm.id)
                .cloned()
                .unwrap_or_else(|| FirmSummary::placeholder(firm))
        })
        .collect();

    let spent: f64 = firm_summaries.iter().map(|row| row.spent).sum();
    let received: f64 = firm_summaries.iter().map(|row| row.received).sum();

    Aggregation {
        totals: AggregateTotals {
            spent,
            received,
            net: received - spent,
            transaction_count: transactions.len(),
        },
        transactions,
        firm_summaries,
    }
}

pub fn aggregate_dataset(dataset: &Dataset, effective: &[Firm]) -> Aggregation {
    aggregate(&dataset.transactions, &dataset.firm_summaries, effective)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{default_catalog, ReturnsScenario, TransactionCategory};

    fn firm(id: &str) -> Firm {
        default_catalog()
            .into_iter()
            .find(|firm| firm.id == id)
            .unwrap()
    }

    #[test]
    fn empty_effective_set_yields_zero_totals() {
        let dataset = Dataset::for_scenario(ReturnsScenario::Positive);
        let result = aggregate_dataset(dataset, &[]);
        assert!(result.transactions.is_empty());
        assert!(result.firm_summaries.is_empty());
        assert_eq!(result.totals, AggregateTotals::default());
    }

    #[test]
    fn empty_inputs_are_not_an_error() {
        let result = aggregate(&[], &[], &[firm("apex")]);
        assert!(result.transactions.is_empty());
        assert_eq!(result.firm_summaries, vec![FirmSummary::new("apex", "Apex", 0.0, 0.0)]);
        assert_eq!(result.totals.net, 0.0);
    }

    #[test]
    fn filters_transactions_and_sums_summaries() {
        let dataset = Dataset::for_scenario(ReturnsScenario::Positive);
        let result = aggregate_dataset(dataset, &[firm("topstep"), firm("apex")]);

        assert_eq!(result.transactions.len(), 4);
        assert!(result
            .transactions
            .iter()
            .all(|txn| txn.firm_id == "topstep" || txn.firm_id == "apex"));
        assert_eq!(result.totals.spent, 3000.0);
        assert_eq!(result.totals.received, 6250.0);
        assert_eq!(result.totals.net, 3250.0);
        assert_eq!(result.totals.transaction_count, 4);
    }

    #[test]
    fn summaries_follow_effective_order() {
        let dataset = Dataset::for_scenario(ReturnsScenario::Positive);
        let result = aggregate_dataset(dataset, &[firm("mff"), firm("topstep")]);
        let ids: Vec<&str> = result.firm_summaries.iter().map(|row| row.id.as_str()).collect();
        assert_eq!(ids, vec!["mff", "topstep"]);
    }

    #[test]
    fn custom_firm_without_history_gets_placeholder() {
        let custom = Firm::custom("Alpha Capital", "Alpha");
        let transactions = vec![Transaction::new(
            "2023-03-01",
            "apex",
            "Apex",
            TransactionCategory::Payout,
            10.0,
        )];
        let result = aggregate(&transactions, &[], &[custom]);
        assert!(result.transactions.is_empty());
        assert_eq!(
            result.firm_summaries,
            vec![FirmSummary::new("alpha-capital", "Alpha Capital", 0.0, 0.0)]
        );
    }
}
