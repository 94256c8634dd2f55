//! Cumulative net series for the profit chart.
//!
//! Rows are ordered by the instant they occurred at, with a stable sort. A row whose
//! date cannot be parsed is placed after every dated row, keeping its position
//! relative to other undated rows.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::{Transaction, TransactionCategory};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CurvePoint {
    pub date: String,
    pub cumulative_net: f64,
    pub firm: String,
    pub amount: f64,
    pub category: TransactionCategory,
    pub notes: String,
}

pub fn project(transactions: &[Transaction]) -> Vec<CurvePoint> {
    let mut ordered: Vec<(Option<DateTime<Utc>>, &Transaction)> = transactions
        .iter()
        .map(|txn| (txn.occurred_at(), txn))
        .collect();
    // `None` must sort last, so compare on (is_undated, date).
    ordered.sort_by_key(|(date, _)| (date.is_none(), *date));

    let mut running = 0.0;
    ordered
        .into_iter()
        .map(|(_, txn)| {
            running += txn.amount;
            CurvePoint {
                date: txn.date.clone(),
                cumulative_net: running,
                firm: txn.firm.clone(),
                amount: txn.amount,
                category: txn.category,
                notes: txn.notes.clone(),
            }
        })
        .collect()
}

/// True when the series ends at or above zero. An empty series counts as non-negative.
pub fn is_final_cumulative_non_negative(series: &[CurvePoint]) -> bool {
    series
        .last()
        .map(|point| point.cumulative_net >= 0.0)
        .unwrap_or(true)
}
