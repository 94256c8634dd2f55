//! Ledger rows and per-firm summary rows consumed by the dashboard pipeline.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::firm::Firm;

/// Classifies a ledger row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransactionCategory {
    Payout,
    Spending,
    Loss,
}

impl TransactionCategory {
    pub fn label(self) -> &'static str {
        match self {
            TransactionCategory::Payout => "Payout",
            TransactionCategory::Spending => "Spending",
            TransactionCategory::Loss => "Loss",
        }
    }
}

impl fmt::Display for TransactionCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Read-only ledger entry. `date` is kept as the raw ISO string it was recorded with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub date: String,
    pub firm_id: String,
    pub firm: String,
    pub category: TransactionCategory,
    pub amount: f64,
    #[serde(default)]
    pub notes: String,
}

impl Transaction {
    pub fn new(
        date: impl Into<String>,
        firm_id: impl Into<String>,
        firm: impl Into<String>,
        category: TransactionCategory,
        amount: f64,
    ) -> Self {
        Self {
            date: date.into(),
            firm_id: firm_id.into(),
            firm: firm.into(),
            category,
            amount,
            notes: String::new(),
        }
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }

    /// Instant the row was recorded at. An RFC 3339 timestamp keeps its time and
    /// offset; a bare `YYYY-MM-DD` reads as midnight UTC. `None` when neither parses.
    pub fn occurred_at(&self) -> Option<DateTime<Utc>> {
        let raw = self.date.trim();
        DateTime::parse_from_rfc3339(raw)
            .map(|stamp| stamp.with_timezone(&Utc))
            .ok()
            .or_else(|| {
                NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                    .ok()
                    .and_then(|day| day.and_hms_opt(0, 0, 0))
                    .map(|midnight| midnight.and_utc())
            })
    }
}

/// Lifetime spend and payout totals for one firm.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FirmSummary {
    pub id: String,
    pub name: String,
    pub spent: f64,
    pub received: f64,
}

impl FirmSummary {
    pub fn new(id: impl Into<String>, name: impl Into<String>, spent: f64, received: f64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            spent,
            received,
        }
    }

    /// Zero-valued row for a firm that has no history yet.
    pub fn placeholder(firm: &Firm) -> Self {
        Self::new(firm.id.clone(), firm.name.clone(), 0.0, 0.0)
    }

    pub fn net(&self) -> f64 {
        self.received - self.spent
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(date: &str) -> Option<DateTime<Utc>> {
        Transaction::new(date, "apex", "Apex", TransactionCategory::Payout, 1.0).occurred_at()
    }

    fn utc(y: i32, m: u32, d: u32, h: u32) -> Option<DateTime<Utc>> {
        NaiveDate::from_ymd_opt(y, m, d)
            .and_then(|day| day.and_hms_opt(h, 0, 0))
            .map(|stamp| stamp.and_utc())
    }

    #[test]
    fn plain_dates_read_as_midnight_utc() {
        assert_eq!(at("2023-03-10"), utc(2023, 3, 10, 0));
        assert_eq!(at(" 2023-03-10 "), utc(2023, 3, 10, 0));
    }

    #[test]
    fn timestamps_keep_time_and_offset() {
        assert_eq!(at("2023-03-10T08:00:00Z"), utc(2023, 3, 10, 8));
        assert_eq!(at("2023-03-10T23:00:00-05:00"), utc(2023, 3, 11, 4));
    }

    #[test]
    fn garbage_has_no_instant() {
        assert_eq!(at("not-a-date"), None);
        assert_eq!(at(""), None);
    }

    #[test]
    fn placeholder_summary_is_zero_valued() {
        let firm = Firm::custom("Alpha Capital", "Alpha");
        let summary = FirmSummary::placeholder(&firm);
        assert_eq!(summary.id, "alpha-capital");
        assert_eq!(summary.spent, 0.0);
        assert_eq!(summary.received, 0.0);
        assert_eq!(summary.net(), 0.0);
    }
}
