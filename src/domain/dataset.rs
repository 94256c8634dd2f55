//! Fixed demonstration ledger. Two scenarios exist so the dashboard can be shown
//! with a profitable and a losing history.

use std::{fmt, str::FromStr};

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::domain::transaction::{FirmSummary, Transaction, TransactionCategory};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReturnsScenario {
    #[default]
    Positive,
    Negative,
}

impl ReturnsScenario {
    pub fn as_str(self) -> &'static str {
        match self {
            ReturnsScenario::Positive => "positive",
            ReturnsScenario::Negative => "negative",
        }
    }
}

impl FromStr for ReturnsScenario {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "positive" => Ok(ReturnsScenario::Positive),
            "negative" => Ok(ReturnsScenario::Negative),
            other => Err(format!("Unknown returns scenario: '{other}'")),
        }
    }
}

impl fmt::Display for ReturnsScenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ledger rows plus the per-firm summary table they roll up into.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    pub transactions: Vec<Transaction>,
    pub firm_summaries: Vec<FirmSummary>,
}

impl Dataset {
    pub fn new(transactions: Vec<Transaction>, firm_summaries: Vec<FirmSummary>) -> Self {
        Self {
            transactions,
            firm_summaries,
        }
    }

    pub fn for_scenario(scenario: ReturnsScenario) -> &'static Dataset {
        match scenario {
            ReturnsScenario::Positive => &POSITIVE,
            ReturnsScenario::Negative => &NEGATIVE,
        }
    }
}

static POSITIVE: Lazy<Dataset> = Lazy::new(|| {
    use TransactionCategory::*;
    Dataset::new(
        vec![
            Transaction::new("2023-04-01", "topstep", "Topstep", Payout, 1250.0),
            Transaction::new("2023-03-28", "apex", "Apex", Spending, -200.0),
            Transaction::new("2023-03-25", "tradeify", "Tradeify", Payout, 850.0),
            Transaction::new("2023-03-20", "mff", "My Funded Futures", Spending, -150.0),
            Transaction::new("2023-03-15", "topstep", "Topstep", Spending, -175.0),
            Transaction::new("2023-03-10", "apex", "Apex", Payout, 1100.0),
            Transaction::new("2023-03-05", "tpt", "Take Profit Trader", Spending, -225.0),
        ],
        vec![
            FirmSummary::new("topstep", "Topstep", 1200.0, 3500.0),
            FirmSummary::new("apex", "Apex", 1800.0, 2750.0),
            FirmSummary::new("tradeify", "Tradeify", 950.0, 1500.0),
            FirmSummary::new("mff", "My Funded Futures", 600.0, 1000.0),
            FirmSummary::new("tpt", "Take Profit Trader", 800.0, 0.0),
            FirmSummary::new("ftmo", "FTMO", 900.0, 2000.0),
            FirmSummary::new("e8", "E8 Funding", 750.0, 1800.0),
            FirmSummary::new("5ers", "The 5%ers", 850.0, 1600.0),
        ],
    )
});

static NEGATIVE: Lazy<Dataset> = Lazy::new(|| {
    use TransactionCategory::*;
    Dataset::new(
        vec![
            Transaction::new("2023-04-01", "topstep", "Topstep", Loss, -750.0),
            Transaction::new("2023-03-28", "apex", "Apex", Spending, -200.0),
            Transaction::new("2023-03-25", "tradeify", "Tradeify", Loss, -450.0),
            Transaction::new("2023-03-20", "mff", "My Funded Futures", Spending, -150.0),
            Transaction::new("2023-03-15", "topstep", "Topstep", Spending, -175.0),
            Transaction::new("2023-03-10", "apex", "Apex", Loss, -300.0),
            Transaction::new("2023-03-05", "tpt", "Take Profit Trader", Spending, -225.0),
        ],
        vec![
            FirmSummary::new("topstep", "Topstep", 1200.0, 450.0),
            FirmSummary::new("apex", "Apex", 1800.0, 500.0),
            FirmSummary::new("tradeify", "Tradeify", 950.0, 300.0),
            FirmSummary::new("mff", "My Funded Futures", 600.0, 200.0),
            FirmSummary::new("tpt", "Take Profit Trader", 800.0, 0.0),
            FirmSummary::new("ftmo", "FTMO", 900.0, 400.0),
            FirmSummary::new("e8", "E8 Funding", 750.0, 300.0),
            FirmSummary::new("5ers", "The 5%ers", 850.0, 250.0),
        ],
    )
});
