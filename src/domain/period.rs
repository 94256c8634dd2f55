use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::domain::common::Gated;
use crate::domain::plan::Plan;

/// Period selector on the dashboard header.
///
/// The selector only labels the view; the demonstration ledger is shown in full
/// whatever period is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DashboardPeriod {
    #[default]
    #[serde(rename = "30d")]
    Last30Days,
    #[serde(rename = "3m")]
    Last3Months,
    #[serde(rename = "6m")]
    Last6Months,
    #[serde(rename = "ytd")]
    YearToDate,
    #[serde(rename = "custom")]
    Custom,
}

impl DashboardPeriod {
    pub const ALL: [DashboardPeriod; 5] = [
        DashboardPeriod::Last30Days,
        DashboardPeriod::Last3Months,
        DashboardPeriod::Last6Months,
        DashboardPeriod::YearToDate,
        DashboardPeriod::Custom,
    ];

    pub fn token(self) -> &'static str {
        match self {
            DashboardPeriod::Last30Days => "30d",
            DashboardPeriod::Last3Months => "3m",
            DashboardPeriod::Last6Months => "6m",
            DashboardPeriod::YearToDate => "ytd",
            DashboardPeriod::Custom => "custom",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DashboardPeriod::Last30Days => "Last 30 days",
            DashboardPeriod::Last3Months => "Last 3 months",
            DashboardPeriod::Last6Months => "Last 6 months",
            DashboardPeriod::YearToDate => "Year to date",
            DashboardPeriod::Custom => "Custom range",
        }
    }
}

impl Gated for DashboardPeriod {
    fn required_plan(&self) -> Plan {
        match self {
            DashboardPeriod::Last30Days => Plan::Starter,
            DashboardPeriod::Last3Months | DashboardPeriod::Last6Months => Plan::Standard,
            DashboardPeriod::YearToDate | DashboardPeriod::Custom => Plan::Premium,
        }
    }

    fn feature_label(&self) -> &'static str {
        self.label()
    }
}

impl FromStr for DashboardPeriod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_ascii_lowercase();
        DashboardPeriod::ALL
            .into_iter()
            .find(|period| period.token() == needle)
            .ok_or_else(|| format!("Unknown period: '{}'", s.trim()))
    }
}

impl fmt::Display for DashboardPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::plan::PlanPolicy;

    #[test]
    fn starter_only_sees_thirty_days() {
        let open: Vec<_> = DashboardPeriod::ALL
            .into_iter()
            .filter(|period| PlanPolicy::allows(Plan::Starter, period))
            .collect();
        assert_eq!(open, vec![DashboardPeriod::Last30Days]);
    }

    #[test]
    fn tokens_round_trip_through_from_str() {
        for period in DashboardPeriod::ALL {
            assert_eq!(period.token().parse::<DashboardPeriod>(), Ok(period));
        }
    }
}
