//! Subscription tiers and the entitlements attached to them.
//!
//! Every limit the rest of the crate enforces is read from [`PlanPolicy`], so the
//! settings guard and the dashboard projection can never disagree about a number.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::domain::common::Gated;

/// Ordered subscription tiers. Declaration order is the tier order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(from = "String", into = "String")]
pub enum Plan {
    #[default]
    Starter,
    Standard,
    Premium,
}

impl Plan {
    pub const ALL: [Plan; 3] = [Plan::Starter, Plan::Standard, Plan::Premium];

    pub fn tier_rank(self) -> u8 {
        match self {
            Plan::Starter => 0,
            Plan::Standard => 1,
            Plan::Premium => 2,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Plan::Starter => "starter",
            Plan::Standard => "standard",
            Plan::Premium => "premium",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Plan::Starter => "Starter",
            Plan::Standard => "Standard",
            Plan::Premium => "Premium",
        }
    }

    /// Maps a retired tier name onto its replacement.
    pub fn migrate_legacy(raw: &str) -> Option<Plan> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "free" => Some(Plan::Starter),
            "basic" => Some(Plan::Standard),
            "pro" => Some(Plan::Premium),
            _ => None,
        }
    }

    /// Parses current and legacy names; anything unrecognised is the lowest tier.
    pub fn parse_lenient(raw: &str) -> Plan {
        raw.parse()
            .ok()
            .or_else(|| Plan::migrate_legacy(raw))
            .unwrap_or_default()
    }
}

impl FromStr for Plan {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "starter" => Ok(Plan::Starter),
            "standard" => Ok(Plan::Standard),
            "premium" => Ok(Plan::Premium),
            other => Err(format!("Unknown plan: '{other}'")),
        }
    }
}

impl fmt::Display for Plan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl From<String> for Plan {
    fn from(value: String) -> Self {
        Plan::parse_lenient(&value)
    }
}

impl From<Plan> for String {
    fn from(plan: Plan) -> Self {
        plan.as_str().to_string()
    }
}

/// Maximum number of firms a plan may track at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FirmLimit {
    Limited(usize),
    Unlimited,
}

impl FirmLimit {
    /// True when one more firm may be selected on top of `selected`.
    pub fn admits_another(self, selected: usize) -> bool {
        match self {
            FirmLimit::Limited(max) => selected < max,
            FirmLimit::Unlimited => true,
        }
    }

    /// Number of entries kept out of `len` candidates.
    pub fn cap(self, len: usize) -> usize {
        match self {
            FirmLimit::Limited(max) => len.min(max),
            FirmLimit::Unlimited => len,
        }
    }

    pub fn as_option(self) -> Option<usize> {
        match self {
            FirmLimit::Limited(max) => Some(max),
            FirmLimit::Unlimited => None,
        }
    }
}

impl fmt::Display for FirmLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FirmLimit::Limited(max) => write!(f, "{max}"),
            FirmLimit::Unlimited => f.write_str("unlimited"),
        }
    }
}

/// Capabilities that are not tied to a selector enum elsewhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    CustomFirms,
}

impl Gated for Capability {
    fn required_plan(&self) -> Plan {
        match self {
            Capability::CustomFirms => Plan::Premium,
        }
    }

    fn feature_label(&self) -> &'static str {
        match self {
            Capability::CustomFirms => "Custom prop firms",
        }
    }
}

/// Pure mapping from a plan to its entitlements.
pub struct PlanPolicy;

impl PlanPolicy {
    pub fn limit_for(plan: Plan) -> FirmLimit {
        match plan {
            Plan::Starter => FirmLimit::Limited(1),
            Plan::Standard => FirmLimit::Limited(3),
            Plan::Premium => FirmLimit::Unlimited,
        }
    }

    pub fn is_feature_available(plan: Plan, required: Plan) -> bool {
        plan.tier_rank() >= required.tier_rank()
    }

    pub fn allows(plan: Plan, feature: &impl Gated) -> bool {
        Self::is_feature_available(plan, feature.required_plan())
    }

    /// Upgrade hint shown when a plan's firm limit blocks a selection.
    pub fn limit_message(plan: Plan) -> &'static str {
        match plan {
            Plan::Starter => {
                "Starter plan allows only 1 prop firm. Upgrade to Standard for up to 3 firms."
            }
            Plan::Standard => {
                "Standard plan allows up to 3 prop firms. Upgrade to Premium for unlimited firms."
            }
            Plan::Premium => "Premium plan has no prop firm limit.",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rank_of_limit(limit: FirmLimit) -> usize {
        limit.as_option().unwrap_or(usize::MAX)
    }

    #[test]
    fn limits_never_decrease_with_tier() {
        let limits: Vec<usize> = Plan::ALL
            .iter()
            .map(|plan| rank_of_limit(PlanPolicy::limit_for(*plan)))
            .collect();
        assert!(limits.windows(2).all(|pair| pair[0] <= pair[1]));
        assert_eq!(PlanPolicy::limit_for(Plan::Starter), FirmLimit::Limited(1));
        assert_eq!(PlanPolicy::limit_for(Plan::Standard), FirmLimit::Limited(3));
        assert_eq!(PlanPolicy::limit_for(Plan::Premium), FirmLimit::Unlimited);
    }

    #[test]
    fn feature_availability_follows_tier_rank() {
        for plan in Plan::ALL {
            for required in Plan::ALL {
                assert_eq!(
                    PlanPolicy::is_feature_available(plan, required),
                    plan.tier_rank() >= required.tier_rank(),
                    "{plan} vs {required}"
                );
            }
        }
    }

    #[test]
    fn unknown_plan_is_lowest_tier() {
        assert_eq!(Plan::parse_lenient("enterprise"), Plan::Starter);
        assert_eq!(Plan::parse_lenient(""), Plan::Starter);
        assert!("enterprise".parse::<Plan>().is_err());
    }

    #[test]
    fn legacy_names_map_to_current_tiers() {
        assert_eq!(Plan::parse_lenient("free"), Plan::Starter);
        assert_eq!(Plan::parse_lenient("Basic"), Plan::Standard);
        assert_eq!(Plan::parse_lenient("pro"), Plan::Premium);
        assert_eq!(Plan::migrate_legacy("premium"), None);
    }

    #[test]
    fn serde_uses_lowercase_names_and_tolerates_legacy_values() {
        let json = serde_json::to_string(&Plan::Standard).unwrap();
        assert_eq!(json, "\"standard\"");
        let legacy: Plan = serde_json::from_str("\"pro\"").unwrap();
        assert_eq!(legacy, Plan::Premium);
        let unknown: Plan = serde_json::from_str("\"gold\"").unwrap();
        assert_eq!(unknown, Plan::Starter);
    }

    #[test]
    fn firm_limit_guard_and_cap_agree() {
        let limit = FirmLimit::Limited(3);
        assert!(limit.admits_another(2));
        assert!(!limit.admits_another(3));
        assert_eq!(limit.cap(5), 3);
        assert_eq!(limit.cap(2), 2);
        assert!(FirmLimit::Unlimited.admits_another(1_000));
        assert_eq!(FirmLimit::Unlimited.cap(42), 42);
    }

    #[test]
    fn custom_firms_require_premium() {
        assert!(!PlanPolicy::allows(Plan::Standard, &Capability::CustomFirms));
        assert!(PlanPolicy::allows(Plan::Premium, &Capability::CustomFirms));
    }
}
