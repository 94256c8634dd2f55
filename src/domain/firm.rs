use serde::{Deserialize, Serialize};

use crate::domain::common::Displayable;

/// A proprietary-trading firm tracked by keyword against bank transactions.
///
/// Serialized with camelCase keys so the stored layout matches the browser dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Firm {
    pub id: String,
    pub name: String,
    pub is_selected: bool,
    pub description: String,
    #[serde(default)]
    pub is_custom: bool,
}

impl Firm {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        is_selected: bool,
        keyword: &str,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            is_selected,
            description: keyword_description(keyword),
            is_custom: false,
        }
    }

    /// Builds a user-authored firm; custom firms start selected.
    pub fn custom(name: &str, keyword: &str) -> Self {
        Self {
            id: derive_firm_id(name),
            name: name.trim().to_string(),
            is_selected: true,
            description: keyword_description(keyword.trim()),
            is_custom: true,
        }
    }
}

impl Displayable for Firm {
    fn display_label(&self) -> String {
        if self.is_custom {
            format!("{} [{}] (custom)", self.name, self.id)
        } else {
            format!("{} [{}]", self.name, self.id)
        }
    }
}

/// Lower-cases the trimmed name and collapses each whitespace run into one hyphen.
pub fn derive_firm_id(name: &str) -> String {
    name.trim()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
}

pub fn keyword_description(keyword: &str) -> String {
    format!("Transactions containing '{keyword}'")
}

/// Catalog every fresh store is seeded with. The first five entries start selected.
pub fn default_catalog() -> Vec<Firm> {
    vec![
        Firm::new("topstep", "Topstep", true, "Topstep"),
        Firm::new("apex", "Apex", true, "Apex"),
        Firm::new("tradeify", "Tradeify", true, "Tradeify"),
        Firm::new("mff", "My Funded Futures", true, "Funded Futures"),
        Firm::new("tpt", "Take Profit Trader", true, "Take Profit"),
        Firm::new("ftmo", "FTMO", false, "FTMO"),
        Firm::new("e8", "E8 Funding", false, "E8"),
        Firm::new("5ers", "The 5%ers", false, "5%ers"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derived_id_is_lowercase_and_hyphenated() {
        assert_eq!(derive_firm_id("Alpha Capital"), "alpha-capital");
        assert_eq!(derive_firm_id("  Blue   Guardian\tFutures "), "blue-guardian-futures");
        assert_eq!(derive_firm_id("FTMO"), "ftmo");
    }

    #[test]
    fn default_catalog_has_eight_firms_with_unique_ids() {
        let catalog = default_catalog();
        assert_eq!(catalog.len(), 8);
        let mut ids: Vec<&str> = catalog.iter().map(|firm| firm.id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 8);
        assert_eq!(catalog.iter().filter(|firm| firm.is_selected).count(), 5);
    }

    #[test]
    fn stored_layout_uses_camel_case_and_defaults_is_custom() {
        let json = r#"[{"id":"apex","name":"Apex","isSelected":true,"description":"Transactions containing 'Apex'"}]"#;
        let firms: Vec<Firm> = serde_json::from_str(json).unwrap();
        assert_eq!(firms[0].id, "apex");
        assert!(firms[0].is_selected);
        assert!(!firms[0].is_custom);

        let encoded = serde_json::to_string(&Firm::custom("Alpha Capital", "Alpha")).unwrap();
        assert!(encoded.contains("\"isSelected\":true"));
        assert!(encoded.contains("\"isCustom\":true"));
    }
}
