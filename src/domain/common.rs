use crate::domain::plan::Plan;

/// Supplies a presentation-ready label for UI or logs.
pub trait Displayable {
    fn display_label(&self) -> String;
}

/// Implemented by every selector whose availability depends on the subscription tier.
pub trait Gated {
    /// Lowest plan that unlocks this option.
    fn required_plan(&self) -> Plan;

    /// Short label shown next to the lock marker.
    fn feature_label(&self) -> &'static str;
}

// Re-export common dependencies so consumers can rely on this module as a façade.
pub use chrono;
pub use serde;
