//! The firm pipeline: selection, plan limits, aggregation and the profit curve.

pub mod aggregation;
pub mod entitlement;
pub mod firm_selection;
pub mod profit_curve;
pub mod services;

pub use aggregation::{aggregate, aggregate_dataset, AggregateTotals, Aggregation};
pub use entitlement::{effective_firms, EntitlementError};
pub use firm_selection::{FirmSelection, FirmSelectionStore, SelectionError, SelectionSource};
pub use profit_curve::{is_final_cumulative_non_negative, project, CurvePoint};
