pub mod common;
pub mod dataset;
pub mod firm;
pub mod period;
pub mod plan;
pub mod transaction;

pub use common::{Displayable, Gated};
pub use dataset::{Dataset, ReturnsScenario};
pub use firm::{default_catalog, derive_firm_id, Firm};
pub use period::DashboardPeriod;
pub use plan::{Capability, FirmLimit, Plan, PlanPolicy};
pub use transaction::{FirmSummary, Transaction, TransactionCategory};
