pub mod bank_service;
pub mod dashboard_service;
pub mod session_service;
pub mod settings_service;

pub use bank_service::BankService;
pub use dashboard_service::{DashboardService, DashboardView};
pub use session_service::{SessionService, User};
pub use settings_service::SettingsService;

use crate::core::entitlement::EntitlementError;
use crate::core::firm_selection::SelectionError;
use crate::errors::PropFlowError;

pub type ServiceResult<T> = Result<T, ServiceError>;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Selection(#[from] SelectionError),
    #[error(transparent)]
    Entitlement(#[from] EntitlementError),
    #[error(transparent)]
    Storage(#[from] PropFlowError),
    #[error("{0}")]
    Auth(String),
}
