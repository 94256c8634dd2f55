#![doc(test(attr(deny(warnings))))]

//! PropFlow Core tracks spending and payouts across prop-trading firms: firm
//! selection with plan limits, the dashboard aggregation pipeline, report export
//! and the shell that drives them.

pub mod cli;
pub mod config;
pub mod core;
pub mod currency;
pub mod domain;
pub mod errors;
pub mod gateway;
pub mod report;
pub mod storage;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("PropFlow Core tracing initialized.");
    });
}
