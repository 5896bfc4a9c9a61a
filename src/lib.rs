#![doc(test(attr(deny(warnings))))]

//! Praxis Tax computes progressive and flat-rate taxes, tracks the resulting
//! obligations through payment, and reports compliance and budget variance.

pub mod engine;
pub mod errors;
pub mod utils;

pub use engine::TaxEngine;
pub use errors::{Result, TaxError};

pub use praxis_config::{ConfigError, ConfigManager, TaxConfig};
pub use praxis_core::{
    AggregateRow, AggregationService, CalculatorService, ComplianceHealth, ComplianceReport,
    ComplianceService, Deadline, FilterPredicate, GroupKey, ObligationLedger, PaymentAllocator,
    PaymentReceipt, RecordFilter,
};
pub use praxis_domain as domain;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Praxis tax engine tracing initialized.");
    });
}
