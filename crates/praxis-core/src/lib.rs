//! praxis-core
//!
//! Tax computation, obligation ledger, compliance scoring and budget reporting.
//! Depends on praxis-domain. No storage, no clock reads: every date is supplied by the caller.

pub mod aggregation_service;
pub mod calculator_service;
pub mod compliance_service;
pub mod error;
pub mod obligation_ledger;
pub mod payment_service;

pub use aggregation_service::*;
pub use calculator_service::*;
pub use compliance_service::*;
pub use error::{CoreError, CoreResult};
pub use obligation_ledger::*;
pub use payment_service::*;

#[cfg(test)]
mod tests;
