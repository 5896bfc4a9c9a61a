//! praxis-domain
//!
//! Pure fiscal domain models (obligations, tax transactions, checklist items,
//! rate tables, calculation results, reporting records).
//! No I/O, no logging, no storage. Only data types, enums and invariants.

pub mod calculation;
pub mod common;
pub mod compliance;
pub mod money;
pub mod obligation;
pub mod rates;
pub mod reporting;
pub mod transaction;

pub use calculation::*;
pub use common::*;
pub use compliance::*;
pub use obligation::*;
pub use rates::*;
pub use reporting::*;
pub use transaction::*;
