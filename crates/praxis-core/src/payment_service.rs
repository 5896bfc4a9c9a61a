//! Applies payments to obligations and reports what was applied.

use chrono::NaiveDate;
use praxis_domain::{
    OverpaymentWarning, PaymentMethod, TaxObligation, TaxTransaction, TransactionCategory,
    TransactionStatus,
};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::{CoreError, CoreResult};

/// Snapshot of an obligation right after a payment, plus what happened to the money.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct PaymentReceipt {
    pub obligation: TaxObligation,
    pub method: PaymentMethod,
    pub paid_on: NaiveDate,
    pub applied: Decimal,
    pub excess: Decimal,
    pub warning: Option<OverpaymentWarning>,
}

impl PaymentReceipt {
    pub fn has_warning(&self) -> bool {
        self.warning.is_some()
    }

    /// Settlement echo for the transaction journal.
    ///
    /// The echo is a separate record; the obligation itself was already updated.
    /// Both `amount` and `tax_amount` carry the applied settlement.
    pub fn audit_transaction(&self) -> TaxTransaction {
        TaxTransaction {
            id: Uuid::new_v4(),
            date: self.paid_on,
            kind: self.obligation.kind.clone(),
            description: format!("Payment: {}", self.obligation.description),
            amount: self.applied,
            tax_amount: self.applied,
            tax_rate: Decimal::ZERO,
            category: TransactionCategory::Payment,
            status: TransactionStatus::Recorded,
            reference: Some(self.obligation.id().to_string()),
        }
    }
}

pub struct PaymentAllocator;

impl PaymentAllocator {
    /// Applies `amount` to the obligation, capping at the remaining balance.
    ///
    /// An overpayment still succeeds; the excess is returned with a warning for the
    /// caller to resolve. `as_of` is both the payment date and the reference date
    /// for overdue classification.
    pub fn apply_payment(
        obligation: &mut TaxObligation,
        amount: Decimal,
        method: PaymentMethod,
        as_of: NaiveDate,
    ) -> CoreResult<PaymentReceipt> {
        let outcome = obligation.allocate(amount, method, as_of).map_err(|err| {
            warn!(obligation = %obligation.id(), "payment rejected: {}", err);
            CoreError::from(err)
        })?;

        if let Some(warning) = &outcome.warning {
            warn!(obligation = %obligation.id(), "{}", warning);
        }
        info!(
            obligation = %obligation.id(),
            applied = %outcome.applied,
            remaining = %obligation.remaining_amount(),
            status = %obligation.status(),
            method = %method,
            "payment applied"
        );

        Ok(PaymentReceipt {
            obligation: obligation.clone(),
            method,
            paid_on: as_of,
            applied: outcome.applied,
            excess: outcome.excess,
            warning: outcome.warning,
        })
    }
}
