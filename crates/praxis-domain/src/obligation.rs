//! Fiscal obligations and the payment allocation rules that drive their lifecycle.
//!
//! Amounts and status are private: the only writers are [`TaxObligation::allocate`]
//! and [`TaxObligation::refresh_status`], both of which rederive `status` from the
//! amounts and the due date.

use std::fmt;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{calculation::CalculationResult, common::*};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ObligationStatus {
    Pending,
    Partial,
    Paid,
    Overdue,
}

impl ObligationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ObligationStatus::Pending => "pending",
            ObligationStatus::Partial => "partial",
            ObligationStatus::Paid => "paid",
            ObligationStatus::Overdue => "overdue",
        }
    }
}

impl fmt::Display for ObligationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    BankTransfer,
    Check,
    Cash,
    Card,
    DirectDebit,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::BankTransfer => "bank_transfer",
            PaymentMethod::Check => "check",
            PaymentMethod::Cash => "cash",
            PaymentMethod::Card => "card",
            PaymentMethod::DirectDebit => "direct_debit",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            PaymentMethod::BankTransfer => "Bank transfer",
            PaymentMethod::Check => "Check",
            PaymentMethod::Cash => "Cash",
            PaymentMethod::Card => "Card",
            PaymentMethod::DirectDebit => "Direct debit",
        };
        f.write_str(label)
    }
}

/// Input for creating an obligation, either typed by hand or drafted from a calculation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewObligation {
    pub kind: TaxKind,
    pub period: String,
    pub description: String,
    pub due_date: NaiveDate,
    pub base_amount: Decimal,
    pub tax_amount: Decimal,
    pub priority: Priority,
    pub notes: Option<String>,
}

impl NewObligation {
    pub fn new(
        kind: TaxKind,
        period: impl Into<String>,
        due_date: NaiveDate,
        base_amount: Decimal,
        tax_amount: Decimal,
    ) -> Self {
        let period = period.into();
        Self {
            description: format!("{kind} {period}"),
            kind,
            period,
            due_date,
            base_amount,
            tax_amount,
            priority: Priority::default(),
            notes: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}

/// A fiscal obligation with its payment state.
///
/// Deserialization validates the stored amounts and recomputes `remaining_amount`
/// and `status` instead of trusting the serialized values.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(try_from = "StoredObligation")]
pub struct TaxObligation {
    id: Uuid,
    pub kind: TaxKind,
    pub period: String,
    pub description: String,
    due_date: NaiveDate,
    base_amount: Decimal,
    tax_amount: Decimal,
    status: ObligationStatus,
    pub priority: Priority,
    paid_amount: Decimal,
    remaining_amount: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    payment_method: Option<PaymentMethod>,
    #[serde(skip_serializing_if = "Option::is_none")]
    last_payment_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl TaxObligation {
    /// Creates an unpaid obligation. A zero tax amount is settled from the start.
    pub fn new(draft: NewObligation) -> Result<Self, ObligationError> {
        if draft.base_amount < Decimal::ZERO {
            return Err(ObligationError::NegativeBase(draft.base_amount));
        }
        if draft.tax_amount < Decimal::ZERO {
            return Err(ObligationError::NegativeTax(draft.tax_amount));
        }
        let status = derive_status(draft.tax_amount, Decimal::ZERO, draft.due_date, None);
        Ok(Self {
            id: Uuid::new_v4(),
            kind: draft.kind,
            period: draft.period,
            description: draft.description,
            due_date: draft.due_date,
            base_amount: draft.base_amount,
            tax_amount: draft.tax_amount,
            status,
            priority: draft.priority,
            paid_amount: Decimal::ZERO,
            remaining_amount: draft.tax_amount,
            payment_method: None,
            last_payment_date: None,
            notes: draft.notes,
        })
    }

    /// Creates an obligation whose amounts come from a calculator result.
    pub fn from_calculation(
        mut draft: NewObligation,
        result: &CalculationResult,
    ) -> Result<Self, ObligationError> {
        draft.base_amount = result.base_amount;
        draft.tax_amount = result.tax_amount;
        Self::new(draft)
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn due_date(&self) -> NaiveDate {
        self.due_date
    }

    pub fn base_amount(&self) -> Decimal {
        self.base_amount
    }

    pub fn tax_amount(&self) -> Decimal {
        self.tax_amount
    }

    pub fn paid_amount(&self) -> Decimal {
        self.paid_amount
    }

    pub fn remaining_amount(&self) -> Decimal {
        self.remaining_amount
    }

    pub fn status(&self) -> ObligationStatus {
        self.status
    }

    pub fn payment_method(&self) -> Option<PaymentMethod> {
        self.payment_method
    }

    pub fn last_payment_date(&self) -> Option<NaiveDate> {
        self.last_payment_date
    }

    pub fn is_settled(&self) -> bool {
        self.remaining_amount.is_zero()
    }

    /// Applies a payment made on `paid_on`, capping it at the remaining balance.
    pub fn allocate(
        &mut self,
        amount: Decimal,
        method: PaymentMethod,
        paid_on: NaiveDate,
    ) -> Result<PaymentOutcome, ObligationError> {
        if amount <= Decimal::ZERO {
            return Err(ObligationError::NonPositivePayment(amount));
        }
        let applied = amount.min(self.remaining_amount);
        let excess = amount - applied;

        self.paid_amount += applied;
        self.remaining_amount = remaining_for(self.tax_amount, self.paid_amount);
        self.payment_method = Some(method);
        self.last_payment_date = Some(paid_on);
        self.refresh_status(paid_on);

        let warning = (excess > Decimal::ZERO).then(|| OverpaymentWarning {
            obligation_id: self.id,
            requested: amount,
            applied,
            excess,
        });
        Ok(PaymentOutcome {
            applied,
            excess,
            warning,
        })
    }

    /// Rederives `status` for the given date without touching any amount.
    pub fn refresh_status(&mut self, as_of: NaiveDate) {
        self.status = derive_status(self.tax_amount, self.paid_amount, self.due_date, Some(as_of));
    }
}

/// Serialized shape of [`TaxObligation`]. Derived fields are ignored on input.
#[derive(Deserialize)]
struct StoredObligation {
    id: Uuid,
    kind: TaxKind,
    period: String,
    description: String,
    due_date: NaiveDate,
    base_amount: Decimal,
    tax_amount: Decimal,
    #[serde(default)]
    priority: Priority,
    #[serde(default)]
    paid_amount: Decimal,
    #[serde(default)]
    payment_method: Option<PaymentMethod>,
    #[serde(default)]
    last_payment_date: Option<NaiveDate>,
    #[serde(default)]
    notes: Option<String>,
}

impl TryFrom<StoredObligation> for TaxObligation {
    type Error = ObligationError;

    fn try_from(stored: StoredObligation) -> Result<Self, Self::Error> {
        if stored.base_amount < Decimal::ZERO {
            return Err(ObligationError::NegativeBase(stored.base_amount));
        }
        if stored.tax_amount < Decimal::ZERO {
            return Err(ObligationError::NegativeTax(stored.tax_amount));
        }
        if stored.paid_amount < Decimal::ZERO || stored.paid_amount > stored.tax_amount {
            return Err(ObligationError::InvalidPaidAmount(stored.paid_amount));
        }
        Ok(Self {
            id: stored.id,
            kind: stored.kind,
            period: stored.period,
            description: stored.description,
            due_date: stored.due_date,
            base_amount: stored.base_amount,
            tax_amount: stored.tax_amount,
            status: derive_status(stored.tax_amount, stored.paid_amount, stored.due_date, None),
            priority: stored.priority,
            paid_amount: stored.paid_amount,
            remaining_amount: remaining_for(stored.tax_amount, stored.paid_amount),
            payment_method: stored.payment_method,
            last_payment_date: stored.last_payment_date,
            notes: stored.notes,
        })
    }
}

impl Identifiable for TaxObligation {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Dated for TaxObligation {
    fn deadline(&self) -> Option<NaiveDate> {
        Some(self.due_date)
    }
}

fn remaining_for(tax_amount: Decimal, paid_amount: Decimal) -> Decimal {
    (tax_amount - paid_amount).max(Decimal::ZERO)
}

/// Status as a pure function of the amounts and the due date.
///
/// Without `as_of` no obligation can be overdue. An unpaid balance past its due
/// date reports `Overdue` even when partially paid.
pub fn derive_status(
    tax_amount: Decimal,
    paid_amount: Decimal,
    due_date: NaiveDate,
    as_of: Option<NaiveDate>,
) -> ObligationStatus {
    if remaining_for(tax_amount, paid_amount).is_zero() {
        ObligationStatus::Paid
    } else if as_of.is_some_and(|today| due_date < today) {
        ObligationStatus::Overdue
    } else if paid_amount > Decimal::ZERO {
        ObligationStatus::Partial
    } else {
        ObligationStatus::Pending
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Result of a single allocation.
pub struct PaymentOutcome {
    pub applied: Decimal,
    pub excess: Decimal,
    pub warning: Option<OverpaymentWarning>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
/// Raised alongside a successful allocation when the payment exceeded the balance.
pub struct OverpaymentWarning {
    pub obligation_id: Uuid,
    pub requested: Decimal,
    pub applied: Decimal,
    pub excess: Decimal,
}

impl fmt::Display for OverpaymentWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "payment of {} on obligation {} exceeds the balance; applied {}, {} left unallocated",
            self.requested, self.obligation_id, self.applied, self.excess
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Errors that can occur when creating or paying obligations.
pub enum ObligationError {
    NegativeBase(Decimal),
    NegativeTax(Decimal),
    NonPositivePayment(Decimal),
    /// A stored paid amount outside `0..=tax_amount`.
    InvalidPaidAmount(Decimal),
}

impl fmt::Display for ObligationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ObligationError::NegativeBase(amount) => {
                write!(f, "base amount must not be negative (got {amount})")
            }
            ObligationError::NegativeTax(amount) => {
                write!(f, "tax amount must not be negative (got {amount})")
            }
            ObligationError::NonPositivePayment(amount) => {
                write!(f, "payment amount must be positive (got {amount})")
            }
            ObligationError::InvalidPaidAmount(amount) => {
                write!(f, "paid amount must be between zero and the tax amount (got {amount})")
            }
        }
    }
}

impl std::error::Error for ObligationError {}
