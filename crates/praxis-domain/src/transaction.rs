//! Dated financial events feeding period tax computation.

use std::fmt;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::common::*;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TaxTransaction {
    pub id: Uuid,
    pub date: NaiveDate,
    pub kind: TaxKind,
    pub description: String,
    /// Pre-tax base.
    pub amount: Decimal,
    pub tax_amount: Decimal,
    /// Percent.
    pub tax_rate: Decimal,
    pub category: TransactionCategory,
    pub status: TransactionStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
}

impl TaxTransaction {
    /// `tax_amount` is `amount * tax_rate / 100`, saturating at the `Decimal` bounds.
    pub fn new(
        date: NaiveDate,
        kind: TaxKind,
        description: impl Into<String>,
        amount: Decimal,
        tax_rate: Decimal,
        category: TransactionCategory,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            date,
            kind,
            description: description.into(),
            amount,
            tax_amount: amount.saturating_mul(tax_rate) / Decimal::ONE_HUNDRED,
            tax_rate,
            category,
            status: TransactionStatus::Recorded,
            reference: None,
        }
    }

    pub fn with_reference(mut self, reference: impl Into<String>) -> Self {
        self.reference = Some(reference.into());
        self
    }

    pub fn with_status(mut self, status: TransactionStatus) -> Self {
        self.status = status;
        self
    }
}

impl Identifiable for TaxTransaction {
    fn id(&self) -> Uuid {
        self.id
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum TransactionCategory {
    /// Sale side, tax collected.
    Income,
    /// Purchase side, tax that offsets what is owed.
    Deductible,
    /// Settlement echo of an obligation payment.
    Payment,
}

impl TransactionCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionCategory::Income => "income",
            TransactionCategory::Deductible => "deductible",
            TransactionCategory::Payment => "payment",
        }
    }
}

impl fmt::Display for TransactionCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum TransactionStatus {
    #[default]
    Recorded,
    Processed,
    Verified,
}

impl TransactionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionStatus::Recorded => "recorded",
            TransactionStatus::Processed => "processed",
            TransactionStatus::Verified => "verified",
        }
    }
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
