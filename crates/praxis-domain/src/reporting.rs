//! Records consumed by the budget/actual reports and the budget rows they are compared to.

use std::fmt;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    common::Identifiable,
    obligation::PaymentMethod,
    transaction::TaxTransaction,
};

/// Uniform view over anything the aggregator can filter and group.
pub trait ReportRecord {
    fn date(&self) -> NaiveDate;
    fn amount(&self) -> Decimal;
    fn category_key(&self) -> Option<&str>;
    fn status_key(&self) -> &str;
    fn method_key(&self) -> Option<&str> {
        None
    }
    fn supplier_key(&self) -> Option<&str> {
        None
    }
    /// Free-text fields searched by text filters (description, reference, counterparty).
    fn search_fields(&self) -> Vec<&str>;
}

impl ReportRecord for TaxTransaction {
    fn date(&self) -> NaiveDate {
        self.date
    }

    fn amount(&self) -> Decimal {
        self.amount
    }

    fn category_key(&self) -> Option<&str> {
        Some(self.category.as_str())
    }

    fn status_key(&self) -> &str {
        self.status.as_str()
    }

    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.description.as_str()];
        fields.extend(self.reference.as_deref());
        fields
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum ExpenseStatus {
    #[default]
    Pending,
    Paid,
}

impl ExpenseStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExpenseStatus::Pending => "pending",
            ExpenseStatus::Paid => "paid",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
/// A practice expense (supplies, rent, equipment).
pub struct ExpenseEntry {
    pub id: Uuid,
    pub date: NaiveDate,
    pub category: String,
    pub supplier: String,
    pub description: String,
    pub amount: Decimal,
    #[serde(default)]
    pub status: ExpenseStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<PaymentMethod>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
}

impl ExpenseEntry {
    pub fn new(
        date: NaiveDate,
        category: impl Into<String>,
        supplier: impl Into<String>,
        description: impl Into<String>,
        amount: Decimal,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            date,
            category: category.into(),
            supplier: supplier.into(),
            description: description.into(),
            amount,
            status: ExpenseStatus::Pending,
            payment_method: None,
            reference: None,
        }
    }

    pub fn paid_with(mut self, method: PaymentMethod) -> Self {
        self.status = ExpenseStatus::Paid;
        self.payment_method = Some(method);
        self
    }

    pub fn with_reference(mut self, reference: impl Into<String>) -> Self {
        self.reference = Some(reference.into());
        self
    }
}

impl Identifiable for ExpenseEntry {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl ReportRecord for ExpenseEntry {
    fn date(&self) -> NaiveDate {
        self.date
    }

    fn amount(&self) -> Decimal {
        self.amount
    }

    fn category_key(&self) -> Option<&str> {
        Some(self.category.as_str())
    }

    fn status_key(&self) -> &str {
        self.status.as_str()
    }

    fn method_key(&self) -> Option<&str> {
        self.payment_method.as_ref().map(PaymentMethod::as_str)
    }

    fn supplier_key(&self) -> Option<&str> {
        Some(self.supplier.as_str())
    }

    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.description.as_str(), self.supplier.as_str()];
        fields.extend(self.reference.as_deref());
        fields
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum CollectionStatus {
    Received,
    #[default]
    Pending,
    Rejected,
}

impl CollectionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CollectionStatus::Received => "received",
            CollectionStatus::Pending => "pending",
            CollectionStatus::Rejected => "rejected",
        }
    }
}

impl fmt::Display for CollectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
/// Money received from a patient or an insurer.
pub struct CollectionEntry {
    pub id: Uuid,
    pub date: NaiveDate,
    pub payer: String,
    pub description: String,
    pub amount: Decimal,
    pub method: PaymentMethod,
    #[serde(default)]
    pub status: CollectionStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
}

impl CollectionEntry {
    pub fn new(
        date: NaiveDate,
        payer: impl Into<String>,
        description: impl Into<String>,
        amount: Decimal,
        method: PaymentMethod,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            date,
            payer: payer.into(),
            description: description.into(),
            amount,
            method,
            status: CollectionStatus::Pending,
            category: None,
            reference: None,
        }
    }

    pub fn with_status(mut self, status: CollectionStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_reference(mut self, reference: impl Into<String>) -> Self {
        self.reference = Some(reference.into());
        self
    }
}

impl Identifiable for CollectionEntry {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl ReportRecord for CollectionEntry {
    fn date(&self) -> NaiveDate {
        self.date
    }

    fn amount(&self) -> Decimal {
        self.amount
    }

    fn category_key(&self) -> Option<&str> {
        self.category.as_deref()
    }

    fn status_key(&self) -> &str {
        self.status.as_str()
    }

    fn method_key(&self) -> Option<&str> {
        Some(self.method.as_str())
    }

    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.description.as_str(), self.payer.as_str()];
        fields.extend(self.reference.as_deref());
        fields
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
/// Budget line for one category.
///
/// `actual_amount` has no incremental setter; it only comes from a full recomputation.
pub struct CategoryBudget {
    pub name: String,
    pub budget_limit: Decimal,
    #[serde(default)]
    actual_amount: Decimal,
}

impl CategoryBudget {
    pub fn new(name: impl Into<String>, budget_limit: Decimal) -> Self {
        Self {
            name: name.into(),
            budget_limit,
            actual_amount: Decimal::ZERO,
        }
    }

    pub fn actual_amount(&self) -> Decimal {
        self.actual_amount
    }

    /// Returns a copy carrying a freshly computed actual amount.
    pub fn recomputed(&self, actual_amount: Decimal) -> Self {
        Self {
            name: self.name.clone(),
            budget_limit: self.budget_limit,
            actual_amount,
        }
    }

    pub fn remaining(&self) -> Decimal {
        self.budget_limit - self.actual_amount
    }

    pub fn is_over_budget(&self) -> bool {
        self.actual_amount > self.budget_limit
    }
}
