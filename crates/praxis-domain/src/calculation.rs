//! Value objects returned by the tax calculators.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::common::TaxKind;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
/// Output of any calculator. Never mutated after creation.
pub struct CalculationResult {
    pub base_amount: Decimal,
    /// Effective rate in percent.
    pub tax_rate: Decimal,
    pub tax_amount: Decimal,
    pub total_amount: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deductions: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub net_taxable: Option<Decimal>,
}

impl CalculationResult {
    /// True when the computed tax is a credit owed back to the taxpayer.
    pub fn is_refundable(&self) -> bool {
        self.tax_amount < Decimal::ZERO
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
/// Portion of income taxed inside a single bracket.
pub struct BracketSlice {
    pub lower_bound: Decimal,
    pub upper_bound: Option<Decimal>,
    pub rate: Decimal,
    pub taxed_amount: Decimal,
    pub tax: Decimal,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
/// Employee and employer contributions computed on the same gross salary.
pub struct SocialContribution {
    pub gross: Decimal,
    pub employee: CalculationResult,
    pub employer: CalculationResult,
    pub net_salary: Decimal,
    pub employer_cost: Decimal,
}

impl SocialContribution {
    pub fn total_contributions(&self) -> Decimal {
        self.employee.tax_amount.saturating_add(self.employer.tax_amount)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
/// Collected versus deductible tax for one kind over a period.
pub struct VatPosition {
    pub kind: TaxKind,
    pub collected: Decimal,
    pub deductible: Decimal,
    /// `collected - deductible`; negative values are credits.
    pub net_due: Decimal,
    pub taxable_sales: Decimal,
    pub taxable_purchases: Decimal,
}

impl VatPosition {
    pub fn is_credit(&self) -> bool {
        self.net_due < Decimal::ZERO
    }
}
