//! Progressive and flat-rate tax calculators.

use praxis_domain::{
    money::{apply_rate, percent_of},
    BracketSlice, BracketTable, CalculationResult, DateRange, SocialContribution, SocialRates,
    TaxKind, TaxTransaction, TransactionCategory, VatPosition, VatRateClass, VatRates,
};
use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::{CoreError, CoreResult};

/// Stateless calculators. Results keep full decimal precision.
pub struct CalculatorService;

impl CalculatorService {
    /// Marginal bracket sum: each slice of income is taxed only at its own bracket's rate.
    pub fn compute_progressive_tax(
        net_taxable: Decimal,
        brackets: &BracketTable,
    ) -> CoreResult<CalculationResult> {
        let slices = Self::progressive_breakdown(net_taxable, brackets)?;
        let tax_amount = slices
            .iter()
            .try_fold(Decimal::ZERO, |acc, slice| acc.checked_add(slice.tax))
            .ok_or_else(|| out_of_range("bracket tax sum"))?;
        let tax_rate = if net_taxable.is_zero() {
            Decimal::ZERO
        } else {
            percent_of(tax_amount, net_taxable).ok_or_else(|| out_of_range("effective rate"))?
        };
        let total_amount = net_taxable
            .checked_add(tax_amount)
            .ok_or_else(|| out_of_range("total amount"))?;
        let result = CalculationResult {
            base_amount: net_taxable,
            tax_rate,
            tax_amount,
            total_amount,
            deductions: None,
            net_taxable: Some(net_taxable),
        };
        debug!(
            net_taxable = %net_taxable,
            tax = %result.tax_amount,
            effective_rate = %result.tax_rate,
            "progressive tax computed"
        );
        Ok(result)
    }

    /// Per-bracket detail for the brackets the income reaches.
    pub fn progressive_breakdown(
        net_taxable: Decimal,
        brackets: &BracketTable,
    ) -> CoreResult<Vec<BracketSlice>> {
        if net_taxable < Decimal::ZERO {
            warn!(net_taxable = %net_taxable, "rejected negative taxable income");
            return Err(CoreError::InvalidInput(format!(
                "taxable income must not be negative (got {net_taxable})"
            )));
        }
        let mut slices = Vec::new();
        for (lower_bound, upper_bound, rate) in brackets.segments() {
            if net_taxable <= lower_bound {
                break;
            }
            let ceiling = upper_bound.map_or(net_taxable, |bound| bound.min(net_taxable));
            let taxed_amount = ceiling - lower_bound;
            slices.push(BracketSlice {
                lower_bound,
                upper_bound,
                rate,
                taxed_amount,
                tax: apply_rate(taxed_amount, rate).ok_or_else(|| out_of_range("bracket tax"))?,
            });
        }
        Ok(slices)
    }

    /// `tax = (base - deductions) * rate / 100`, `total = base + tax`.
    ///
    /// Deductions larger than the base yield a negative (refundable) tax; it is not clamped.
    pub fn compute_flat_tax(
        base_amount: Decimal,
        rate: Decimal,
        deductions: Decimal,
    ) -> CoreResult<CalculationResult> {
        if base_amount < Decimal::ZERO {
            return Err(reject("base amount", base_amount));
        }
        if rate < Decimal::ZERO {
            return Err(reject("rate", rate));
        }
        if deductions < Decimal::ZERO {
            return Err(reject("deductions", deductions));
        }
        let net_taxable = base_amount - deductions;
        let tax_amount = apply_rate(net_taxable, rate).ok_or_else(|| out_of_range("tax amount"))?;
        let total_amount = base_amount
            .checked_add(tax_amount)
            .ok_or_else(|| out_of_range("total amount"))?;
        let result = CalculationResult {
            base_amount,
            tax_rate: rate,
            tax_amount,
            total_amount,
            deductions: Some(deductions),
            net_taxable: Some(net_taxable),
        };
        debug!(
            base = %base_amount,
            rate = %rate,
            deductions = %deductions,
            tax = %tax_amount,
            "flat tax computed"
        );
        Ok(result)
    }

    /// Sale-side VAT for a rate class. `deductions` is input VAT base already paid on purchases.
    pub fn compute_vat(
        base_amount: Decimal,
        class: VatRateClass,
        deductions: Decimal,
        rates: &VatRates,
    ) -> CoreResult<CalculationResult> {
        Self::compute_flat_tax(base_amount, rates.rate_for(class), deductions)
    }

    /// Runs the flat calculator once per rate and combines both sides.
    pub fn compute_social_contributions(
        gross: Decimal,
        rates: &SocialRates,
    ) -> CoreResult<SocialContribution> {
        let employee = Self::compute_flat_tax(gross, rates.employee, Decimal::ZERO)?;
        let employer = Self::compute_flat_tax(gross, rates.employer, Decimal::ZERO)?;
        let employer_cost = gross
            .checked_add(employer.tax_amount)
            .ok_or_else(|| out_of_range("employer cost"))?;
        Ok(SocialContribution {
            gross,
            net_salary: gross - employee.tax_amount,
            employer_cost,
            employee,
            employer,
        })
    }

    /// Collected versus deductible tax of one kind within `range`.
    ///
    /// Payment echoes are settlement records and do not enter the position.
    /// Sums saturate at the `Decimal` bounds.
    pub fn period_vat_position(
        transactions: &[TaxTransaction],
        kind: &TaxKind,
        range: &DateRange,
    ) -> VatPosition {
        let mut position = VatPosition {
            kind: kind.clone(),
            collected: Decimal::ZERO,
            deductible: Decimal::ZERO,
            net_due: Decimal::ZERO,
            taxable_sales: Decimal::ZERO,
            taxable_purchases: Decimal::ZERO,
        };
        for txn in transactions
            .iter()
            .filter(|txn| &txn.kind == kind && range.contains(txn.date))
        {
            match txn.category {
                TransactionCategory::Income => {
                    position.collected = position.collected.saturating_add(txn.tax_amount);
                    position.taxable_sales = position.taxable_sales.saturating_add(txn.amount);
                }
                TransactionCategory::Deductible => {
                    position.deductible = position.deductible.saturating_add(txn.tax_amount);
                    position.taxable_purchases =
                        position.taxable_purchases.saturating_add(txn.amount);
                }
                TransactionCategory::Payment => {}
            }
        }
        position.net_due = position.collected.saturating_sub(position.deductible);
        position
    }
}

fn reject(field: &str, value: Decimal) -> CoreError {
    warn!(field, value = %value, "rejected negative calculator input");
    CoreError::InvalidInput(format!("{field} must not be negative (got {value})"))
}

fn out_of_range(what: &str) -> CoreError {
    warn!(what, "calculator result left the decimal range");
    CoreError::InvalidInput(format!("amount out of range ({what} overflows)"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use praxis_domain::TaxBracket;
    use rust_decimal_macros::dec;

    fn table() -> BracketTable {
        BracketTable::new(vec![
            TaxBracket::bounded(dec!(5000), dec!(0)),
            TaxBracket::bounded(dec!(20000), dec!(26)),
            TaxBracket::unbounded(dec!(28)),
        ])
        .unwrap()
    }

    #[test]
    fn tax_at_boundary_sums_lower_segments() {
        let result = CalculatorService::compute_progressive_tax(dec!(20000), &table()).unwrap();
        assert_eq!(result.tax_amount, dec!(3900));
        assert_eq!(result.tax_rate, dec!(19.5));
    }

    #[test]
    fn income_above_top_bound_uses_open_bracket() {
        let result = CalculatorService::compute_progressive_tax(dec!(30000), &table()).unwrap();
        assert_eq!(result.tax_amount, dec!(6700));
        let slices = CalculatorService::progressive_breakdown(dec!(30000), &table()).unwrap();
        assert_eq!(slices.len(), 3);
        assert_eq!(slices[2].taxed_amount, dec!(10000));
        assert_eq!(slices[2].tax, dec!(2800));
    }

    #[test]
    fn zero_income_has_zero_tax_and_rate() {
        let result = CalculatorService::compute_progressive_tax(Decimal::ZERO, &table()).unwrap();
        assert_eq!(result.tax_amount, Decimal::ZERO);
        assert_eq!(result.tax_rate, Decimal::ZERO);
        assert!(CalculatorService::progressive_breakdown(Decimal::ZERO, &table())
            .unwrap()
            .is_empty());
    }

    #[test]
    fn negative_income_is_invalid() {
        let err = CalculatorService::compute_progressive_tax(dec!(-1), &table()).unwrap_err();
        assert!(matches!(err, CoreError::InvalidInput(_)));
    }

    #[test]
    fn flat_tax_gross_total_and_deductions() {
        let gross = CalculatorService::compute_flat_tax(dec!(1000), dec!(19), Decimal::ZERO).unwrap();
        assert_eq!(gross.total_amount, dec!(1190));

        let deducted = CalculatorService::compute_flat_tax(dec!(1000), dec!(19), dec!(200)).unwrap();
        assert_eq!(deducted.tax_amount, dec!(152));
        assert_eq!(deducted.net_taxable, Some(dec!(800)));
    }

    #[test]
    fn deductions_above_base_surface_a_credit() {
        let result = CalculatorService::compute_flat_tax(dec!(100), dec!(19), dec!(300)).unwrap();
        assert_eq!(result.tax_amount, dec!(-38));
        assert!(result.is_refundable());
    }

    #[test]
    fn negative_rate_is_invalid() {
        assert!(CalculatorService::compute_flat_tax(dec!(100), dec!(-5), Decimal::ZERO).is_err());
    }

    #[test]
    fn social_contributions_combine_both_rates() {
        let rates = SocialRates {
            employee: dec!(10),
            employer: dec!(20),
        };
        let contribution = CalculatorService::compute_social_contributions(dec!(3000), &rates).unwrap();
        assert_eq!(contribution.employee.tax_amount, dec!(300));
        assert_eq!(contribution.employer.tax_amount, dec!(600));
        assert_eq!(contribution.net_salary, dec!(2700));
        assert_eq!(contribution.employer_cost, dec!(3600));
        assert_eq!(contribution.total_contributions(), dec!(900));
    }

    #[test]
    fn vat_position_nets_collected_against_deductible() {
        let day = |d| NaiveDate::from_ymd_opt(2024, 3, d).unwrap();
        let transactions = vec![
            TaxTransaction::new(day(5), TaxKind::Vat, "Consultations", dec!(1000), dec!(19), TransactionCategory::Income),
            TaxTransaction::new(day(9), TaxKind::Vat, "Supplies", dec!(400), dec!(19), TransactionCategory::Deductible),
            TaxTransaction::new(day(20), TaxKind::Vat, "February VAT", dec!(90), dec!(0), TransactionCategory::Payment),
            TaxTransaction::new(day(21), TaxKind::IncomeTax, "Advance", dec!(500), dec!(10), TransactionCategory::Income),
        ];
        let range = DateRange::new(day(1), day(31)).unwrap();
        let position = CalculatorService::period_vat_position(&transactions, &TaxKind::Vat, &range);
        assert_eq!(position.collected, dec!(190));
        assert_eq!(position.deductible, dec!(76));
        assert_eq!(position.net_due, dec!(114));
        assert_eq!(position.taxable_sales, dec!(1000));
        assert!(!position.is_credit());
    }

    #[test]
    fn amounts_beyond_decimal_range_are_invalid() {
        let err = CalculatorService::compute_flat_tax(Decimal::MAX / dec!(2), dec!(19), Decimal::ZERO)
            .unwrap_err();
        assert!(matches!(err, CoreError::InvalidInput(ref msg) if msg.contains("out of range")));

        let err = CalculatorService::compute_progressive_tax(Decimal::MAX, &table()).unwrap_err();
        assert!(matches!(err, CoreError::InvalidInput(_)));

        let rates = SocialRates {
            employee: dec!(10),
            employer: dec!(20),
        };
        assert!(CalculatorService::compute_social_contributions(Decimal::MAX, &rates).is_err());
    }
}
