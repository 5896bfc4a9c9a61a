//! Binds a validated [`TaxConfig`] to the calculators and an owned obligation ledger.

use chrono::NaiveDate;
use praxis_config::{ConfigManager, TaxConfig};
use praxis_core::{
    AggregateRow, AggregationService, CalculatorService, ComplianceReport, ComplianceService,
    GroupKey, ObligationLedger, PaymentReceipt, RecordFilter,
};
use praxis_domain::{
    BracketSlice, CalculationResult, CategoryBudget, ComplianceItem, DateRange, NewObligation,
    ObligationStatus, PaymentMethod, ReportRecord, SocialContribution, TaxKind, TaxObligation,
    TaxTransaction, VatPosition, VatRateClass,
};
use rust_decimal::Decimal;
use tracing::info;
use uuid::Uuid;

use crate::errors::Result;

#[derive(Debug, Clone)]
pub struct TaxEngine {
    config: TaxConfig,
    ledger: ObligationLedger,
}

impl TaxEngine {
    /// Fails when the configuration does not validate.
    pub fn new(config: TaxConfig) -> Result<Self> {
        config.validate()?;
        info!(
            currency = %config.currency,
            brackets = config.brackets.len(),
            "tax engine ready"
        );
        Ok(Self {
            config,
            ledger: ObligationLedger::new(),
        })
    }

    pub fn from_manager(manager: &ConfigManager) -> Result<Self> {
        Self::new(manager.load()?)
    }

    /// Rebuilds an engine around obligations read back from storage, e.g. via serde.
    ///
    /// Every obligation is reclassified against `as_of`; duplicate ids are rejected.
    pub fn with_obligations(
        config: TaxConfig,
        obligations: impl IntoIterator<Item = TaxObligation>,
        as_of: NaiveDate,
    ) -> Result<Self> {
        let mut engine = Self::new(config)?;
        engine.ledger = ObligationLedger::from_obligations(obligations, as_of)?;
        Ok(engine)
    }

    pub fn config(&self) -> &TaxConfig {
        &self.config
    }

    pub fn ledger(&self) -> &ObligationLedger {
        &self.ledger
    }

    /// Progressive tax with the configured bracket table.
    pub fn income_tax(&self, net_taxable: Decimal) -> Result<CalculationResult> {
        Ok(CalculatorService::compute_progressive_tax(
            net_taxable,
            &self.config.brackets,
        )?)
    }

    pub fn income_tax_breakdown(&self, net_taxable: Decimal) -> Result<Vec<BracketSlice>> {
        Ok(CalculatorService::progressive_breakdown(
            net_taxable,
            &self.config.brackets,
        )?)
    }

    pub fn vat(
        &self,
        base_amount: Decimal,
        class: VatRateClass,
        deductions: Decimal,
    ) -> Result<CalculationResult> {
        Ok(CalculatorService::compute_vat(
            base_amount,
            class,
            deductions,
            &self.config.vat_rates,
        )?)
    }

    pub fn flat_tax(
        &self,
        base_amount: Decimal,
        rate: Decimal,
        deductions: Decimal,
    ) -> Result<CalculationResult> {
        Ok(CalculatorService::compute_flat_tax(
            base_amount,
            rate,
            deductions,
        )?)
    }

    pub fn social_contributions(&self, gross: Decimal) -> Result<SocialContribution> {
        Ok(CalculatorService::compute_social_contributions(
            gross,
            &self.config.social_rates,
        )?)
    }

    pub fn vat_position(&self, transactions: &[TaxTransaction], range: &DateRange) -> VatPosition {
        CalculatorService::period_vat_position(transactions, &TaxKind::Vat, range)
    }

    pub fn register_obligation(&mut self, draft: NewObligation, as_of: NaiveDate) -> Result<Uuid> {
        Ok(self.ledger.create(draft, as_of)?)
    }

    /// Registers an obligation whose amounts come from a calculator result.
    pub fn register_calculated(
        &mut self,
        draft: NewObligation,
        result: &CalculationResult,
        as_of: NaiveDate,
    ) -> Result<Uuid> {
        let obligation = TaxObligation::from_calculation(draft, result)?;
        Ok(self.ledger.register(obligation, as_of)?)
    }

    pub fn obligation(&self, id: Uuid) -> Result<&TaxObligation> {
        Ok(self.ledger.get(id)?)
    }

    pub fn obligations_with_status(&self, status: ObligationStatus) -> Vec<&TaxObligation> {
        self.ledger.by_status(status)
    }

    pub fn apply_payment(
        &mut self,
        id: Uuid,
        amount: Decimal,
        method: PaymentMethod,
        as_of: NaiveDate,
    ) -> Result<PaymentReceipt> {
        Ok(self.ledger.apply_payment(id, amount, method, as_of)?)
    }

    pub fn refresh_statuses(&mut self, as_of: NaiveDate) -> usize {
        self.ledger.refresh_statuses(as_of)
    }

    /// Scores the ledger and checklist with the configured window and thresholds.
    pub fn compliance(&self, items: &[ComplianceItem], as_of: NaiveDate) -> ComplianceReport {
        ComplianceService::score(self.ledger.list(), items, as_of, &self.config.compliance)
    }

    pub fn aggregate<R: ReportRecord>(
        &self,
        records: &[R],
        group: GroupKey,
        filter: &RecordFilter,
        budgets: Option<&[CategoryBudget]>,
    ) -> Vec<AggregateRow> {
        AggregationService::aggregate(records, group, filter, budgets)
    }
}
