//! In-memory collection of obligations.
//!
//! The backing store is private; callers read through [`ObligationLedger::get`] and
//! [`ObligationLedger::list`] and change amounts only via [`ObligationLedger::apply_payment`].

use chrono::NaiveDate;
use praxis_domain::{NewObligation, ObligationStatus, PaymentMethod, TaxObligation};
use rust_decimal::Decimal;
use tracing::info;
use uuid::Uuid;

use crate::{CoreError, CoreResult, PaymentAllocator, PaymentReceipt};

#[derive(Debug, Clone, Default)]
pub struct ObligationLedger {
    obligations: Vec<TaxObligation>,
}

impl ObligationLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a ledger from existing records, rejecting duplicate ids.
    pub fn from_obligations(
        obligations: impl IntoIterator<Item = TaxObligation>,
        as_of: NaiveDate,
    ) -> CoreResult<Self> {
        let mut ledger = Self::new();
        for obligation in obligations {
            ledger.register(obligation, as_of)?;
        }
        Ok(ledger)
    }

    /// Adds an obligation and classifies it against `as_of`.
    pub fn register(&mut self, mut obligation: TaxObligation, as_of: NaiveDate) -> CoreResult<Uuid> {
        let id = obligation.id();
        if self.position(id).is_some() {
            return Err(CoreError::DuplicateObligation(id));
        }
        obligation.refresh_status(as_of);
        info!(
            obligation = %id,
            kind = %obligation.kind,
            period = %obligation.period,
            tax = %obligation.tax_amount(),
            "obligation registered"
        );
        self.obligations.push(obligation);
        Ok(id)
    }

    /// Creates an obligation from a draft and registers it.
    pub fn create(&mut self, draft: NewObligation, as_of: NaiveDate) -> CoreResult<Uuid> {
        let obligation = TaxObligation::new(draft)?;
        self.register(obligation, as_of)
    }

    pub fn get(&self, id: Uuid) -> CoreResult<&TaxObligation> {
        self.obligations
            .iter()
            .find(|obligation| obligation.id() == id)
            .ok_or(CoreError::NotFound(id))
    }

    /// Read-only view in registration order.
    pub fn list(&self) -> &[TaxObligation] {
        &self.obligations
    }

    pub fn len(&self) -> usize {
        self.obligations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.obligations.is_empty()
    }

    pub fn apply_payment(
        &mut self,
        id: Uuid,
        amount: Decimal,
        method: PaymentMethod,
        as_of: NaiveDate,
    ) -> CoreResult<PaymentReceipt> {
        let index = self.position(id).ok_or(CoreError::NotFound(id))?;
        PaymentAllocator::apply_payment(&mut self.obligations[index], amount, method, as_of)
    }

    /// Reclassifies every obligation for `as_of`. Returns how many changed status.
    pub fn refresh_statuses(&mut self, as_of: NaiveDate) -> usize {
        let mut changed = 0;
        for obligation in &mut self.obligations {
            let before = obligation.status();
            obligation.refresh_status(as_of);
            if obligation.status() != before {
                changed += 1;
            }
        }
        changed
    }

    pub fn by_status(&self, status: ObligationStatus) -> Vec<&TaxObligation> {
        self.obligations
            .iter()
            .filter(|obligation| obligation.status() == status)
            .collect()
    }

    pub fn outstanding_total(&self) -> Decimal {
        self.obligations
            .iter()
            .map(TaxObligation::remaining_amount)
            .fold(Decimal::ZERO, Decimal::saturating_add)
    }

    pub fn paid_total(&self) -> Decimal {
        self.obligations
            .iter()
            .map(TaxObligation::paid_amount)
            .fold(Decimal::ZERO, Decimal::saturating_add)
    }

    fn position(&self, id: Uuid) -> Option<usize> {
        self.obligations
            .iter()
            .position(|obligation| obligation.id() == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use praxis_domain::{Priority, TaxKind};
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn draft(period: &str, due: NaiveDate, tax: Decimal) -> NewObligation {
        NewObligation::new(TaxKind::Vat, period, due, tax * dec!(5), tax).with_priority(Priority::High)
    }

    #[test]
    fn register_classifies_against_as_of() {
        let mut ledger = ObligationLedger::new();
        let late = ledger
            .create(draft("2024-01", date(2024, 2, 25), dec!(300)), date(2024, 3, 1))
            .unwrap();
        let current = ledger
            .create(draft("2024-02", date(2024, 3, 25), dec!(200)), date(2024, 3, 1))
            .unwrap();
        assert_eq!(ledger.get(late).unwrap().status(), ObligationStatus::Overdue);
        assert_eq!(ledger.get(current).unwrap().status(), ObligationStatus::Pending);
        assert_eq!(ledger.outstanding_total(), dec!(500));
    }

    #[test]
    fn duplicate_registration_is_rejected() {
        let obligation = TaxObligation::new(draft("2024-01", date(2024, 2, 25), dec!(10))).unwrap();
        let mut ledger = ObligationLedger::new();
        ledger.register(obligation.clone(), date(2024, 1, 1)).unwrap();
        assert_eq!(
            ledger.register(obligation.clone(), date(2024, 1, 1)),
            Err(CoreError::DuplicateObligation(obligation.id()))
        );
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn unknown_id_is_not_found() {
        let mut ledger = ObligationLedger::new();
        let missing = Uuid::new_v4();
        assert_eq!(ledger.get(missing).unwrap_err(), CoreError::NotFound(missing));
        assert_eq!(
            ledger
                .apply_payment(missing, dec!(10), PaymentMethod::Cash, date(2024, 1, 1))
                .unwrap_err(),
            CoreError::NotFound(missing)
        );
    }

    #[test]
    fn payments_flow_through_the_ledger() {
        let mut ledger = ObligationLedger::new();
        let id = ledger
            .create(draft("2024-02", date(2024, 3, 25), dec!(400)), date(2024, 3, 1))
            .unwrap();
        let receipt = ledger
            .apply_payment(id, dec!(150), PaymentMethod::BankTransfer, date(2024, 3, 5))
            .unwrap();
        assert_eq!(receipt.obligation.status(), ObligationStatus::Partial);
        assert_eq!(ledger.paid_total(), dec!(150));
        assert_eq!(ledger.by_status(ObligationStatus::Partial).len(), 1);
    }

    #[test]
    fn refresh_statuses_reports_changes() {
        let mut ledger = ObligationLedger::new();
        ledger
            .create(draft("2024-02", date(2024, 3, 25), dec!(400)), date(2024, 3, 1))
            .unwrap();
        ledger
            .create(draft("2024-03", date(2024, 4, 25), dec!(400)), date(2024, 3, 1))
            .unwrap();
        assert_eq!(ledger.refresh_statuses(date(2024, 4, 1)), 1);
        assert_eq!(ledger.by_status(ObligationStatus::Overdue).len(), 1);
        assert_eq!(ledger.refresh_statuses(date(2024, 4, 1)), 0);
    }
}
