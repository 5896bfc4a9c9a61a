use chrono::{Duration, NaiveDate};
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::{
    aggregation_service::{AggregationService, GroupKey, RecordFilter},
    calculator_service::CalculatorService,
    compliance_service::{ComplianceHealth, ComplianceService},
    obligation_ledger::ObligationLedger,
    payment_service::PaymentAllocator,
};
use praxis_domain::{
    derive_status, BracketTable, CategoryBudget, ComplianceItem, ComplianceSettings,
    ComplianceStatus, DateRange, ExpenseEntry, NewObligation, ObligationStatus, PaymentMethod,
    Priority, TaxBracket, TaxKind, TaxObligation, TaxTransaction, TransactionCategory,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn brackets() -> BracketTable {
    BracketTable::new(vec![
        TaxBracket::bounded(dec!(5000), dec!(0)),
        TaxBracket::bounded(dec!(20000), dec!(26)),
        TaxBracket::unbounded(dec!(28)),
    ])
    .expect("valid table")
}

#[test]
fn calculated_vat_becomes_a_payable_obligation() {
    let result = CalculatorService::compute_flat_tax(dec!(1000), dec!(19), dec!(200)).expect("vat");
    let draft = NewObligation::new(TaxKind::Vat, "2024-03", date(2024, 4, 25), Decimal::ZERO, Decimal::ZERO);
    let obligation = TaxObligation::from_calculation(draft, &result).expect("obligation");
    assert_eq!(obligation.tax_amount(), dec!(152));
    assert_eq!(obligation.base_amount(), dec!(1000));

    let mut ledger = ObligationLedger::new();
    let id = ledger.register(obligation, date(2024, 4, 1)).expect("register");
    ledger
        .apply_payment(id, dec!(100), PaymentMethod::BankTransfer, date(2024, 4, 10))
        .expect("first payment");
    let receipt = ledger
        .apply_payment(id, dec!(100), PaymentMethod::BankTransfer, date(2024, 4, 20))
        .expect("second payment");

    assert_eq!(receipt.applied, dec!(52));
    assert_eq!(receipt.excess, dec!(48));
    assert_eq!(ledger.get(id).expect("stored").status(), ObligationStatus::Paid);
}

#[test]
fn late_partial_payment_stays_overdue() {
    let mut ledger = ObligationLedger::new();
    let id = ledger
        .create(
            NewObligation::new(TaxKind::IncomeTax, "2023", date(2024, 5, 25), dec!(20000), dec!(3900)),
            date(2024, 5, 1),
        )
        .expect("create");
    let receipt = ledger
        .apply_payment(id, dec!(1000), PaymentMethod::Card, date(2024, 6, 1))
        .expect("pay");
    assert_eq!(receipt.obligation.status(), ObligationStatus::Overdue);
    assert_eq!(receipt.obligation.remaining_amount(), dec!(2900));
}

#[test]
fn payment_echo_does_not_change_vat_position() {
    let mut ledger = ObligationLedger::new();
    let id = ledger
        .create(
            NewObligation::new(TaxKind::Vat, "2024-02", date(2024, 3, 25), dec!(1000), dec!(190)),
            date(2024, 3, 1),
        )
        .expect("create");
    let receipt = ledger
        .apply_payment(id, dec!(190), PaymentMethod::BankTransfer, date(2024, 3, 20))
        .expect("pay");

    let journal = vec![
        TaxTransaction::new(date(2024, 3, 3), TaxKind::Vat, "Sales", dec!(1000), dec!(19), TransactionCategory::Income),
        receipt.audit_transaction(),
    ];
    let march = DateRange::new(date(2024, 3, 1), date(2024, 3, 31)).expect("range");
    let position = CalculatorService::period_vat_position(&journal, &TaxKind::Vat, &march);
    assert_eq!(position.net_due, dec!(190));
}

#[test]
fn compliance_reflects_ledger_state() {
    let mut ledger = ObligationLedger::new();
    let as_of = date(2024, 4, 1);
    let paid = ledger
        .create(
            NewObligation::new(TaxKind::Vat, "2024-02", date(2024, 3, 25), dec!(1000), dec!(190)),
            date(2024, 3, 1),
        )
        .expect("create");
    ledger
        .apply_payment(paid, dec!(190), PaymentMethod::BankTransfer, date(2024, 3, 20))
        .expect("pay");
    ledger
        .create(
            NewObligation::new(TaxKind::Vat, "2024-03", date(2024, 4, 25), dec!(1000), dec!(190))
                .with_priority(Priority::High),
            as_of,
        )
        .expect("create");

    let items = vec![
        ComplianceItem::new("VAT", "Keep sales register", ComplianceStatus::Completed),
        ComplianceItem::new("VAT", "File annual summary", ComplianceStatus::Pending)
            .with_due_date(date(2024, 4, 15)),
    ];
    let report = ComplianceService::score(ledger.list(), &items, as_of, &ComplianceSettings::default());

    assert_eq!(report.global_score, dec!(50));
    assert_eq!(report.checklist_score, dec!(50));
    assert_eq!(report.health, ComplianceHealth::Warning);
    let titles: Vec<_> = report.upcoming.iter().map(|d| d.title.as_str()).collect();
    assert_eq!(titles, vec!["File annual summary", "VAT 2024-03"]);
    assert_eq!(report.next_deadlines(1).len(), 1);
}

#[test]
fn budgets_refresh_and_aggregate_consistently() {
    let expenses = vec![
        ExpenseEntry::new(date(2024, 1, 3), "Supplies", "MedSupply", "Gloves", dec!(300)),
        ExpenseEntry::new(date(2024, 1, 9), "Supplies", "MedSupply", "Masks", dec!(50)),
        ExpenseEntry::new(date(2024, 1, 12), "Rent", "Landlord SA", "January", dec!(1500)),
    ];
    let budgets = vec![CategoryBudget::new("Supplies", dec!(250))];
    let filter = RecordFilter::new();

    let refreshed = AggregationService::refresh_budgets(&budgets, &expenses, &filter);
    assert!(refreshed[0].is_over_budget());
    assert_eq!(refreshed[0].remaining(), dec!(-100));

    let rows = AggregationService::aggregate(&expenses, GroupKey::Category, &filter, Some(&refreshed));
    let supplies = rows.iter().find(|row| row.group_value == "Supplies").expect("row");
    assert_eq!(supplies.actual_total, refreshed[0].actual_amount());
    assert_eq!(supplies.variance_pct, Some(dec!(40)));
}

fn money() -> impl Strategy<Value = Decimal> {
    (0i64..5_000_000).prop_map(|cents| Decimal::new(cents, 2))
}

proptest! {
    #[test]
    fn progressive_tax_is_monotonic(a in money(), b in money()) {
        let (low, high) = if a <= b { (a, b) } else { (b, a) };
        let table = brackets();
        let low_tax = CalculatorService::compute_progressive_tax(low, &table).unwrap().tax_amount;
        let high_tax = CalculatorService::compute_progressive_tax(high, &table).unwrap().tax_amount;
        prop_assert!(low_tax <= high_tax);
        prop_assert!(low_tax >= Decimal::ZERO);
    }

    #[test]
    fn breakdown_sums_to_total(income in money()) {
        let table = brackets();
        let result = CalculatorService::compute_progressive_tax(income, &table).unwrap();
        let slices = CalculatorService::progressive_breakdown(income, &table).unwrap();
        let taxed: Decimal = slices.iter().map(|s| s.taxed_amount).sum();
        let tax: Decimal = slices.iter().map(|s| s.tax).sum();
        prop_assert_eq!(taxed, income);
        prop_assert_eq!(tax, result.tax_amount);
    }

    #[test]
    fn allocation_keeps_amounts_balanced(
        tax in money(),
        payments in prop::collection::vec((1i64..2_000_000, 0i64..90), 1..8),
    ) {
        let due = date(2024, 3, 25);
        let start = date(2024, 2, 1);
        let mut obligation = TaxObligation::new(
            NewObligation::new(TaxKind::Vat, "2024-02", due, tax, tax),
        ).unwrap();
        let mut paid_so_far = Decimal::ZERO;
        for (cents, offset) in payments {
            let amount = Decimal::new(cents, 2);
            let paid_on = start + Duration::days(offset);
            let receipt = PaymentAllocator::apply_payment(&mut obligation, amount, PaymentMethod::Cash, paid_on).unwrap();
            paid_so_far += receipt.applied;

            prop_assert_eq!(receipt.applied + receipt.excess, amount);
            prop_assert_eq!(obligation.paid_amount() + obligation.remaining_amount(), obligation.tax_amount());
            prop_assert_eq!(obligation.paid_amount(), paid_so_far);
            prop_assert!(obligation.remaining_amount() >= Decimal::ZERO);
            prop_assert_eq!(receipt.warning.is_some(), receipt.excess > Decimal::ZERO);
            prop_assert_eq!(
                obligation.status(),
                derive_status(obligation.tax_amount(), obligation.paid_amount(), due, Some(paid_on))
            );
        }
    }

    #[test]
    fn filter_order_does_not_matter(day in 1u32..28, needle in "(gloves|rent|med|x)") {
        let expenses = vec![
            ExpenseEntry::new(date(2024, 1, 3), "Supplies", "MedSupply", "Gloves", dec!(300)),
            ExpenseEntry::new(date(2024, 1, 12), "Rent", "Landlord SA", "Rent January", dec!(1500)),
            ExpenseEntry::new(date(2024, 1, 20), "Supplies", "MedSupply", "Masks", dec!(50)),
        ];
        let range = DateRange::new(date(2024, 1, day), date(2024, 1, 31)).unwrap();
        let forward = RecordFilter::new().date_range(range).search(needle.clone()).category("Supplies");
        let backward = RecordFilter::new().category("Supplies").search(needle).date_range(range);
        prop_assert_eq!(forward.apply(&expenses), backward.apply(&expenses));
    }
}
