//! Budget/actual aggregation shared by the expense, collections and tax reports.

use std::collections::BTreeMap;

use praxis_domain::{money::percent_of, CategoryBudget, DateRange, ReportRecord};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::debug;

const UNCATEGORIZED: &str = "Uncategorized";

#[derive(Debug, Clone, PartialEq, Eq)]
/// A single pure predicate over a record.
pub enum FilterPredicate {
    /// Inclusive on both ends.
    DateRange(DateRange),
    /// Case-insensitive substring across the record's search fields.
    Search(String),
    Category(String),
    Status(String),
    Method(String),
    Supplier(String),
}

impl FilterPredicate {
    pub fn matches<R: ReportRecord>(&self, record: &R) -> bool {
        match self {
            FilterPredicate::DateRange(range) => range.contains(record.date()),
            FilterPredicate::Search(needle) => {
                let needle = needle.trim().to_lowercase();
                needle.is_empty()
                    || record
                        .search_fields()
                        .iter()
                        .any(|field| field.to_lowercase().contains(&needle))
            }
            FilterPredicate::Category(value) => record.category_key() == Some(value.as_str()),
            FilterPredicate::Status(value) => record.status_key() == value,
            FilterPredicate::Method(value) => record.method_key() == Some(value.as_str()),
            FilterPredicate::Supplier(value) => record.supplier_key() == Some(value.as_str()),
        }
    }
}

/// Conjunction of predicates. Order of insertion never changes the result.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordFilter {
    predicates: Vec<FilterPredicate>,
}

impl RecordFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, predicate: FilterPredicate) -> Self {
        self.predicates.push(predicate);
        self
    }

    pub fn date_range(self, range: DateRange) -> Self {
        self.with(FilterPredicate::DateRange(range))
    }

    pub fn search(self, text: impl Into<String>) -> Self {
        self.with(FilterPredicate::Search(text.into()))
    }

    pub fn category(self, category: impl Into<String>) -> Self {
        self.with(FilterPredicate::Category(category.into()))
    }

    pub fn status(self, status: impl Into<String>) -> Self {
        self.with(FilterPredicate::Status(status.into()))
    }

    pub fn method(self, method: impl Into<String>) -> Self {
        self.with(FilterPredicate::Method(method.into()))
    }

    pub fn supplier(self, supplier: impl Into<String>) -> Self {
        self.with(FilterPredicate::Supplier(supplier.into()))
    }

    pub fn predicates(&self) -> &[FilterPredicate] {
        &self.predicates
    }

    pub fn matches<R: ReportRecord>(&self, record: &R) -> bool {
        self.predicates.iter().all(|predicate| predicate.matches(record))
    }

    pub fn apply<'a, R: ReportRecord>(&self, records: &'a [R]) -> Vec<&'a R> {
        records.iter().filter(|record| self.matches(*record)).collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Built-in grouping selectors. Use [`AggregationService::aggregate_by`] for anything else.
pub enum GroupKey {
    Category,
    Status,
    Method,
    Supplier,
    /// Calendar month as `YYYY-MM`.
    Month,
}

impl GroupKey {
    pub fn key_for<R: ReportRecord>(&self, record: &R) -> String {
        match self {
            GroupKey::Category => record.category_key().unwrap_or(UNCATEGORIZED).to_string(),
            GroupKey::Status => record.status_key().to_string(),
            GroupKey::Method => record.method_key().unwrap_or("unspecified").to_string(),
            GroupKey::Supplier => record.supplier_key().unwrap_or("unspecified").to_string(),
            GroupKey::Month => record.date().format("%Y-%m").to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct AggregateRow {
    pub group_value: String,
    pub count: usize,
    pub actual_total: Decimal,
    /// Share of the filtered total, in percent.
    pub share_pct: Option<Decimal>,
    pub budget_limit: Option<Decimal>,
    /// `(actual - budget) / budget * 100`.
    pub variance_pct: Option<Decimal>,
}

impl AggregateRow {
    pub fn is_over_budget(&self) -> bool {
        self.budget_limit
            .is_some_and(|limit| self.actual_total > limit)
    }
}

/// Stateless grouping reducers over any [`ReportRecord`].
pub struct AggregationService;

impl AggregationService {
    /// Filters, groups by `group` and sums record amounts.
    pub fn aggregate<R: ReportRecord>(
        records: &[R],
        group: GroupKey,
        filter: &RecordFilter,
        budgets: Option<&[CategoryBudget]>,
    ) -> Vec<AggregateRow> {
        Self::aggregate_by(
            records,
            filter,
            |record| group.key_for(record),
            |record| record.amount(),
            budgets,
        )
    }

    /// Generic reducer: arbitrary group selector and summed field.
    ///
    /// Filters run before grouping. When budgets are supplied, every budget line gets a
    /// row even without matching records. Rows are ordered by group value.
    pub fn aggregate_by<R, K, V>(
        records: &[R],
        filter: &RecordFilter,
        key: K,
        value: V,
        budgets: Option<&[CategoryBudget]>,
    ) -> Vec<AggregateRow>
    where
        R: ReportRecord,
        K: Fn(&R) -> String,
        V: Fn(&R) -> Decimal,
    {
        let mut groups: BTreeMap<String, (usize, Decimal)> = BTreeMap::new();
        let mut grand_total = Decimal::ZERO;
        for record in records.iter().filter(|record| filter.matches(*record)) {
            let amount = value(record);
            let entry = groups.entry(key(record)).or_insert((0, Decimal::ZERO));
            entry.0 += 1;
            entry.1 = entry.1.saturating_add(amount);
            grand_total = grand_total.saturating_add(amount);
        }

        let limits: BTreeMap<&str, Decimal> = budgets
            .unwrap_or_default()
            .iter()
            .map(|budget| (budget.name.as_str(), budget.budget_limit))
            .collect();
        for name in limits.keys() {
            groups
                .entry((*name).to_string())
                .or_insert((0, Decimal::ZERO));
        }

        let rows: Vec<AggregateRow> = groups
            .into_iter()
            .map(|(group_value, (count, actual_total))| {
                let budget_limit = limits.get(group_value.as_str()).copied();
                let variance_pct = budget_limit
                    .and_then(|limit| percent_of(actual_total.saturating_sub(limit), limit));
                AggregateRow {
                    share_pct: percent_of(actual_total, grand_total),
                    group_value,
                    count,
                    actual_total,
                    budget_limit,
                    variance_pct,
                }
            })
            .collect();
        debug!(
            records = records.len(),
            groups = rows.len(),
            total = %grand_total,
            "aggregation complete"
        );
        rows
    }

    /// Monthly totals in calendar order.
    pub fn monthly_trend<R: ReportRecord>(records: &[R], filter: &RecordFilter) -> Vec<AggregateRow> {
        Self::aggregate(records, GroupKey::Month, filter, None)
    }

    /// Sum of amounts passing the filter, saturating at the `Decimal` bounds.
    pub fn total<R: ReportRecord>(records: &[R], filter: &RecordFilter) -> Decimal {
        records
            .iter()
            .filter(|record| filter.matches(*record))
            .map(ReportRecord::amount)
            .fold(Decimal::ZERO, Decimal::saturating_add)
    }

    /// Recomputes every budget's actual amount from the current records.
    pub fn refresh_budgets<R: ReportRecord>(
        budgets: &[CategoryBudget],
        records: &[R],
        filter: &RecordFilter,
    ) -> Vec<CategoryBudget> {
        budgets
            .iter()
            .map(|budget| {
                let actual = records
                    .iter()
                    .filter(|record| filter.matches(*record))
                    .filter(|record| record.category_key() == Some(budget.name.as_str()))
                    .map(ReportRecord::amount)
                    .fold(Decimal::ZERO, Decimal::saturating_add);
                budget.recomputed(actual)
            })
            .collect()
    }
}
