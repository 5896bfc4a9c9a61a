//! Compliance scoring over obligations and checklist items.
//!
//! Read-only: nothing here changes obligation or item status.

use std::collections::BTreeMap;

use chrono::{Duration, NaiveDate};
use praxis_domain::{
    money::completion_score, ComplianceItem, ComplianceSettings, Dated, Priority, TaxObligation,
};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::debug;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DeadlineSource {
    Obligation,
    ChecklistItem,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
/// An unsettled obligation or open checklist item with a due date.
pub struct Deadline {
    pub id: Uuid,
    pub source: DeadlineSource,
    pub title: String,
    /// Tax kind for obligations, checklist category for items.
    pub category: String,
    pub due_date: NaiveDate,
    pub priority: Priority,
    pub amount_due: Option<Decimal>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CategoryScore {
    pub category: String,
    pub completed: usize,
    pub total: usize,
    pub score: Decimal,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ComplianceHealth {
    Healthy,
    Warning,
    Critical,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ComplianceReport {
    pub as_of: NaiveDate,
    /// Percent of obligations fully paid; 100 when nothing is owed.
    pub global_score: Decimal,
    /// Percent of applicable checklist items completed; 100 when none apply.
    pub checklist_score: Decimal,
    pub per_category: Vec<CategoryScore>,
    pub overdue: Vec<Deadline>,
    /// Ascending by due date.
    pub upcoming: Vec<Deadline>,
    pub health: ComplianceHealth,
}

impl ComplianceReport {
    /// The first `count` upcoming deadlines.
    pub fn next_deadlines(&self, count: usize) -> &[Deadline] {
        &self.upcoming[..count.min(self.upcoming.len())]
    }
}

pub struct ComplianceService;

impl ComplianceService {
    pub fn score(
        obligations: &[TaxObligation],
        items: &[ComplianceItem],
        as_of: NaiveDate,
        settings: &ComplianceSettings,
    ) -> ComplianceReport {
        let paid = obligations.iter().filter(|o| o.is_settled()).count();
        let global_score = completion_score(paid, obligations.len());

        let applicable: Vec<&ComplianceItem> = items.iter().filter(|i| i.is_applicable()).collect();
        let completed = applicable.iter().filter(|i| i.is_completed()).count();
        let checklist_score = completion_score(completed, applicable.len());

        let per_category = Self::category_scores(items);

        let horizon = as_of
            .checked_add_signed(Duration::days(i64::from(settings.upcoming_window_days)))
            .unwrap_or(NaiveDate::MAX);
        let mut overdue = Vec::new();
        let mut upcoming = Vec::new();
        for deadline in open_deadlines(obligations, items) {
            if deadline.due_date < as_of {
                overdue.push(deadline);
            } else if deadline.due_date <= horizon {
                upcoming.push(deadline);
            }
        }
        sort_deadlines(&mut overdue);
        sort_deadlines(&mut upcoming);

        let health = Self::health(global_score, checklist_score, &overdue, settings);
        debug!(
            %as_of,
            global_score = %global_score,
            checklist_score = %checklist_score,
            overdue = overdue.len(),
            upcoming = upcoming.len(),
            "compliance scored"
        );

        ComplianceReport {
            as_of,
            global_score,
            checklist_score,
            per_category,
            overdue,
            upcoming,
            health,
        }
    }

    /// Completed/applicable ratio per checklist category, sorted by category name.
    pub fn category_scores(items: &[ComplianceItem]) -> Vec<CategoryScore> {
        let mut groups: BTreeMap<&str, (usize, usize)> = BTreeMap::new();
        for item in items {
            let entry = groups.entry(item.category.as_str()).or_default();
            if item.is_applicable() {
                entry.1 += 1;
                if item.is_completed() {
                    entry.0 += 1;
                }
            }
        }
        groups
            .into_iter()
            .map(|(category, (completed, total))| CategoryScore {
                category: category.to_string(),
                completed,
                total,
                score: completion_score(completed, total),
            })
            .collect()
    }

    fn health(
        global_score: Decimal,
        checklist_score: Decimal,
        overdue: &[Deadline],
        settings: &ComplianceSettings,
    ) -> ComplianceHealth {
        let weakest = global_score.min(checklist_score);
        let by_score = if weakest >= settings.healthy_threshold {
            ComplianceHealth::Healthy
        } else if weakest >= settings.warning_threshold {
            ComplianceHealth::Warning
        } else {
            ComplianceHealth::Critical
        };
        let urgent_overdue = overdue.iter().any(|d| d.priority == Priority::High);
        if urgent_overdue && by_score == ComplianceHealth::Healthy {
            ComplianceHealth::Warning
        } else {
            by_score
        }
    }
}

fn open_deadlines<'a>(
    obligations: &'a [TaxObligation],
    items: &'a [ComplianceItem],
) -> impl Iterator<Item = Deadline> + 'a {
    let from_obligations = obligations
        .iter()
        .filter(|o| !o.is_settled())
        .map(|o| Deadline {
            id: o.id(),
            source: DeadlineSource::Obligation,
            title: o.description.clone(),
            category: o.kind.to_string(),
            due_date: o.due_date(),
            priority: o.priority,
            amount_due: Some(o.remaining_amount()),
        });
    let from_items = items
        .iter()
        .filter(|i| i.is_open())
        .filter_map(|i| {
            i.deadline().map(|due_date| Deadline {
                id: i.id,
                source: DeadlineSource::ChecklistItem,
                title: i.title.clone(),
                category: i.category.clone(),
                due_date,
                priority: i.priority,
                amount_due: None,
            })
        });
    from_obligations.chain(from_items)
}

fn sort_deadlines(deadlines: &mut [Deadline]) {
    deadlines.sort_by(|a, b| {
        a.due_date
            .cmp(&b.due_date)
            .then(a.priority.cmp(&b.priority))
            .then_with(|| a.title.cmp(&b.title))
    });
}
