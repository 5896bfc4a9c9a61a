//! Checklist entries tracked for compliance scoring.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::common::*;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ComplianceItem {
    pub id: Uuid,
    pub category: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub status: ComplianceStatus,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl ComplianceItem {
    pub fn new(category: impl Into<String>, title: impl Into<String>, status: ComplianceStatus) -> Self {
        Self {
            id: Uuid::new_v4(),
            category: category.into(),
            title: title.into(),
            description: String::new(),
            status,
            priority: Priority::default(),
            due_date: None,
            last_updated: None,
            notes: None,
        }
    }

    pub fn with_due_date(mut self, due_date: NaiveDate) -> Self {
        self.due_date = Some(due_date);
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    /// Items marked not applicable are left out of every score.
    pub fn is_applicable(&self) -> bool {
        self.status != ComplianceStatus::NotApplicable
    }

    pub fn is_completed(&self) -> bool {
        self.status == ComplianceStatus::Completed
    }

    /// Applicable and not yet completed.
    pub fn is_open(&self) -> bool {
        self.is_applicable() && !self.is_completed()
    }
}

impl Identifiable for ComplianceItem {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Dated for ComplianceItem {
    fn deadline(&self) -> Option<NaiveDate> {
        self.due_date
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ComplianceStatus {
    Completed,
    Pending,
    Overdue,
    NotApplicable,
}

impl fmt::Display for ComplianceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ComplianceStatus::Completed => "completed",
            ComplianceStatus::Pending => "pending",
            ComplianceStatus::Overdue => "overdue",
            ComplianceStatus::NotApplicable => "not_applicable",
        };
        f.write_str(label)
    }
}

/// Tunables for deadline windows and the health indicator.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ComplianceSettings {
    #[serde(default = "ComplianceSettings::default_upcoming_window_days")]
    pub upcoming_window_days: u32,
    /// Minimum score (percent) for a healthy indicator.
    #[serde(default = "ComplianceSettings::default_healthy_threshold")]
    pub healthy_threshold: Decimal,
    /// Minimum score (percent) below which the indicator turns critical.
    #[serde(default = "ComplianceSettings::default_warning_threshold")]
    pub warning_threshold: Decimal,
}

impl ComplianceSettings {
    pub fn default_upcoming_window_days() -> u32 {
        30
    }

    pub fn default_healthy_threshold() -> Decimal {
        Decimal::from(80)
    }

    pub fn default_warning_threshold() -> Decimal {
        Decimal::from(50)
    }
}

impl Default for ComplianceSettings {
    fn default() -> Self {
        Self {
            upcoming_window_days: Self::default_upcoming_window_days(),
            healthy_threshold: Self::default_healthy_threshold(),
            warning_threshold: Self::default_warning_threshold(),
        }
    }
}
