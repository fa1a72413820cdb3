//! Domain entities. Pure data structures for the bookkeeping core.
//!
//! No storage types here; the persistence adapter maps rows into these.
//! Derived figures (hours, earnings) are never stored on an entity; see `aggregation`.

use crate::domain::DomainError;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub type ClientId = i64;
pub type ProjectId = i64;
pub type CategoryId = i64;
pub type TimeEntryId = i64;

/// Hourly rate applied when a project is created without one.
pub const DEFAULT_HOURLY_RATE: f64 = 25.0;

/// A party the freelancer bills for work.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Client {
    pub id: ClientId,
    pub name: String,
    pub email: String,
    pub company: Option<String>,
    pub phone: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A unit of billable work for one client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: ProjectId,
    pub name: String,
    pub description: Option<String>,
    pub hourly_rate: f64,
    pub status: ProjectStatus,
    pub deadline: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub client_id: ClientId,
    pub category_id: Option<CategoryId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectStatus {
    #[default]
    Active,
    Completed,
    Paused,
}

impl ProjectStatus {
    pub const ALL: [ProjectStatus; 3] = [
        ProjectStatus::Active,
        ProjectStatus::Completed,
        ProjectStatus::Paused,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ProjectStatus::Active => "active",
            ProjectStatus::Completed => "completed",
            ProjectStatus::Paused => "paused",
        }
    }
}

impl fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProjectStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "active" => Ok(ProjectStatus::Active),
            "completed" => Ok(ProjectStatus::Completed),
            "paused" => Ok(ProjectStatus::Paused),
            other => Err(DomainError::Validation(format!(
                "unknown project status '{}' (expected active, completed or paused)",
                other
            ))),
        }
    }
}

/// Classification label attached to projects. Soft association only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub description: Option<String>,
    /// Hex colour like `#FF5733`.
    pub color_code: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// A single logged work session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeEntry {
    pub id: TimeEntryId,
    pub project_id: ProjectId,
    pub date: NaiveDate,
    pub hours_worked: f64,
    pub description: String,
    pub task_type: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl TimeEntry {
    /// Earnings for this entry at the given rate.
    pub fn earnings_at(&self, hourly_rate: f64) -> f64 {
        self.hours_worked * hourly_rate
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Inputs for create operations. Ids and timestamps are assigned by the store.
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewClient {
    pub name: String,
    pub email: String,
    pub company: Option<String>,
    pub phone: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewProject {
    pub name: String,
    pub client_id: ClientId,
    pub hourly_rate: f64,
    pub description: Option<String>,
    pub status: ProjectStatus,
    pub deadline: Option<NaiveDate>,
    pub category_id: Option<CategoryId>,
}

impl NewProject {
    pub fn new(name: impl Into<String>, client_id: ClientId, hourly_rate: f64) -> Self {
        Self {
            name: name.into(),
            client_id,
            hourly_rate,
            description: None,
            status: ProjectStatus::Active,
            deadline: None,
            category_id: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewTimeEntry {
    pub project_id: ProjectId,
    pub date: NaiveDate,
    pub hours_worked: f64,
    pub description: String,
    pub task_type: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewCategory {
    pub name: String,
    pub description: Option<String>,
    pub color_code: Option<String>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Field-level updates. Only the listed fields may change; identity, creation
// time and ownership edges (client_id, project_id) are not representable here.
//
// `None` leaves a field untouched. For optional columns the inner `None`
// clears the stored value.
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClientUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub company: Option<Option<String>>,
    pub phone: Option<Option<String>>,
    pub notes: Option<Option<String>>,
}

impl ClientUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.email.is_none()
            && self.company.is_none()
            && self.phone.is_none()
            && self.notes.is_none()
    }

    pub fn apply_to(&self, client: &mut Client) {
        if let Some(name) = &self.name {
            client.name = name.clone();
        }
        if let Some(email) = &self.email {
            client.email = email.clone();
        }
        if let Some(company) = &self.company {
            client.company = company.clone();
        }
        if let Some(phone) = &self.phone {
            client.phone = phone.clone();
        }
        if let Some(notes) = &self.notes {
            client.notes = notes.clone();
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectUpdate {
    pub name: Option<String>,
    pub description: Option<Option<String>>,
    pub hourly_rate: Option<f64>,
    pub status: Option<ProjectStatus>,
    pub deadline: Option<Option<NaiveDate>>,
    pub category_id: Option<Option<CategoryId>>,
}

impl ProjectUpdate {
    pub fn status(status: ProjectStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.hourly_rate.is_none()
            && self.status.is_none()
            && self.deadline.is_none()
            && self.category_id.is_none()
    }

    pub fn apply_to(&self, project: &mut Project) {
        if let Some(name) = &self.name {
            project.name = name.clone();
        }
        if let Some(description) = &self.description {
            project.description = description.clone();
        }
        if let Some(rate) = self.hourly_rate {
            project.hourly_rate = rate;
        }
        if let Some(status) = self.status {
            project.status = status;
        }
        if let Some(deadline) = self.deadline {
            project.deadline = deadline;
        }
        if let Some(category_id) = self.category_id {
            project.category_id = category_id;
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TimeEntryUpdate {
    pub date: Option<NaiveDate>,
    pub hours_worked: Option<f64>,
    pub description: Option<String>,
    pub task_type: Option<Option<String>>,
}

impl TimeEntryUpdate {
    pub fn is_empty(&self) -> bool {
        self.date.is_none()
            && self.hours_worked.is_none()
            && self.description.is_none()
            && self.task_type.is_none()
    }

    pub fn apply_to(&self, entry: &mut TimeEntry) {
        if let Some(date) = self.date {
            entry.date = date;
        }
        if let Some(hours) = self.hours_worked {
            entry.hours_worked = hours;
        }
        if let Some(description) = &self.description {
            entry.description = description.clone();
        }
        if let Some(task_type) = &self.task_type {
            entry.task_type = task_type.clone();
        }
    }
}

/// A time entry joined with the names and rate needed to display or export it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntryLine {
    pub entry: TimeEntry,
    pub project_name: String,
    pub client_name: String,
    pub hourly_rate: f64,
    pub earnings: f64,
}

/// Rows removed by a cascading client delete.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CascadeReport {
    pub projects: u64,
    pub time_entries: u64,
}

/// Row counts per table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StoreCounts {
    pub clients: u64,
    pub projects: u64,
    pub time_entries: u64,
    pub categories: u64,
}
