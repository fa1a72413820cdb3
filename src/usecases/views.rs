//! Read models returned to the presentation layer.
//!
//! Built from a `Snapshot` of the store; every total is derived on the spot through
//! `domain::aggregation`.

use crate::domain::aggregation::{self, BusinessSummary, PeriodReport, Tally};
use crate::domain::{
    Category, CategoryId, Client, ClientId, DomainError, EntryLine, Project, ProjectId,
    StoreCounts, TimeEntry,
};
use crate::ports::LedgerStore;
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::HashMap;

/// Result of a write command: success flag and a user-facing message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandOutcome {
    pub success: bool,
    pub message: String,
}

impl CommandOutcome {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClientRow {
    pub client: Client,
    pub project_count: usize,
    pub totals: Tally,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectRow {
    pub project: Project,
    pub client_name: String,
    pub category_name: Option<String>,
    pub totals: Tally,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClientDetail {
    pub client: Client,
    pub projects: Vec<ProjectRow>,
    pub total: Tally,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectDetail {
    pub project: Project,
    pub client: Client,
    pub category: Option<Category>,
    /// Newest first.
    pub entries: Vec<EntryLine>,
    pub totals: Tally,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryRow {
    pub category: Category,
    pub project_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecentEntries {
    pub days: u32,
    pub since: NaiveDate,
    /// Newest first.
    pub lines: Vec<EntryLine>,
    pub total: Tally,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeriodProjectRow {
    pub project_id: ProjectId,
    pub project_name: String,
    pub client_name: String,
    pub tally: Tally,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeriodView {
    pub report: PeriodReport,
    pub projects: Vec<PeriodProjectRow>,
    /// Entries inside the window, newest first. Used for export.
    pub lines: Vec<EntryLine>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoreOverview {
    pub counts: StoreCounts,
    pub summary: BusinessSummary,
    pub latest: Vec<EntryLine>,
    pub top_clients: Vec<(String, f64)>,
}

/// Everything needed to derive totals, loaded in one pass.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub clients: Vec<Client>,
    pub projects: Vec<Project>,
    pub entries: Vec<TimeEntry>,
    pub categories: Vec<Category>,
}

impl Snapshot {
    pub async fn load(store: &dyn LedgerStore) -> Result<Self, DomainError> {
        Ok(Self {
            clients: store.list_clients().await?,
            projects: store.list_projects().await?,
            entries: store.list_time_entries().await?,
            categories: store.list_categories(true).await?,
        })
    }

    pub fn client_names(&self) -> HashMap<ClientId, &str> {
        self.clients
            .iter()
            .map(|c| (c.id, c.name.as_str()))
            .collect()
    }

    pub fn category_names(&self) -> HashMap<CategoryId, &str> {
        self.categories
            .iter()
            .map(|c| (c.id, c.name.as_str()))
            .collect()
    }

    pub fn project(&self, id: ProjectId) -> Option<&Project> {
        self.projects.iter().find(|p| p.id == id)
    }

    /// One row per project. Name lookups are built once for the whole listing.
    pub fn project_rows<'a>(&self, projects: impl IntoIterator<Item = &'a Project>) -> Vec<ProjectRow> {
        let clients = self.client_names();
        let categories = self.category_names();
        projects
            .into_iter()
            .map(|project| ProjectRow {
                project: project.clone(),
                client_name: clients
                    .get(&project.client_id)
                    .map(|n| n.to_string())
                    .unwrap_or_default(),
                category_name: project
                    .category_id
                    .and_then(|id| categories.get(&id).map(|n| n.to_string())),
                totals: aggregation::project_totals(project, &self.entries),
            })
            .collect()
    }

    /// Join entries with their project and client. Order is preserved.
    pub fn lines<'a>(&self, entries: impl IntoIterator<Item = &'a TimeEntry>) -> Vec<EntryLine> {
        let clients = self.client_names();
        let projects: HashMap<ProjectId, &Project> =
            self.projects.iter().map(|p| (p.id, p)).collect();
        entries
            .into_iter()
            .map(|entry| {
                let project = projects.get(&entry.project_id);
                let hourly_rate = project.map(|p| p.hourly_rate).unwrap_or(0.0);
                EntryLine {
                    entry: entry.clone(),
                    project_name: project.map(|p| p.name.clone()).unwrap_or_default(),
                    client_name: project
                        .and_then(|p| clients.get(&p.client_id))
                        .map(|n| n.to_string())
                        .unwrap_or_default(),
                    hourly_rate,
                    earnings: entry.earnings_at(hourly_rate),
                }
            })
            .collect()
    }
}
