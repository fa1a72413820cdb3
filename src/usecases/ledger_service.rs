//! Command layer: validate input, check references, write through the store.
//!
//! Write commands never return an error. Every `DomainError` is logged and turned into
//! a failed `CommandOutcome`, so the interactive loop always stays alive. Read commands
//! return typed views or the error for the caller to display.

use crate::domain::aggregation;
use crate::domain::validation;
use crate::domain::{
    CategoryId, ClientId, ClientUpdate, DomainError, NewCategory, NewClient, NewProject,
    NewTimeEntry, ProjectId, ProjectStatus, ProjectUpdate, TimeEntryId, TimeEntryUpdate,
};
use crate::ports::LedgerStore;
use crate::usecases::views::{
    CategoryRow, ClientDetail, ClientRow, CommandOutcome, ProjectDetail, ProjectRow, Snapshot,
};
use std::sync::Arc;
use tracing::{info, warn};

fn outcome(command: &'static str, result: Result<String, DomainError>) -> CommandOutcome {
    match result {
        Ok(message) => {
            info!(command, "command succeeded");
            CommandOutcome::ok(message)
        }
        Err(e) => {
            warn!(command, error = %e, "command failed");
            CommandOutcome::failed(e.to_string())
        }
    }
}

fn plural(n: u64, one: &str, many: &str) -> String {
    if n == 1 {
        format!("{} {}", n, one)
    } else {
        format!("{} {}", n, many)
    }
}

/// Ledger service. All commands for clients, projects, time entries and categories.
pub struct LedgerService {
    store: Arc<dyn LedgerStore>,
}

impl LedgerService {
    pub fn new(store: Arc<dyn LedgerStore>) -> Self {
        Self { store }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Clients
    // ─────────────────────────────────────────────────────────────────────────

    pub async fn add_client(&self, input: NewClient) -> CommandOutcome {
        outcome("add_client", self.try_add_client(input).await)
    }

    async fn try_add_client(&self, input: NewClient) -> Result<String, DomainError> {
        let input = validation::normalize_new_client(input)?;
        let client = self.store.insert_client(&input).await?;
        Ok(format!(
            "Client '{}' added successfully! (ID {})",
            client.name, client.id
        ))
    }

    pub async fn update_client(&self, id: ClientId, update: ClientUpdate) -> CommandOutcome {
        outcome("update_client", self.try_update_client(id, update).await)
    }

    async fn try_update_client(&self, id: ClientId, update: ClientUpdate) -> Result<String, DomainError> {
        if update.is_empty() {
            return Err(DomainError::validation("nothing to update"));
        }
        let update = validation::normalize_client_update(update)?;
        let client = self.store.update_client(id, &update).await?;
        Ok(format!("Client '{}' updated successfully!", client.name))
    }

    /// Deletes the client together with its projects and their time entries.
    pub async fn delete_client(&self, id: ClientId) -> CommandOutcome {
        outcome("delete_client", self.try_delete_client(id).await)
    }

    async fn try_delete_client(&self, id: ClientId) -> Result<String, DomainError> {
        let client = self.store.get_client(id).await?;
        let removed = self.store.delete_client(id).await?;
        Ok(format!(
            "Client '{}' deleted along with {} and {}.",
            client.name,
            plural(removed.projects, "project", "projects"),
            plural(removed.time_entries, "time entry", "time entries"),
        ))
    }

    pub async fn list_clients(&self) -> Result<Vec<ClientRow>, DomainError> {
        let snapshot = Snapshot::load(self.store.as_ref()).await?;
        Ok(snapshot
            .clients
            .iter()
            .map(|client| {
                let totals =
                    aggregation::client_totals(client.id, &snapshot.projects, &snapshot.entries);
                ClientRow {
                    client: client.clone(),
                    project_count: totals.projects.len(),
                    totals: totals.total,
                }
            })
            .collect())
    }

    /// Loads only the client's own projects and their entries.
    pub async fn view_client(&self, id: ClientId) -> Result<ClientDetail, DomainError> {
        let client = self.store.get_client(id).await?;
        let projects = self.store.list_projects_for_client(id).await?;
        let mut entries = Vec::new();
        for project in &projects {
            entries.extend(self.store.list_time_entries_for_project(project.id).await?);
        }
        let scoped = Snapshot {
            clients: vec![client.clone()],
            projects,
            entries,
            categories: self.store.list_categories(true).await?,
        };
        let totals = aggregation::client_totals(id, &scoped.projects, &scoped.entries);
        let projects = scoped.project_rows(&scoped.projects);
        Ok(ClientDetail {
            client,
            projects,
            total: totals.total,
        })
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Projects
    // ─────────────────────────────────────────────────────────────────────────

    pub async fn add_project(&self, input: NewProject) -> CommandOutcome {
        outcome("add_project", self.try_add_project(input).await)
    }

    async fn try_add_project(&self, input: NewProject) -> Result<String, DomainError> {
        let input = validation::normalize_new_project(input)?;
        let project = self.store.insert_project(&input).await?;
        let client = self.store.get_client(project.client_id).await?;
        Ok(format!(
            "Project '{}' created for {} at ${:.2}/hr! (ID {})",
            project.name, client.name, project.hourly_rate, project.id
        ))
    }

    pub async fn update_project(&self, id: ProjectId, update: ProjectUpdate) -> CommandOutcome {
        outcome("update_project", self.try_update_project(id, update).await)
    }

    async fn try_update_project(&self, id: ProjectId, update: ProjectUpdate) -> Result<String, DomainError> {
        if update.is_empty() {
            return Err(DomainError::validation("nothing to update"));
        }
        let update = validation::normalize_project_update(update)?;
        let project = self.store.update_project(id, &update).await?;
        Ok(format!("Project '{}' updated successfully!", project.name))
    }

    /// Any status may move to any other status.
    pub async fn change_status(&self, id: ProjectId, status: ProjectStatus) -> CommandOutcome {
        outcome("change_status", self.try_change_status(id, status).await)
    }

    async fn try_change_status(&self, id: ProjectId, status: ProjectStatus) -> Result<String, DomainError> {
        let project = self
            .store
            .update_project(id, &ProjectUpdate::status(status))
            .await?;
        Ok(format!(
            "Project '{}' status updated to '{}'",
            project.name, project.status
        ))
    }

    pub async fn delete_project(&self, id: ProjectId) -> CommandOutcome {
        outcome("delete_project", self.try_delete_project(id).await)
    }

    async fn try_delete_project(&self, id: ProjectId) -> Result<String, DomainError> {
        let project = self.store.get_project(id).await?;
        let removed = self.store.delete_project(id).await?;
        Ok(format!(
            "Project '{}' deleted along with {}.",
            project.name,
            plural(removed, "time entry", "time entries"),
        ))
    }

    pub async fn list_projects(&self) -> Result<Vec<ProjectRow>, DomainError> {
        let snapshot = Snapshot::load(self.store.as_ref()).await?;
        Ok(snapshot.project_rows(&snapshot.projects))
    }

    pub async fn view_project(&self, id: ProjectId) -> Result<ProjectDetail, DomainError> {
        let project = self.store.get_project(id).await?;
        let client = self.store.get_client(project.client_id).await?;
        let category = match project.category_id {
            Some(category_id) => Some(self.store.get_category(category_id).await?),
            None => None,
        };
        let scoped = Snapshot {
            clients: vec![client.clone()],
            projects: vec![project.clone()],
            entries: self.store.list_time_entries_for_project(id).await?,
            categories: Vec::new(),
        };
        let mut own: Vec<_> = scoped.entries.iter().collect();
        own.sort_by(|a, b| b.date.cmp(&a.date));
        let entries = scoped.lines(own);
        let totals = aggregation::project_totals(&project, &scoped.entries);
        Ok(ProjectDetail {
            project,
            client,
            category,
            entries,
            totals,
        })
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Time entries
    // ─────────────────────────────────────────────────────────────────────────

    pub async fn log_time(&self, input: NewTimeEntry) -> CommandOutcome {
        outcome("log_time", self.try_log_time(input).await)
    }

    async fn try_log_time(&self, input: NewTimeEntry) -> Result<String, DomainError> {
        let input = validation::normalize_new_time_entry(input)?;
        let entry = self.store.insert_time_entry(&input).await?;
        let project = self.store.get_project(entry.project_id).await?;
        Ok(format!(
            "Time logged: {}h on '{}' - Earned ${:.2}!",
            entry.hours_worked,
            project.name,
            entry.earnings_at(project.hourly_rate)
        ))
    }

    pub async fn update_time_entry(
        &self,
        id: TimeEntryId,
        update: TimeEntryUpdate,
    ) -> CommandOutcome {
        outcome("update_time_entry", self.try_update_time_entry(id, update).await)
    }

    async fn try_update_time_entry(
        &self,
        id: TimeEntryId,
        update: TimeEntryUpdate,
    ) -> Result<String, DomainError> {
        if update.is_empty() {
            return Err(DomainError::validation("nothing to update"));
        }
        let update = validation::normalize_time_entry_update(update)?;
        let entry = self.store.update_time_entry(id, &update).await?;
        Ok(format!(
            "Time entry {} updated: {}h on {}",
            entry.id, entry.hours_worked, entry.date
        ))
    }

    pub async fn delete_time_entry(&self, id: TimeEntryId) -> CommandOutcome {
        outcome("delete_time_entry", self.try_delete_time_entry(id).await)
    }

    async fn try_delete_time_entry(&self, id: TimeEntryId) -> Result<String, DomainError> {
        self.store.delete_time_entry(id).await?;
        Ok(format!("Time entry {} deleted successfully!", id))
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Categories
    // ─────────────────────────────────────────────────────────────────────────

    pub async fn add_category(&self, input: NewCategory) -> CommandOutcome {
        outcome("add_category", self.try_add_category(input).await)
    }

    async fn try_add_category(&self, input: NewCategory) -> Result<String, DomainError> {
        let input = validation::normalize_new_category(input)?;
        let category = self.store.insert_category(&input).await?;
        Ok(format!(
            "Category '{}' added successfully! (ID {})",
            category.name, category.id
        ))
    }

    /// Archive (`active = false`) or restore a category. Archived ones are hidden from lists.
    pub async fn set_category_active(&self, id: CategoryId, active: bool) -> CommandOutcome {
        outcome("set_category_active", self.try_set_category_active(id, active).await)
    }

    async fn try_set_category_active(&self, id: CategoryId, active: bool) -> Result<String, DomainError> {
        let category = self.store.set_category_active(id, active).await?;
        let state = if active { "restored" } else { "archived" };
        Ok(format!("Category '{}' {}.", category.name, state))
    }

    /// Projects keep existing; their category reference is cleared.
    pub async fn delete_category(&self, id: CategoryId) -> CommandOutcome {
        outcome("delete_category", self.try_delete_category(id).await)
    }

    async fn try_delete_category(&self, id: CategoryId) -> Result<String, DomainError> {
        let category = self.store.get_category(id).await?;
        let detached = self.store.delete_category(id).await?;
        if detached > 0 {
            warn!(
                category_id = id,
                detached, "projects lost their category on delete"
            );
            Ok(format!(
                "Category '{}' deleted. Warning: {} no longer categorised.",
                category.name,
                plural(detached, "project is", "projects are"),
            ))
        } else {
            Ok(format!("Category '{}' deleted.", category.name))
        }
    }

    /// Active categories with the number of projects tagged with each.
    pub async fn list_categories(&self) -> Result<Vec<CategoryRow>, DomainError> {
        self.category_rows(false).await
    }

    /// Active and archived categories.
    pub async fn list_all_categories(&self) -> Result<Vec<CategoryRow>, DomainError> {
        self.category_rows(true).await
    }

    async fn category_rows(&self, include_inactive: bool) -> Result<Vec<CategoryRow>, DomainError> {
        let categories = self.store.list_categories(include_inactive).await?;
        let projects = self.store.list_projects().await?;
        Ok(categories
            .into_iter()
            .map(|category| {
                let project_count = projects
                    .iter()
                    .filter(|p| p.category_id == Some(category.id))
                    .count();
                CategoryRow {
                    category,
                    project_count,
                }
            })
            .collect())
    }
}
