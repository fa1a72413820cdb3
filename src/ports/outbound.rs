//! Outbound ports. Application calls into infrastructure.
//!
//! Implemented by adapters.

use crate::domain::{
    CascadeReport, Category, CategoryId, Client, ClientId, ClientUpdate, DomainError, EntryLine,
    NewCategory, NewClient, NewProject, NewTimeEntry, Project, ProjectId, ProjectUpdate,
    StoreCounts, TimeEntry, TimeEntryId, TimeEntryUpdate,
};
use chrono::NaiveDate;
use std::path::PathBuf;

/// Entity store. Durable clients, projects, categories and time entries.
///
/// Contract shared by every implementation:
/// - `insert_*` fails with `DuplicateKey` on a uniqueness violation (client email,
///   category name) and with `NotFound` when a referenced parent id is absent.
/// - `get_*`, `update_*` and `delete_*` fail with `NotFound` for an absent id.
/// - Each mutating call is all-or-nothing.
/// - Lists are ordered by id ascending.
#[async_trait::async_trait]
pub trait LedgerStore: Send + Sync {
    // --- clients ---
    async fn insert_client(&self, client: &NewClient) -> Result<Client, DomainError>;
    async fn get_client(&self, id: ClientId) -> Result<Client, DomainError>;
    async fn list_clients(&self) -> Result<Vec<Client>, DomainError>;
    async fn update_client(&self, id: ClientId, update: &ClientUpdate)
    -> Result<Client, DomainError>;
    /// Deletes the client with its projects and their time entries.
    async fn delete_client(&self, id: ClientId) -> Result<CascadeReport, DomainError>;

    // --- projects ---
    async fn insert_project(&self, project: &NewProject) -> Result<Project, DomainError>;
    async fn get_project(&self, id: ProjectId) -> Result<Project, DomainError>;
    async fn list_projects(&self) -> Result<Vec<Project>, DomainError>;
    async fn list_projects_for_client(&self, client_id: ClientId)
    -> Result<Vec<Project>, DomainError>;
    async fn update_project(
        &self,
        id: ProjectId,
        update: &ProjectUpdate,
    ) -> Result<Project, DomainError>;
    /// Deletes the project with its time entries. Returns the number of entries removed.
    async fn delete_project(&self, id: ProjectId) -> Result<u64, DomainError>;

    // --- time entries ---
    async fn insert_time_entry(&self, entry: &NewTimeEntry) -> Result<TimeEntry, DomainError>;
    async fn get_time_entry(&self, id: TimeEntryId) -> Result<TimeEntry, DomainError>;
    async fn list_time_entries(&self) -> Result<Vec<TimeEntry>, DomainError>;
    async fn list_time_entries_for_project(
        &self,
        project_id: ProjectId,
    ) -> Result<Vec<TimeEntry>, DomainError>;
    async fn update_time_entry(
        &self,
        id: TimeEntryId,
        update: &TimeEntryUpdate,
    ) -> Result<TimeEntry, DomainError>;
    async fn delete_time_entry(&self, id: TimeEntryId) -> Result<(), DomainError>;

    // --- categories ---
    async fn insert_category(&self, category: &NewCategory) -> Result<Category, DomainError>;
    async fn get_category(&self, id: CategoryId) -> Result<Category, DomainError>;
    async fn list_categories(&self, include_inactive: bool) -> Result<Vec<Category>, DomainError>;
    async fn set_category_active(
        &self,
        id: CategoryId,
        active: bool,
    ) -> Result<Category, DomainError>;
    /// Deletes the category and nulls `category_id` on referencing projects.
    /// Returns the number of projects detached.
    async fn delete_category(&self, id: CategoryId) -> Result<u64, DomainError>;

    // --- maintenance ---
    async fn counts(&self) -> Result<StoreCounts, DomainError>;
    /// Removes every row from every table in one transaction.
    async fn clear_all(&self) -> Result<(), DomainError>;
}

/// Report export port. Writes a period's entry lines somewhere durable.
#[async_trait::async_trait]
pub trait ReportExportPort: Send + Sync {
    /// Export entry lines for the window ending `until`. Returns the written path.
    async fn export_period(
        &self,
        until: NaiveDate,
        days: u32,
        lines: &[EntryLine],
    ) -> Result<PathBuf, DomainError>;
}
