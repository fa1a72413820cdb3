//! SQLite-backed entity store via libsql. Implements LedgerStore.
//!
//! One database file holds four tables: clients, categories, projects, time_entries.
//! Every call opens its own connection (foreign keys enabled) and drops it on return;
//! mutating calls run inside one transaction that is rolled back on any error.
//!
//! Cascades are executed explicitly inside the delete transaction so the reported
//! counts are exact; the `ON DELETE` clauses back them up at the schema level.

use crate::domain::validation::DATE_FORMAT;
use crate::domain::{
    CascadeReport, Category, CategoryId, Client, ClientId, ClientUpdate, DomainError, NewCategory,
    NewClient, NewProject, NewTimeEntry, Project, ProjectId, ProjectUpdate, StoreCounts,
    TimeEntry, TimeEntryId, TimeEntryUpdate,
};
use crate::ports::LedgerStore;
use chrono::{DateTime, NaiveDate, Utc};
use libsql::{Connection, Database, Row, Rows, Transaction, params};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

const CLIENTS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS clients (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL,
    email TEXT NOT NULL UNIQUE COLLATE NOCASE,
    company TEXT,
    phone TEXT,
    notes TEXT,
    created_at TEXT NOT NULL
)"#;

const CATEGORIES_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS categories (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL UNIQUE COLLATE NOCASE,
    description TEXT,
    color_code TEXT,
    is_active INTEGER NOT NULL DEFAULT 1,
    created_at TEXT NOT NULL
)"#;

const PROJECTS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS projects (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL,
    description TEXT,
    hourly_rate REAL NOT NULL DEFAULT 25.0 CHECK (hourly_rate > 0),
    status TEXT NOT NULL DEFAULT 'active' CHECK (status IN ('active', 'completed', 'paused')),
    deadline TEXT,
    created_at TEXT NOT NULL,
    client_id INTEGER NOT NULL REFERENCES clients (id) ON DELETE CASCADE,
    category_id INTEGER REFERENCES categories (id) ON DELETE SET NULL
)"#;

const TIME_ENTRIES_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS time_entries (
    id INTEGER PRIMARY KEY,
    project_id INTEGER NOT NULL REFERENCES projects (id) ON DELETE CASCADE,
    date TEXT NOT NULL,
    hours_worked REAL NOT NULL CHECK (hours_worked > 0),
    description TEXT NOT NULL,
    task_type TEXT,
    created_at TEXT NOT NULL
)"#;

const INDEXES: [&str; 3] = [
    "CREATE INDEX IF NOT EXISTS idx_projects_client ON projects (client_id)",
    "CREATE INDEX IF NOT EXISTS idx_projects_category ON projects (category_id)",
    "CREATE INDEX IF NOT EXISTS idx_time_entries_project_date ON time_entries (project_id, date)",
];

const CLIENT_COLUMNS: &str = "id, name, email, company, phone, notes, created_at";
const PROJECT_COLUMNS: &str =
    "id, name, description, hourly_rate, status, deadline, created_at, client_id, category_id";
const ENTRY_COLUMNS: &str = "id, project_id, date, hours_worked, description, task_type, created_at";
const CATEGORY_COLUMNS: &str = "id, name, description, color_code, is_active, created_at";

fn storage(e: libsql::Error) -> DomainError {
    DomainError::Storage(e.to_string())
}

/// Maps a failed write. Constraint failures become the supplied domain errors when given.
fn write_error(
    e: libsql::Error,
    on_unique: Option<DomainError>,
    on_foreign_key: Option<DomainError>,
) -> DomainError {
    let msg = e.to_string();
    if msg.contains("UNIQUE constraint failed") {
        if let Some(err) = on_unique {
            return err;
        }
    }
    if msg.contains("FOREIGN KEY constraint failed") {
        if let Some(err) = on_foreign_key {
            return err;
        }
    }
    DomainError::Storage(msg)
}

fn parse_timestamp(value: &str, column: &str) -> Result<DateTime<Utc>, DomainError> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| DomainError::Storage(format!("bad {} '{}': {}", column, value, e)))
}

fn parse_day(value: &str, column: &str) -> Result<NaiveDate, DomainError> {
    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .map_err(|e| DomainError::Storage(format!("bad {} '{}': {}", column, value, e)))
}

fn format_day(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

fn now_rfc3339() -> String {
    Utc::now().to_rfc3339()
}

fn row_to_client(row: &Row) -> Result<Client, DomainError> {
    let created_at: String = row.get(6).map_err(storage)?;
    Ok(Client {
        id: row.get(0).map_err(storage)?,
        name: row.get(1).map_err(storage)?,
        email: row.get(2).map_err(storage)?,
        company: row.get::<String>(3).ok(),
        phone: row.get::<String>(4).ok(),
        notes: row.get::<String>(5).ok(),
        created_at: parse_timestamp(&created_at, "created_at")?,
    })
}

fn row_to_project(row: &Row) -> Result<Project, DomainError> {
    let status: String = row.get(4).map_err(storage)?;
    let deadline = row
        .get::<String>(5)
        .ok()
        .map(|d| parse_day(&d, "deadline"))
        .transpose()?;
    let created_at: String = row.get(6).map_err(storage)?;
    Ok(Project {
        id: row.get(0).map_err(storage)?,
        name: row.get(1).map_err(storage)?,
        description: row.get::<String>(2).ok(),
        hourly_rate: row.get(3).map_err(storage)?,
        status: status
            .parse()
            .map_err(|e: DomainError| DomainError::Storage(e.to_string()))?,
        deadline,
        created_at: parse_timestamp(&created_at, "created_at")?,
        client_id: row.get(7).map_err(storage)?,
        category_id: row.get::<i64>(8).ok(),
    })
}

fn row_to_entry(row: &Row) -> Result<TimeEntry, DomainError> {
    let date: String = row.get(2).map_err(storage)?;
    let created_at: String = row.get(6).map_err(storage)?;
    Ok(TimeEntry {
        id: row.get(0).map_err(storage)?,
        project_id: row.get(1).map_err(storage)?,
        date: parse_day(&date, "date")?,
        hours_worked: row.get(3).map_err(storage)?,
        description: row.get(4).map_err(storage)?,
        task_type: row.get::<String>(5).ok(),
        created_at: parse_timestamp(&created_at, "created_at")?,
    })
}

fn row_to_category(row: &Row) -> Result<Category, DomainError> {
    let is_active: i64 = row.get(4).map_err(storage)?;
    let created_at: String = row.get(5).map_err(storage)?;
    Ok(Category {
        id: row.get(0).map_err(storage)?,
        name: row.get(1).map_err(storage)?,
        description: row.get::<String>(2).ok(),
        color_code: row.get::<String>(3).ok(),
        is_active: is_active != 0,
        created_at: parse_timestamp(&created_at, "created_at")?,
    })
}

async fn collect<T>(
    mut rows: Rows,
    map: fn(&Row) -> Result<T, DomainError>,
) -> Result<Vec<T>, DomainError> {
    let mut out = Vec::new();
    while let Some(row) = rows.next().await.map_err(storage)? {
        out.push(map(&row)?);
    }
    Ok(out)
}

async fn first<T>(
    mut rows: Rows,
    map: fn(&Row) -> Result<T, DomainError>,
) -> Result<Option<T>, DomainError> {
    match rows.next().await.map_err(storage)? {
        Some(row) => map(&row).map(Some),
        None => Ok(None),
    }
}

async fn count(conn: &Connection, sql: &str) -> Result<u64, DomainError> {
    let mut rows = conn.query(sql, ()).await.map_err(storage)?;
    let n: i64 = match rows.next().await.map_err(storage)? {
        Some(row) => row.get(0).map_err(storage)?,
        None => 0,
    };
    Ok(n.max(0) as u64)
}

/// Commit on success, roll back on failure. The write error is returned even if the rollback fails.
async fn finish<T>(tx: Transaction, result: Result<T, DomainError>) -> Result<T, DomainError> {
    match result {
        Ok(value) => {
            tx.commit().await.map_err(storage)?;
            Ok(value)
        }
        Err(e) => {
            if let Err(rollback) = tx.rollback().await {
                warn!(error = %rollback, "rollback failed");
            }
            Err(e)
        }
    }
}

async fn fetch_client(conn: &Connection, id: ClientId) -> Result<Option<Client>, DomainError> {
    let sql = format!("SELECT {} FROM clients WHERE id = ?1", CLIENT_COLUMNS);
    let rows = conn.query(&sql, params![id]).await.map_err(storage)?;
    first(rows, row_to_client).await
}

async fn require_client(conn: &Connection, id: ClientId) -> Result<Client, DomainError> {
    fetch_client(conn, id)
        .await?
        .ok_or_else(|| DomainError::not_found("Client", id))
}

async fn client_id_by_email(conn: &Connection, email: &str) -> Result<Option<ClientId>, DomainError> {
    let mut rows = conn
        .query("SELECT id FROM clients WHERE email = ?1", params![email])
        .await
        .map_err(storage)?;
    match rows.next().await.map_err(storage)? {
        Some(row) => Ok(Some(row.get(0).map_err(storage)?)),
        None => Ok(None),
    }
}

async fn fetch_project(conn: &Connection, id: ProjectId) -> Result<Option<Project>, DomainError> {
    let sql = format!("SELECT {} FROM projects WHERE id = ?1", PROJECT_COLUMNS);
    let rows = conn.query(&sql, params![id]).await.map_err(storage)?;
    first(rows, row_to_project).await
}

async fn require_project(conn: &Connection, id: ProjectId) -> Result<Project, DomainError> {
    fetch_project(conn, id)
        .await?
        .ok_or_else(|| DomainError::not_found("Project", id))
}

async fn fetch_entry(conn: &Connection, id: TimeEntryId) -> Result<Option<TimeEntry>, DomainError> {
    let sql = format!("SELECT {} FROM time_entries WHERE id = ?1", ENTRY_COLUMNS);
    let rows = conn.query(&sql, params![id]).await.map_err(storage)?;
    first(rows, row_to_entry).await
}

async fn require_entry(conn: &Connection, id: TimeEntryId) -> Result<TimeEntry, DomainError> {
    fetch_entry(conn, id)
        .await?
        .ok_or_else(|| DomainError::not_found("Time entry", id))
}

async fn fetch_category(conn: &Connection, id: CategoryId) -> Result<Option<Category>, DomainError> {
    let sql = format!("SELECT {} FROM categories WHERE id = ?1", CATEGORY_COLUMNS);
    let rows = conn.query(&sql, params![id]).await.map_err(storage)?;
    first(rows, row_to_category).await
}

async fn require_category(conn: &Connection, id: CategoryId) -> Result<Category, DomainError> {
    fetch_category(conn, id)
        .await?
        .ok_or_else(|| DomainError::not_found("Category", id))
}

async fn category_exists_by_name(conn: &Connection, name: &str) -> Result<bool, DomainError> {
    let mut rows = conn
        .query("SELECT 1 FROM categories WHERE name = ?1", params![name])
        .await
        .map_err(storage)?;
    Ok(rows.next().await.map_err(storage)?.is_some())
}

/// SQLite entity store. One database file; safe to share via Arc.
pub struct SqliteStore {
    db: Database,
    db_path: PathBuf,
}

impl SqliteStore {
    /// Open (or create) `<base_dir>/<file_name>` and ensure the schema exists.
    pub async fn connect(base_dir: impl AsRef<Path>, file_name: &str) -> Result<Self, DomainError> {
        let base = base_dir.as_ref();
        std::fs::create_dir_all(base).map_err(|e| DomainError::Storage(e.to_string()))?;
        Self::open(base.join(file_name)).await
    }

    /// Open (or create) the database at `db_path` and ensure the schema exists.
    pub async fn open(db_path: impl AsRef<Path>) -> Result<Self, DomainError> {
        let db_path = db_path.as_ref().to_path_buf();
        let path_str = db_path.to_string_lossy();
        let db = libsql::Builder::new_local(path_str.as_ref())
            .build()
            .await
            .map_err(storage)?;
        let store = Self { db, db_path };

        let conn = store.db.connect().map_err(storage)?;
        // PRAGMA journal_mode returns a row; use query and drain it.
        let mut wal_rows = conn
            .query("PRAGMA journal_mode=WAL", ())
            .await
            .map_err(|e| DomainError::Storage(format!("WAL pragma failed: {}", e)))?;
        while wal_rows.next().await.map_err(storage)?.is_some() {}

        for ddl in [CLIENTS_TABLE, CATEGORIES_TABLE, PROJECTS_TABLE, TIME_ENTRIES_TABLE] {
            conn.execute(ddl, ()).await.map_err(storage)?;
        }
        for ddl in INDEXES {
            conn.execute(ddl, ()).await.map_err(storage)?;
        }

        info!(path = %store.db_path.display(), "ledger database ready");
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.db_path
    }

    /// Fresh connection with foreign key enforcement. Dropped by the caller on return.
    async fn connection(&self) -> Result<Connection, DomainError> {
        let conn = self.db.connect().map_err(storage)?;
        conn.execute("PRAGMA foreign_keys = ON", ())
            .await
            .map_err(storage)?;
        Ok(conn)
    }

    async fn select_all<T>(
        &self,
        sql: &str,
        map: fn(&Row) -> Result<T, DomainError>,
    ) -> Result<Vec<T>, DomainError> {
        let conn = self.connection().await?;
        let rows = conn.query(sql, ()).await.map_err(storage)?;
        collect(rows, map).await
    }

    async fn write_client(conn: &Connection, client: &NewClient) -> Result<Client, DomainError> {
        if client_id_by_email(conn, &client.email).await?.is_some() {
            return Err(DomainError::duplicate("Client", "email", client.email.as_str()));
        }
        conn.execute(
            "INSERT INTO clients (name, email, company, phone, notes, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                client.name.as_str(),
                client.email.as_str(),
                client.company.as_deref(),
                client.phone.as_deref(),
                client.notes.as_deref(),
                now_rfc3339()
            ],
        )
        .await
        .map_err(|e| {
            write_error(
                e,
                Some(DomainError::duplicate("Client", "email", client.email.as_str())),
                None,
            )
        })?;
        let id = conn.last_insert_rowid();
        require_client(conn, id).await
    }

    async fn rewrite_client(
        conn: &Connection,
        id: ClientId,
        update: &ClientUpdate,
    ) -> Result<Client, DomainError> {
        let mut client = require_client(conn, id).await?;
        if let Some(email) = &update.email {
            if let Some(owner) = client_id_by_email(conn, email).await? {
                if owner != id {
                    return Err(DomainError::duplicate("Client", "email", email.as_str()));
                }
            }
        }
        update.apply_to(&mut client);
        conn.execute(
            "UPDATE clients SET name = ?1, email = ?2, company = ?3, phone = ?4, notes = ?5
             WHERE id = ?6",
            params![
                client.name.as_str(),
                client.email.as_str(),
                client.company.as_deref(),
                client.phone.as_deref(),
                client.notes.as_deref(),
                id
            ],
        )
        .await
        .map_err(|e| {
            write_error(
                e,
                Some(DomainError::duplicate("Client", "email", client.email.as_str())),
                None,
            )
        })?;
        Ok(client)
    }

    async fn remove_client(conn: &Connection, id: ClientId) -> Result<CascadeReport, DomainError> {
        require_client(conn, id).await?;
        let time_entries = conn
            .execute(
                "DELETE FROM time_entries
                 WHERE project_id IN (SELECT id FROM projects WHERE client_id = ?1)",
                params![id],
            )
            .await
            .map_err(storage)?;
        let projects = conn
            .execute("DELETE FROM projects WHERE client_id = ?1", params![id])
            .await
            .map_err(storage)?;
        conn.execute("DELETE FROM clients WHERE id = ?1", params![id])
            .await
            .map_err(storage)?;
        Ok(CascadeReport {
            projects,
            time_entries,
        })
    }

    async fn write_project(conn: &Connection, project: &NewProject) -> Result<Project, DomainError> {
        require_client(conn, project.client_id).await?;
        if let Some(category_id) = project.category_id {
            require_category(conn, category_id).await?;
        }
        conn.execute(
            "INSERT INTO projects
                (name, description, hourly_rate, status, deadline, created_at, client_id, category_id)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                project.name.as_str(),
                project.description.as_deref(),
                project.hourly_rate,
                project.status.as_str(),
                project.deadline.map(format_day),
                now_rfc3339(),
                project.client_id,
                project.category_id
            ],
        )
        .await
        .map_err(|e| {
            write_error(
                e,
                None,
                Some(DomainError::not_found("Client", project.client_id)),
            )
        })?;
        let id = conn.last_insert_rowid();
        require_project(conn, id).await
    }

    async fn rewrite_project(
        conn: &Connection,
        id: ProjectId,
        update: &ProjectUpdate,
    ) -> Result<Project, DomainError> {
        let mut project = require_project(conn, id).await?;
        if let Some(Some(category_id)) = update.category_id {
            require_category(conn, category_id).await?;
        }
        update.apply_to(&mut project);
        conn.execute(
            "UPDATE projects
             SET name = ?1, description = ?2, hourly_rate = ?3, status = ?4, deadline = ?5,
                 category_id = ?6
             WHERE id = ?7",
            params![
                project.name.as_str(),
                project.description.as_deref(),
                project.hourly_rate,
                project.status.as_str(),
                project.deadline.map(format_day),
                project.category_id,
                id
            ],
        )
        .await
        .map_err(storage)?;
        Ok(project)
    }

    async fn remove_project(conn: &Connection, id: ProjectId) -> Result<u64, DomainError> {
        require_project(conn, id).await?;
        let entries = conn
            .execute("DELETE FROM time_entries WHERE project_id = ?1", params![id])
            .await
            .map_err(storage)?;
        conn.execute("DELETE FROM projects WHERE id = ?1", params![id])
            .await
            .map_err(storage)?;
        Ok(entries)
    }

    async fn write_entry(conn: &Connection, entry: &NewTimeEntry) -> Result<TimeEntry, DomainError> {
        require_project(conn, entry.project_id).await?;
        conn.execute(
            "INSERT INTO time_entries (project_id, date, hours_worked, description, task_type, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                entry.project_id,
                format_day(entry.date),
                entry.hours_worked,
                entry.description.as_str(),
                entry.task_type.as_deref(),
                now_rfc3339()
            ],
        )
        .await
        .map_err(|e| {
            write_error(
                e,
                None,
                Some(DomainError::not_found("Project", entry.project_id)),
            )
        })?;
        let id = conn.last_insert_rowid();
        require_entry(conn, id).await
    }

    async fn rewrite_entry(
        conn: &Connection,
        id: TimeEntryId,
        update: &TimeEntryUpdate,
    ) -> Result<TimeEntry, DomainError> {
        let mut entry = require_entry(conn, id).await?;
        update.apply_to(&mut entry);
        conn.execute(
            "UPDATE time_entries SET date = ?1, hours_worked = ?2, description = ?3, task_type = ?4
             WHERE id = ?5",
            params![
                format_day(entry.date),
                entry.hours_worked,
                entry.description.as_str(),
                entry.task_type.as_deref(),
                id
            ],
        )
        .await
        .map_err(storage)?;
        Ok(entry)
    }

    async fn write_category(
        conn: &Connection,
        category: &NewCategory,
    ) -> Result<Category, DomainError> {
        if category_exists_by_name(conn, &category.name).await? {
            return Err(DomainError::duplicate("Category", "name", category.name.as_str()));
        }
        conn.execute(
            "INSERT INTO categories (name, description, color_code, is_active, created_at)
             VALUES (?1, ?2, ?3, 1, ?4)",
            params![
                category.name.as_str(),
                category.description.as_deref(),
                category.color_code.as_deref(),
                now_rfc3339()
            ],
        )
        .await
        .map_err(|e| {
            write_error(
                e,
                Some(DomainError::duplicate("Category", "name", category.name.as_str())),
                None,
            )
        })?;
        let id = conn.last_insert_rowid();
        require_category(conn, id).await
    }

    async fn remove_category(conn: &Connection, id: CategoryId) -> Result<u64, DomainError> {
        require_category(conn, id).await?;
        let detached = conn
            .execute(
                "UPDATE projects SET category_id = NULL WHERE category_id = ?1",
                params![id],
            )
            .await
            .map_err(storage)?;
        conn.execute("DELETE FROM categories WHERE id = ?1", params![id])
            .await
            .map_err(storage)?;
        Ok(detached)
    }

    async fn truncate_all(conn: &Connection) -> Result<(), DomainError> {
        for table in ["time_entries", "projects", "clients", "categories"] {
            conn.execute(&format!("DELETE FROM {}", table), ())
                .await
                .map_err(storage)?;
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl LedgerStore for SqliteStore {
    async fn insert_client(&self, client: &NewClient) -> Result<Client, DomainError> {
        let conn = self.connection().await?;
        let tx = conn.transaction().await.map_err(storage)?;
        let result = Self::write_client(&tx, client).await;
        let created = finish(tx, result).await?;
        debug!(client_id = created.id, email = %created.email, "client inserted");
        Ok(created)
    }

    async fn get_client(&self, id: ClientId) -> Result<Client, DomainError> {
        let conn = self.connection().await?;
        require_client(&conn, id).await
    }

    async fn list_clients(&self) -> Result<Vec<Client>, DomainError> {
        let sql = format!("SELECT {} FROM clients ORDER BY id", CLIENT_COLUMNS);
        self.select_all(&sql, row_to_client).await
    }

    async fn update_client(
        &self,
        id: ClientId,
        update: &ClientUpdate,
    ) -> Result<Client, DomainError> {
        let conn = self.connection().await?;
        let tx = conn.transaction().await.map_err(storage)?;
        let result = Self::rewrite_client(&tx, id, update).await;
        finish(tx, result).await
    }

    async fn delete_client(&self, id: ClientId) -> Result<CascadeReport, DomainError> {
        let conn = self.connection().await?;
        let tx = conn.transaction().await.map_err(storage)?;
        let result = Self::remove_client(&tx, id).await;
        let report = finish(tx, result).await?;
        info!(
            client_id = id,
            projects = report.projects,
            time_entries = report.time_entries,
            "client deleted with cascade"
        );
        Ok(report)
    }

    async fn insert_project(&self, project: &NewProject) -> Result<Project, DomainError> {
        let conn = self.connection().await?;
        let tx = conn.transaction().await.map_err(storage)?;
        let result = Self::write_project(&tx, project).await;
        let created = finish(tx, result).await?;
        debug!(
            project_id = created.id,
            client_id = created.client_id,
            "project inserted"
        );
        Ok(created)
    }

    async fn get_project(&self, id: ProjectId) -> Result<Project, DomainError> {
        let conn = self.connection().await?;
        require_project(&conn, id).await
    }

    async fn list_projects(&self) -> Result<Vec<Project>, DomainError> {
        let sql = format!("SELECT {} FROM projects ORDER BY id", PROJECT_COLUMNS);
        self.select_all(&sql, row_to_project).await
    }

    async fn list_projects_for_client(
        &self,
        client_id: ClientId,
    ) -> Result<Vec<Project>, DomainError> {
        let conn = self.connection().await?;
        let sql = format!(
            "SELECT {} FROM projects WHERE client_id = ?1 ORDER BY id",
            PROJECT_COLUMNS
        );
        let rows = conn.query(&sql, params![client_id]).await.map_err(storage)?;
        collect(rows, row_to_project).await
    }

    async fn update_project(
        &self,
        id: ProjectId,
        update: &ProjectUpdate,
    ) -> Result<Project, DomainError> {
        let conn = self.connection().await?;
        let tx = conn.transaction().await.map_err(storage)?;
        let result = Self::rewrite_project(&tx, id, update).await;
        finish(tx, result).await
    }

    async fn delete_project(&self, id: ProjectId) -> Result<u64, DomainError> {
        let conn = self.connection().await?;
        let tx = conn.transaction().await.map_err(storage)?;
        let result = Self::remove_project(&tx, id).await;
        let removed = finish(tx, result).await?;
        info!(project_id = id, time_entries = removed, "project deleted");
        Ok(removed)
    }

    async fn insert_time_entry(&self, entry: &NewTimeEntry) -> Result<TimeEntry, DomainError> {
        let conn = self.connection().await?;
        let tx = conn.transaction().await.map_err(storage)?;
        let result = Self::write_entry(&tx, entry).await;
        let created = finish(tx, result).await?;
        debug!(
            entry_id = created.id,
            project_id = created.project_id,
            hours = created.hours_worked,
            "time entry inserted"
        );
        Ok(created)
    }

    async fn get_time_entry(&self, id: TimeEntryId) -> Result<TimeEntry, DomainError> {
        let conn = self.connection().await?;
        require_entry(&conn, id).await
    }

    async fn list_time_entries(&self) -> Result<Vec<TimeEntry>, DomainError> {
        let sql = format!("SELECT {} FROM time_entries ORDER BY id", ENTRY_COLUMNS);
        self.select_all(&sql, row_to_entry).await
    }

    async fn list_time_entries_for_project(
        &self,
        project_id: ProjectId,
    ) -> Result<Vec<TimeEntry>, DomainError> {
        let conn = self.connection().await?;
        let sql = format!(
            "SELECT {} FROM time_entries WHERE project_id = ?1 ORDER BY id",
            ENTRY_COLUMNS
        );
        let rows = conn.query(&sql, params![project_id]).await.map_err(storage)?;
        collect(rows, row_to_entry).await
    }

    async fn update_time_entry(
        &self,
        id: TimeEntryId,
        update: &TimeEntryUpdate,
    ) -> Result<TimeEntry, DomainError> {
        let conn = self.connection().await?;
        let tx = conn.transaction().await.map_err(storage)?;
        let result = Self::rewrite_entry(&tx, id, update).await;
        finish(tx, result).await
    }

    async fn delete_time_entry(&self, id: TimeEntryId) -> Result<(), DomainError> {
        let conn = self.connection().await?;
        let tx = conn.transaction().await.map_err(storage)?;
        let result = async {
            require_entry(&tx, id).await?;
            tx.execute("DELETE FROM time_entries WHERE id = ?1", params![id])
                .await
                .map_err(storage)?;
            Ok::<_, DomainError>(())
        }
        .await;
        finish(tx, result).await
    }

    async fn insert_category(&self, category: &NewCategory) -> Result<Category, DomainError> {
        let conn = self.connection().await?;
        let tx = conn.transaction().await.map_err(storage)?;
        let result = Self::write_category(&tx, category).await;
        finish(tx, result).await
    }

    async fn get_category(&self, id: CategoryId) -> Result<Category, DomainError> {
        let conn = self.connection().await?;
        require_category(&conn, id).await
    }

    async fn list_categories(&self, include_inactive: bool) -> Result<Vec<Category>, DomainError> {
        let filter = if include_inactive {
            ""
        } else {
            "WHERE is_active = 1"
        };
        let sql = format!(
            "SELECT {} FROM categories {} ORDER BY id",
            CATEGORY_COLUMNS, filter
        );
        self.select_all(&sql, row_to_category).await
    }

    async fn set_category_active(
        &self,
        id: CategoryId,
        active: bool,
    ) -> Result<Category, DomainError> {
        let conn = self.connection().await?;
        let tx = conn.transaction().await.map_err(storage)?;
        let result = async {
            let mut category = require_category(&tx, id).await?;
            tx.execute(
                "UPDATE categories SET is_active = ?1 WHERE id = ?2",
                params![i64::from(active), id],
            )
            .await
            .map_err(storage)?;
            category.is_active = active;
            Ok::<_, DomainError>(category)
        }
        .await;
        finish(tx, result).await
    }

    async fn delete_category(&self, id: CategoryId) -> Result<u64, DomainError> {
        let conn = self.connection().await?;
        let tx = conn.transaction().await.map_err(storage)?;
        let result = Self::remove_category(&tx, id).await;
        let detached = finish(tx, result).await?;
        info!(category_id = id, detached, "category deleted");
        Ok(detached)
    }

    async fn counts(&self) -> Result<StoreCounts, DomainError> {
        let conn = self.connection().await?;
        Ok(StoreCounts {
            clients: count(&conn, "SELECT COUNT(*) FROM clients").await?,
            projects: count(&conn, "SELECT COUNT(*) FROM projects").await?,
            time_entries: count(&conn, "SELECT COUNT(*) FROM time_entries").await?,
            categories: count(&conn, "SELECT COUNT(*) FROM categories").await?,
        })
    }

    async fn clear_all(&self) -> Result<(), DomainError> {
        let conn = self.connection().await?;
        let tx = conn.transaction().await.map_err(storage)?;
        let result = Self::truncate_all(&tx).await;
        finish(tx, result).await?;
        info!(path = %self.db_path.display(), "all ledger data cleared");
        Ok(())
    }
}
