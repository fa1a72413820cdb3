mod common;

use common::{Fixture, assert_close, date, fixture};
use freelance_ledger::domain::{
    ClientId, ClientUpdate, DomainError, NewCategory, NewClient, NewProject, NewTimeEntry,
    ProjectId, ProjectStatus, ProjectUpdate, TimeEntryUpdate,
};
use freelance_ledger::adapters::persistence::SqliteStore;
use freelance_ledger::ports::LedgerStore;

async fn add_client(f: &Fixture, name: &str, email: &str) -> ClientId {
    let outcome = f
        .ledger
        .add_client(NewClient {
            name: name.into(),
            email: email.into(),
            ..NewClient::default()
        })
        .await;
    assert!(outcome.success, "{}", outcome.message);
    let clients = f.store.list_clients().await.unwrap();
    clients
        .iter()
        .find(|c| c.email == email.to_lowercase())
        .map(|c| c.id)
        .unwrap()
}

async fn add_project(f: &Fixture, name: &str, client_id: ClientId, rate: f64) -> ProjectId {
    let outcome = f
        .ledger
        .add_project(NewProject::new(name, client_id, rate))
        .await;
    assert!(outcome.success, "{}", outcome.message);
    let projects = f.store.list_projects().await.unwrap();
    projects.iter().rev().find(|p| p.name == name).map(|p| p.id).unwrap()
}

fn entry(project_id: ProjectId, on: chrono::NaiveDate, hours: f64) -> NewTimeEntry {
    NewTimeEntry {
        project_id,
        date: on,
        hours_worked: hours,
        description: "work".into(),
        task_type: Some("coding".into()),
    }
}

#[tokio::test]
async fn test_acme_site_earns_125() {
    let f = fixture("acme").await;
    let acme = add_client(&f, "Acme", "a@a.com").await;
    let site = add_project(&f, "Site", acme, 50.0).await;

    let logged = f.ledger.log_time(entry(site, date(2024, 3, 1), 2.5)).await;
    assert!(logged.success);
    assert!(logged.message.contains("$125.00"), "{}", logged.message);

    let project = f.ledger.view_project(site).await.unwrap();
    assert_close(project.totals.hours, 2.5);
    assert_close(project.totals.earnings, 125.0);

    let clients = f.ledger.list_clients().await.unwrap();
    assert_eq!(clients.len(), 1);
    assert_eq!(clients[0].project_count, 1);
    assert_close(clients[0].totals.earnings, 125.0);

    let detail = f.ledger.view_client(acme).await.unwrap();
    assert_close(detail.total.earnings, 125.0);
    assert_eq!(detail.projects[0].project.name, "Site");
}

#[tokio::test]
async fn test_project_for_missing_client_is_rejected() {
    let f = fixture("missing_client").await;
    let outcome = f
        .ledger
        .add_project(NewProject::new("Ghost", 999, 40.0))
        .await;
    assert!(!outcome.success);
    assert!(outcome.message.contains("not found"), "{}", outcome.message);
    assert!(f.store.list_projects().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_duplicate_email_keeps_single_client() {
    let f = fixture("dup_email").await;
    add_client(&f, "Acme", "a@a.com").await;

    let second = f
        .ledger
        .add_client(NewClient {
            name: "Other".into(),
            email: "A@A.com".into(),
            ..NewClient::default()
        })
        .await;
    assert!(!second.success);
    assert!(second.message.contains("already exists"), "{}", second.message);
    assert_eq!(f.store.list_clients().await.unwrap().len(), 1);

    let direct = f
        .store
        .insert_client(&NewClient {
            name: "Direct".into(),
            email: "a@a.com".into(),
            ..NewClient::default()
        })
        .await;
    assert!(matches!(direct, Err(DomainError::DuplicateKey { .. })));
}

#[tokio::test]
async fn test_invalid_input_is_rejected_before_storage() {
    let f = fixture("invalid").await;
    let bad_email = f
        .ledger
        .add_client(NewClient {
            name: "Acme".into(),
            email: "not-an-email".into(),
            ..NewClient::default()
        })
        .await;
    assert!(!bad_email.success);
    assert!(bad_email.message.starts_with("Invalid input"));

    let acme = add_client(&f, "Acme", "a@a.com").await;
    let zero_rate = f.ledger.add_project(NewProject::new("Site", acme, 0.0)).await;
    assert!(!zero_rate.success);

    let site = add_project(&f, "Site", acme, 50.0).await;
    let too_long = f.ledger.log_time(entry(site, date(2024, 3, 1), 30.0)).await;
    assert!(!too_long.success);
    assert!(f.store.list_time_entries().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_delete_client_cascades() {
    let f = fixture("cascade").await;
    let acme = add_client(&f, "Acme", "a@a.com").await;
    let globex = add_client(&f, "Globex", "g@g.com").await;
    let site = add_project(&f, "Site", acme, 50.0).await;
    let app = add_project(&f, "App", acme, 80.0).await;
    let kept = add_project(&f, "Kept", globex, 30.0).await;
    for project in [site, app, kept] {
        assert!(f.ledger.log_time(entry(project, date(2024, 3, 1), 1.0)).await.success);
        assert!(f.ledger.log_time(entry(project, date(2024, 3, 2), 2.0)).await.success);
    }

    let outcome = f.ledger.delete_client(acme).await;
    assert!(outcome.success, "{}", outcome.message);
    assert!(outcome.message.contains("2 projects"), "{}", outcome.message);
    assert!(outcome.message.contains("4 time entries"), "{}", outcome.message);

    let counts = f.store.counts().await.unwrap();
    assert_eq!(counts.clients, 1);
    assert_eq!(counts.projects, 1);
    assert_eq!(counts.time_entries, 2);
    let remaining = f.store.list_time_entries().await.unwrap();
    assert!(remaining.iter().all(|e| e.project_id == kept));
    assert!(matches!(
        f.store.get_client(acme).await,
        Err(DomainError::NotFound { entity: "Client", .. })
    ));

    let again = f.ledger.delete_client(acme).await;
    assert!(!again.success);
}

#[tokio::test]
async fn test_delete_project_removes_its_entries() {
    let f = fixture("delete_project").await;
    let acme = add_client(&f, "Acme", "a@a.com").await;
    let site = add_project(&f, "Site", acme, 50.0).await;
    assert!(f.ledger.log_time(entry(site, date(2024, 3, 1), 1.0)).await.success);

    let outcome = f.ledger.delete_project(site).await;
    assert!(outcome.success);
    assert!(outcome.message.contains("1 time entry"), "{}", outcome.message);
    assert!(f.store.list_time_entries().await.unwrap().is_empty());
    assert_eq!(f.store.list_clients().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_delete_category_detaches_projects() {
    let f = fixture("category_delete").await;
    let acme = add_client(&f, "Acme", "a@a.com").await;
    let web = f
        .store
        .insert_category(&NewCategory {
            name: "Web".into(),
            ..NewCategory::default()
        })
        .await
        .unwrap();
    let mut input = NewProject::new("Site", acme, 50.0);
    input.category_id = Some(web.id);
    assert!(f.ledger.add_project(input).await.success);

    let outcome = f.ledger.delete_category(web.id).await;
    assert!(outcome.success);
    assert!(outcome.message.contains("Warning"), "{}", outcome.message);

    let projects = f.store.list_projects().await.unwrap();
    assert_eq!(projects.len(), 1);
    assert_eq!(projects[0].category_id, None);
    assert!(f.store.list_categories(true).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_archived_categories_are_hidden() {
    let f = fixture("category_archive").await;
    let outcome = f
        .ledger
        .add_category(NewCategory {
            name: "Design".into(),
            color_code: Some("#3357ff".into()),
            ..NewCategory::default()
        })
        .await;
    assert!(outcome.success, "{}", outcome.message);
    let design = f.store.list_categories(false).await.unwrap().remove(0);
    assert_eq!(design.color_code.as_deref(), Some("#3357FF"));

    assert!(f.ledger.set_category_active(design.id, false).await.success);
    assert!(f.ledger.list_categories().await.unwrap().is_empty());
    assert_eq!(f.ledger.list_all_categories().await.unwrap().len(), 1);

    assert!(f.ledger.set_category_active(design.id, true).await.success);
    assert_eq!(f.ledger.list_categories().await.unwrap().len(), 1);

    let duplicate = f
        .ledger
        .add_category(NewCategory {
            name: "design".into(),
            ..NewCategory::default()
        })
        .await;
    assert!(!duplicate.success);
}

#[tokio::test]
async fn test_status_change_and_project_edit() {
    let f = fixture("project_edit").await;
    let acme = add_client(&f, "Acme", "a@a.com").await;
    let site = add_project(&f, "Site", acme, 50.0).await;
    assert!(f.ledger.log_time(entry(site, date(2024, 3, 1), 2.0)).await.success);

    let paused = f.ledger.change_status(site, ProjectStatus::Paused).await;
    assert!(paused.success);
    assert!(paused.message.contains("'paused'"), "{}", paused.message);
    let back = f.ledger.change_status(site, ProjectStatus::Active).await;
    assert!(back.success);

    let update = ProjectUpdate {
        hourly_rate: Some(60.0),
        deadline: Some(Some(date(2024, 12, 31))),
        ..ProjectUpdate::default()
    };
    assert!(f.ledger.update_project(site, update).await.success);
    let detail = f.ledger.view_project(site).await.unwrap();
    assert_eq!(detail.project.deadline, Some(date(2024, 12, 31)));
    // Earnings follow the current rate.
    assert_close(detail.totals.earnings, 120.0);

    let empty = f.ledger.update_project(site, ProjectUpdate::default()).await;
    assert!(!empty.success);
}

#[tokio::test]
async fn test_failed_update_leaves_client_unchanged() {
    let f = fixture("rollback").await;
    let acme = add_client(&f, "Acme", "a@a.com").await;
    add_client(&f, "Globex", "g@g.com").await;

    let update = ClientUpdate {
        name: Some("Renamed".into()),
        email: Some("g@g.com".into()),
        ..ClientUpdate::default()
    };
    let outcome = f.ledger.update_client(acme, update).await;
    assert!(!outcome.success);

    let stored = f.store.get_client(acme).await.unwrap();
    assert_eq!(stored.name, "Acme");
    assert_eq!(stored.email, "a@a.com");

    let ok = f
        .ledger
        .update_client(
            acme,
            ClientUpdate {
                phone: Some(Some("555-1234".into())),
                ..ClientUpdate::default()
            },
        )
        .await;
    assert!(ok.success);
    assert_eq!(
        f.store.get_client(acme).await.unwrap().phone.as_deref(),
        Some("555-1234")
    );
}

#[tokio::test]
async fn test_time_entry_edit_and_delete() {
    let f = fixture("entry_edit").await;
    let acme = add_client(&f, "Acme", "a@a.com").await;
    let site = add_project(&f, "Site", acme, 50.0).await;
    assert!(f.ledger.log_time(entry(site, date(2024, 3, 1), 2.0)).await.success);
    let id = f.store.list_time_entries().await.unwrap()[0].id;

    let update = TimeEntryUpdate {
        hours_worked: Some(3.0),
        task_type: Some(None),
        ..TimeEntryUpdate::default()
    };
    assert!(f.ledger.update_time_entry(id, update).await.success);
    let stored = f.store.get_time_entry(id).await.unwrap();
    assert_eq!(stored.hours_worked, 3.0);
    assert_eq!(stored.task_type, None);

    let invalid = TimeEntryUpdate {
        hours_worked: Some(-1.0),
        ..TimeEntryUpdate::default()
    };
    assert!(!f.ledger.update_time_entry(id, invalid).await.success);
    assert_eq!(f.store.get_time_entry(id).await.unwrap().hours_worked, 3.0);

    assert!(f.ledger.delete_time_entry(id).await.success);
    assert!(!f.ledger.delete_time_entry(id).await.success);
}

#[tokio::test]
async fn test_store_reopens_with_data() {
    let dir = common::TempDir::new("reopen");
    {
        let store = SqliteStore::connect(&dir.path, "ledger.db").await.unwrap();
        store
            .insert_client(&NewClient {
                name: "Acme".into(),
                email: "a@a.com".into(),
                ..NewClient::default()
            })
            .await
            .unwrap();
    }
    let reopened = SqliteStore::connect(&dir.path, "ledger.db").await.unwrap();
    let clients = reopened.list_clients().await.unwrap();
    assert_eq!(clients.len(), 1);
    assert_eq!(clients[0].name, "Acme");
}

#[tokio::test]
async fn test_aborted_cascade_keeps_every_row() {
    let f = fixture("cascade_abort").await;
    let acme = add_client(&f, "Acme", "a@a.com").await;
    let site = add_project(&f, "Site", acme, 50.0).await;
    assert!(f.ledger.log_time(entry(site, date(2024, 3, 1), 2.0)).await.success);

    // Entries and projects are removed before the client row, so this fails mid-cascade.
    let db = libsql::Builder::new_local(f.dir.path.join("ledger.db"))
        .build()
        .await
        .unwrap();
    let conn = db.connect().unwrap();
    conn.execute(
        "CREATE TRIGGER block_client_delete BEFORE DELETE ON clients
         BEGIN SELECT RAISE(ABORT, 'blocked'); END",
        (),
    )
    .await
    .unwrap();

    let outcome = f.ledger.delete_client(acme).await;
    assert!(!outcome.success);
    assert!(outcome.message.contains("blocked"), "{}", outcome.message);

    let counts = f.store.counts().await.unwrap();
    assert_eq!(counts.clients, 1);
    assert_eq!(counts.projects, 1);
    assert_eq!(counts.time_entries, 1);
    assert_eq!(f.store.list_time_entries_for_project(site).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_scoped_lists_only_return_owned_rows() {
    let f = fixture("scoped").await;
    let acme = add_client(&f, "Acme", "a@a.com").await;
    let globex = add_client(&f, "Globex", "g@g.com").await;
    let site = add_project(&f, "Site", acme, 50.0).await;
    let shop = add_project(&f, "Shop", acme, 40.0).await;
    let app = add_project(&f, "App", globex, 90.0).await;
    assert!(f.ledger.log_time(entry(site, date(2024, 3, 1), 1.0)).await.success);
    assert!(f.ledger.log_time(entry(app, date(2024, 3, 2), 3.0)).await.success);
    assert!(f.ledger.log_time(entry(site, date(2024, 3, 3), 2.0)).await.success);

    let owned: Vec<ProjectId> = f
        .store
        .list_projects_for_client(acme)
        .await
        .unwrap()
        .iter()
        .map(|p| p.id)
        .collect();
    assert_eq!(owned, vec![site, shop]);
    assert!(f.store.list_projects_for_client(999).await.unwrap().is_empty());

    let entries = f.store.list_time_entries_for_project(site).await.unwrap();
    assert_eq!(entries.len(), 2);
    assert!(entries.iter().all(|e| e.project_id == site));
    assert!(entries[0].id < entries[1].id);
    assert!(f.store.list_time_entries_for_project(shop).await.unwrap().is_empty());

    let detail = f.ledger.view_client(acme).await.unwrap();
    assert_eq!(detail.projects.len(), 2);
    assert!(detail.projects.iter().all(|row| row.client_name == "Acme"));
    assert_close(detail.total.hours, 3.0);
    assert_close(detail.total.earnings, 150.0);

    let project = f.ledger.view_project(site).await.unwrap();
    let dates: Vec<_> = project.entries.iter().map(|l| l.entry.date).collect();
    assert_eq!(dates, vec![date(2024, 3, 3), date(2024, 3, 1)]);
    assert!(project.entries.iter().all(|l| l.client_name == "Acme"));
    assert_close(project.totals.earnings, 150.0);
}
