//! Shared fixtures: a throwaway on-disk ledger database per test.

#![allow(dead_code)]

use chrono::{Days, NaiveDate};
use freelance_ledger::adapters::persistence::SqliteStore;
use freelance_ledger::ports::LedgerStore;
use freelance_ledger::usecases::{LedgerService, ReportService};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

static COUNTER: AtomicU32 = AtomicU32::new(0);

/// Unique directory under the system temp dir, removed on drop.
pub struct TempDir {
    pub path: PathBuf,
}

impl TempDir {
    pub fn new(label: &str) -> Self {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.subsec_nanos())
            .unwrap_or_default();
        let path = std::env::temp_dir().join(format!(
            "freelance_ledger_{}_{}_{}_{}",
            label,
            std::process::id(),
            COUNTER.fetch_add(1, Ordering::SeqCst),
            nanos
        ));
        std::fs::create_dir_all(&path).unwrap();
        Self { path }
    }
}

impl Drop for TempDir {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.path);
    }
}

pub struct Fixture {
    pub dir: TempDir,
    pub store: Arc<dyn LedgerStore>,
    pub ledger: LedgerService,
    pub reports: ReportService,
}

pub async fn fixture(label: &str) -> Fixture {
    let dir = TempDir::new(label);
    let store: Arc<dyn LedgerStore> =
        Arc::new(SqliteStore::connect(&dir.path, "ledger.db").await.unwrap());
    Fixture {
        ledger: LedgerService::new(Arc::clone(&store)),
        reports: ReportService::new(Arc::clone(&store)),
        store,
        dir,
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn days_before(today: NaiveDate, days: u64) -> NaiveDate {
    today.checked_sub_days(Days::new(days)).unwrap()
}

pub fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-6,
        "expected {expected}, got {actual}"
    );
}
