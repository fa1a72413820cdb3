//! Report reads: recent activity, business summary, period report, store overview.
//!
//! Everything here is computed on demand from a store snapshot. Nothing is cached.

use crate::domain::aggregation::{self, BusinessSummary};
use crate::domain::DomainError;
use crate::ports::{LedgerStore, ReportExportPort};
use crate::usecases::views::{PeriodProjectRow, PeriodView, RecentEntries, Snapshot, StoreOverview};
use chrono::NaiveDate;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

/// Rows shown in the latest-entries and top-clients panels of the overview.
const OVERVIEW_LIMIT: usize = 5;

pub struct ReportService {
    store: Arc<dyn LedgerStore>,
    exporter: Option<Arc<dyn ReportExportPort>>,
}

impl ReportService {
    pub fn new(store: Arc<dyn LedgerStore>) -> Self {
        Self {
            store,
            exporter: None,
        }
    }

    pub fn with_exporter(mut self, exporter: Arc<dyn ReportExportPort>) -> Self {
        self.exporter = Some(exporter);
        self
    }

    pub fn can_export(&self) -> bool {
        self.exporter.is_some()
    }

    /// Entries dated on or after `today - days`, newest first, with their totals.
    pub async fn recent_entries(&self, days: u32, today: NaiveDate) -> Result<RecentEntries, DomainError> {
        let snapshot = Snapshot::load(self.store.as_ref()).await?;
        let selected = aggregation::recent(&snapshot.entries, today, days);
        let lines = snapshot.lines(selected);
        let mut total = aggregation::Tally::default();
        for line in &lines {
            total.add(line.entry.hours_worked, line.earnings);
        }
        Ok(RecentEntries {
            days,
            since: aggregation::cutoff(today, days),
            lines,
            total,
        })
    }

    pub async fn business_summary(&self, today: NaiveDate) -> Result<BusinessSummary, DomainError> {
        let snapshot = Snapshot::load(self.store.as_ref()).await?;
        Ok(aggregation::business_summary(
            snapshot.clients.len() as u64,
            &snapshot.projects,
            &snapshot.entries,
            today,
        ))
    }

    pub async fn period_report(&self, days: u32, today: NaiveDate) -> Result<PeriodView, DomainError> {
        let snapshot = Snapshot::load(self.store.as_ref()).await?;
        let report = aggregation::period_report(&snapshot.projects, &snapshot.entries, today, days);
        let clients = snapshot.client_names();

        let mut projects: Vec<PeriodProjectRow> = report
            .per_project
            .iter()
            .map(|(project_id, tally)| {
                let project = snapshot.project(*project_id);
                PeriodProjectRow {
                    project_id: *project_id,
                    project_name: project.map(|p| p.name.clone()).unwrap_or_default(),
                    client_name: project
                        .and_then(|p| clients.get(&p.client_id))
                        .map(|n| n.to_string())
                        .unwrap_or_default(),
                    tally: *tally,
                }
            })
            .collect();
        projects.sort_by(|a, b| b.tally.earnings.total_cmp(&a.tally.earnings));

        let lines = snapshot.lines(aggregation::recent(&snapshot.entries, today, days));
        info!(days, entries = report.entry_count, "period report built");
        Ok(PeriodView {
            report,
            projects,
            lines,
        })
    }

    /// Row counts, summary, the latest entries and the best-earning clients.
    pub async fn store_overview(&self, today: NaiveDate) -> Result<StoreOverview, DomainError> {
        let counts = self.store.counts().await?;
        let snapshot = Snapshot::load(self.store.as_ref()).await?;
        let summary = aggregation::business_summary(
            snapshot.clients.len() as u64,
            &snapshot.projects,
            &snapshot.entries,
            today,
        );

        let mut newest: Vec<_> = snapshot.entries.iter().collect();
        newest.sort_by(|a, b| b.date.cmp(&a.date).then(b.id.cmp(&a.id)));
        newest.truncate(OVERVIEW_LIMIT);
        let latest = snapshot.lines(newest);

        let names = snapshot.client_names();
        let top_clients = aggregation::top_clients(
            &snapshot.clients,
            &snapshot.projects,
            &snapshot.entries,
            OVERVIEW_LIMIT,
        )
        .into_iter()
        .map(|(id, earned)| {
            let name = names.get(&id).map(|n| n.to_string()).unwrap_or_default();
            (name, earned)
        })
        .collect();

        Ok(StoreOverview {
            counts,
            summary,
            latest,
            top_clients,
        })
    }

    /// Writes the period's entries through the configured exporter.
    pub async fn export_period(&self, view: &PeriodView) -> Result<PathBuf, DomainError> {
        let exporter = self
            .exporter
            .as_ref()
            .ok_or_else(|| DomainError::Storage("no report exporter configured".into()))?;
        exporter
            .export_period(view.report.until, view.report.days, &view.lines)
            .await
    }
}
