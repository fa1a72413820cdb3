//! CSV export of period reports. Uses the `csv` crate for quoting and escaping.
//!
//! One row per time entry; the file name encodes the window (`report_<until>_<days>d.csv`).

use crate::domain::{DomainError, EntryLine};
use crate::ports::ReportExportPort;
use chrono::NaiveDate;
use std::path::PathBuf;
use tokio::fs;
use tracing::info;

const HEADER: [&str; 8] = [
    "Date",
    "Client",
    "Project",
    "Task",
    "Hours",
    "Rate",
    "Earnings",
    "Description",
];

/// Convert entry lines to a comma-delimited CSV string with a header row.
///
/// Amounts are written with two decimals; hours keep full precision.
pub fn entry_lines_to_csv(lines: &[EntryLine]) -> Result<String, csv::Error> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(true)
        .from_writer(Vec::new());

    wtr.write_record(HEADER)?;

    for line in lines {
        let description = line.entry.description.replace('\n', " ").replace('\r', "");
        wtr.write_record([
            line.entry.date.to_string(),
            line.client_name.clone(),
            line.project_name.clone(),
            line.entry.task_type.clone().unwrap_or_default(),
            line.entry.hours_worked.to_string(),
            format!("{:.2}", line.hourly_rate),
            format!("{:.2}", line.earnings),
            description,
        ])?;
    }

    wtr.flush()?;
    let bytes = wtr
        .into_inner()
        .map_err(|e| csv::Error::from(std::io::Error::other(e.to_string())))?;

    String::from_utf8(bytes).map_err(|e| {
        csv::Error::from(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            e.to_string(),
        ))
    })
}

/// Writes CSV reports into a directory (created on first export).
pub struct CsvReportExporter {
    reports_dir: PathBuf,
}

impl CsvReportExporter {
    pub fn new(reports_dir: impl Into<PathBuf>) -> Self {
        Self {
            reports_dir: reports_dir.into(),
        }
    }

    fn file_name(until: NaiveDate, days: u32) -> String {
        format!("report_{}_{}d.csv", until.format("%Y-%m-%d"), days)
    }
}

#[async_trait::async_trait]
impl ReportExportPort for CsvReportExporter {
    async fn export_period(
        &self,
        until: NaiveDate,
        days: u32,
        lines: &[EntryLine],
    ) -> Result<PathBuf, DomainError> {
        fs::create_dir_all(&self.reports_dir)
            .await
            .map_err(|e| DomainError::Storage(format!("Failed to create reports dir: {}", e)))?;

        let content = entry_lines_to_csv(lines)
            .map_err(|e| DomainError::Storage(format!("Failed to generate CSV: {}", e)))?;
        let path = self.reports_dir.join(Self::file_name(until, days));
        fs::write(&path, content)
            .await
            .map_err(|e| DomainError::Storage(format!("Failed to write report: {}", e)))?;

        info!(path = %path.display(), rows = lines.len(), "report exported");
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TimeEntry;
    use chrono::Utc;

    fn line(description: &str) -> EntryLine {
        EntryLine {
            entry: TimeEntry {
                id: 1,
                project_id: 2,
                date: NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
                hours_worked: 2.5,
                description: description.to_string(),
                task_type: Some("coding".into()),
                created_at: Utc::now(),
            },
            project_name: "Site".into(),
            client_name: "Acme, Inc.".into(),
            hourly_rate: 50.0,
            earnings: 125.0,
        }
    }

    #[test]
    fn test_entry_lines_to_csv_basic() {
        let csv = entry_lines_to_csv(&[line("Homepage layout")]).unwrap();
        let mut lines = csv.lines();
        assert_eq!(
            lines.next(),
            Some("Date,Client,Project,Task,Hours,Rate,Earnings,Description")
        );
        let row = lines.next().unwrap();
        assert!(row.starts_with("2024-01-05,\"Acme, Inc.\",Site,coding,2.5,50.00,125.00,"));
        assert!(row.ends_with("Homepage layout"));
        assert!(lines.next().is_none());
    }

    #[test]
    fn test_entry_lines_to_csv_newlines_flattened() {
        let csv = entry_lines_to_csv(&[line("first\nsecond")]).unwrap();
        assert_eq!(csv.lines().count(), 2);
        assert!(csv.contains("first second"));
    }

    #[test]
    fn test_file_name() {
        let until = NaiveDate::from_ymd_opt(2024, 3, 31).unwrap();
        assert_eq!(CsvReportExporter::file_name(until, 30), "report_2024-03-31_30d.csv");
    }

    #[tokio::test]
    async fn test_export_writes_file() {
        let dir = std::env::temp_dir().join(format!(
            "freelance-ledger-export-{}-{}",
            std::process::id(),
            Utc::now().timestamp_nanos_opt().unwrap_or_default()
        ));
        let exporter = CsvReportExporter::new(&dir);
        let until = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
        let path = exporter.export_period(until, 7, &[line("x")]).await.unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("Date,Client"));
        let _ = std::fs::remove_dir_all(&dir);
    }
}
