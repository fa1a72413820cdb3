//! Export adapter. Implements ReportExportPort with CSV files.

pub mod csv_report;

pub use csv_report::{CsvReportExporter, entry_lines_to_csv};
