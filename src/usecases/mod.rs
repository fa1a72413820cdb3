//! Application use cases. Orchestrate domain logic via ports.

pub mod ledger_service;
pub mod report_service;
pub mod seed_service;
pub mod views;

pub use ledger_service::LedgerService;
pub use report_service::ReportService;
pub use seed_service::{SeedService, SeedStats};
pub use views::CommandOutcome;
