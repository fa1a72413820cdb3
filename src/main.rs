//! Wiring & DI. Entry point: bootstrap adapters, inject into services, run UI.
//! No business logic here.

use dotenv::dotenv;
use freelance_ledger::adapters::export::CsvReportExporter;
use freelance_ledger::adapters::persistence::SqliteStore;
use freelance_ledger::adapters::ui::tui::{TuiInputPort, TuiSettings};
use freelance_ledger::ports::{InputPort, LedgerStore, ReportExportPort};
use freelance_ledger::shared::config::AppConfig;
use freelance_ledger::usecases::{LedgerService, ReportService, SeedService};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let env_loaded = dotenv();
    // Logs go to stderr so they never interleave with the menus on stdout.
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match &env_loaded {
        Ok(path) => info!(path = %path.display(), "loaded .env"),
        Err(_) => info!(cwd = %cwd.display(), "no .env found (check CWD)"),
    }

    let cfg = AppConfig::load().map_err(|e| anyhow::anyhow!("invalid configuration: {}", e))?;

    let data_dir = cfg.data_dir_or_default();
    let store = SqliteStore::connect(&data_dir, &cfg.database_file_or_default())
        .await
        .map_err(|e| anyhow::anyhow!("SQLite connect failed: {}", e))?;
    info!(path = %store.path().display(), "using ledger database");
    let store: Arc<dyn LedgerStore> = Arc::new(store);

    let exporter: Arc<dyn ReportExportPort> = Arc::new(CsvReportExporter::new(cfg.reports_dir()));

    // --- Services ---
    let ledger = Arc::new(LedgerService::new(Arc::clone(&store)));
    let reports = Arc::new(ReportService::new(Arc::clone(&store)).with_exporter(exporter));
    let seeder = Arc::new(SeedService::new(
        Arc::clone(&store),
        cfg.seed_clients_or_default(),
        cfg.seed_rng,
    ));

    freelance_ledger::adapters::ui::init_ui();

    let settings = TuiSettings {
        default_hourly_rate: cfg.default_hourly_rate_or_default(),
        recent_days: cfg.recent_days_or_default(),
        report_days: cfg.report_days_or_default(),
    };
    let input_port: Arc<dyn InputPort> =
        Arc::new(TuiInputPort::new(ledger, reports, seeder, settings));

    input_port.run().await?;

    Ok(())
}
