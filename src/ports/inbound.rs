//! Inbound port. UI (adapter) calls into the application.

/// Input port: interactive front end driving the ledger use cases.
#[async_trait::async_trait]
pub trait InputPort: Send + Sync {
    /// Run the menu loop until the user exits. Domain failures are shown and the loop
    /// continues; only terminal I/O failures end it with an error.
    async fn run(&self) -> anyhow::Result<()>;
}
