use anyhow::Context;
use database::{DbRepository, connect};
use std::sync::Arc;

// This main function is the entry point when running `cargo run -p web-server`.
// It serves the journal database; use `trade-journal serve --ledger` for a JSON ledger.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = configuration::load_config()?;
    let _guard = configuration::init_tracing(&config.logging)?;

    let addr = config
        .server
        .addr()
        .context("server host must be an IP address")?;
    let store = DbRepository::new(connect().await?);
    let state = web_server::AppState::new(Arc::new(store), config.reports);

    web_server::run_server(addr, state).await
}
