// Bank Service - server entry point

use anyhow::{Context, Result};
use rusqlite::Connection;
use std::env;
use tracing::info;
use tracing_subscriber::EnvFilter;

use bank_service::{app, BankStore};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // BANK_DB selects a database file; without it the store is in-memory
    // and lives only as long as the process.
    let store = match env::var("BANK_DB") {
        Ok(path) => {
            info!("opening database at {path}");
            let conn = Connection::open(&path)
                .with_context(|| format!("failed to open database at {path}"))?;
            BankStore::new(conn)?
        }
        Err(_) => {
            info!("no BANK_DB set, using in-memory database");
            BankStore::open_in_memory()?
        }
    };

    let seeded = store.seed_defaults()?;
    if seeded > 0 {
        info!("seeded {seeded} default banks");
    }

    let addr = env::var("BANK_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind to {addr}"))?;

    info!("bank-service {} listening on {addr}", bank_service::VERSION);

    axum::serve(listener, app(store))
        .await
        .context("server error")?;

    Ok(())
}
