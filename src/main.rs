// region:    --- Imports
use crop_ledger::config::{AppConfig, LedgerBackend};
use crop_ledger::handlers;
use crop_ledger::service::RecordService;
use crop_ledger::state::{Ledger, MemoryLedger, PostgresLedger};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
// endregion: --- Imports

// region:    --- Main
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // configuration from the environment
    let config = AppConfig::from_env()?;

    // logging: RUST_LOG wins over the configured filter
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.log_filter)),
        )
        .without_time()
        .with_target(false)
        .init();

    // world state backend
    match &config.backend {
        LedgerBackend::Memory => {
            info!("{:<12} --> using in-memory world state", "Main");
            run(MemoryLedger::new(), &config).await
        }
        LedgerBackend::Postgres {
            database_url,
            max_connections,
        } => {
            let ledger = PostgresLedger::connect(database_url, *max_connections).await?;
            if let Err(e) = ledger.initialize_schema().await {
                error!("{:<12} --> schema initialization failed: {:?}", "Main", e);
                return Err(e.into());
            }
            info!("{:<12} --> using postgres world state", "Main");
            run(ledger, &config).await
        }
    }
}

/// Serves the API on top of `ledger` until the server stops.
async fn run<L: Ledger>(ledger: L, config: &AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    // one service shared by every handler
    let service = Arc::new(RecordService::new(Arc::new(ledger)));

    // optional seed of the base farmers
    if config.init_ledger {
        service.init_ledger().await?;
        info!("{:<12} --> ledger seeded", "Main");
    }

    // router
    let routes_all = handlers::router(service);

    // listener
    let listener = TcpListener::bind(config.bind_addr).await?;
    let local_addr: SocketAddr = listener.local_addr()?;
    info!("{:<12} --> Web Server: Listening on {}", "Main", local_addr);

    // run the server
    if let Err(err) = axum::serve(listener, routes_all.into_make_service()).await {
        error!("{:<12} --> Server error: {}", "Main", err);
    }
    Ok(())
}
// endregion: --- Main
