//! # BuildLedger API Server
//!
//! Serves the BuildLedger back office: projects, sections, spendings,
//! employees, payments, inventory and users of each branch country, plus the
//! balance, rollup and dashboard views built on them.
//!
//! ## Usage
//!
//! ```bash
//! BUILDLEDGER__JWT__SECRET=... BUILDLEDGER__SEED__ADMIN_PASSWORD=... cargo run -p buildledger-api
//! ```

use buildledger_api::app::{build_router, AppState};
use buildledger_api::config::Config;
use buildledger_shared::store::{bootstrap, Store};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "buildledger_api=debug,buildledger_shared=info,tower_http=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        "BuildLedger API Server v{} starting...",
        env!("CARGO_PKG_VERSION")
    );

    let config = Config::from_env()?;

    let store = Store::connect(config.store_config()).await?;
    let report = bootstrap(&store, &config.seed_config()).await?;
    tracing::info!(
        mode = %store.mode(),
        partitions = report.partitions_ensured,
        admins_created = report.admins_created.len(),
        "Storage bootstrapped"
    );

    let bind_address = config.bind_address();
    let app = build_router(AppState::new(store, config));

    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    tracing::info!("Server listening on http://{}", bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received, exiting...");
}
