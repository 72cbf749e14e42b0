mod config;
mod errors;
mod evaluation;
mod models;
mod routes;
mod sheet_client;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::models::criteria::CriteriaTable;
use crate::routes::build_router;
use crate::sheet_client::SheetClient;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first; a missing endpoint stops startup here
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting evalform v{}", env!("CARGO_PKG_VERSION"));

    let criteria = match &config.criteria_file {
        Some(path) => CriteriaTable::from_json_file(path)
            .with_context(|| format!("Invalid criteria file {}", path.display()))?,
        None => CriteriaTable::default(),
    };
    info!("Criteria table loaded ({} criteria)", criteria.len());

    let sheet = SheetClient::new(config.sheet_endpoint_url.clone(), config.submit_timeout)?;
    info!(
        "Sheet client initialized (timeout: {}s)",
        config.submit_timeout.as_secs()
    );

    let state = AppState::new(&config, criteria, Arc::new(sheet));

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict to the form's origin once it is hosted

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
