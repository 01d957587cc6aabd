mod api;
mod pages;

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tracing_subscriber::EnvFilter;

use nmcoast_api::{CountsClient, GeocodeClient};
use nmcoast_viewer::{Debouncer, ViewerApp};

use crate::api::{build_app, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = Arc::new(nmcoast_core::load_app_config()?);
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let counts = Arc::new(CountsClient::new(
        &config.api_base_url,
        config.request_timeout_secs,
    )?);
    let geocoder = Arc::new(GeocodeClient::new(
        &config.geocoder_base_url,
        config.request_timeout_secs,
    )?);

    let mut viewer = ViewerApp::new(
        config.dashboard_url.clone(),
        Duration::from_secs(config.search_pin_ttl_secs),
    );

    // One startup fetch; on failure the map simply starts empty.
    match counts.list_counters().await {
        Ok(counters) => viewer.load_counters(counters),
        Err(e) => {
            tracing::error!(error = %e, api = %config.api_base_url, "counter list fetch failed; starting with an empty map");
        }
    }

    let state = AppState {
        app: Arc::new(Mutex::new(viewer)),
        counts,
        geocoder,
        debouncer: Arc::new(Debouncer::new(Duration::from_millis(
            config.search_debounce_ms,
        ))),
        max_concurrent_count_fetches: config.max_concurrent_count_fetches,
    };
    let app = build_app(state);

    tracing::info!(addr = %config.bind_addr, env = %config.env, "nmcoast server listening");
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to listen for ctrl-c");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
