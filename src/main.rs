use account_reports::application::context::AppContext;
use account_reports::config;
use account_reports::infrastructure::db::postgres::PostgresDatabase;
use account_reports::interface::http;
use account_reports::interface::http::state::AppState;
use metrics_exporter_prometheus::PrometheusBuilder;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // Step 1: Initialize logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Step 2: Load configuration.
    let settings = config::load().expect("load config");

    // Step 3: Install the metrics recorder.
    let metrics = match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => Some(handle),
        Err(err) => {
            warn!(error = %err, "metrics_recorder_unavailable");
            None
        }
    };

    // Step 4: Build the database connector and shared state.
    let db = Arc::new(PostgresDatabase::new(&settings.db));
    let ctx = AppContext::new(db);
    let state = AppState {
        ctx: Arc::new(ctx),
        metrics,
    };

    // Step 5: Build the HTTP app.
    let app = http::app(state);
    let bind_addr = format!("{}:{}", settings.server.host, settings.server.port);

    // Step 6: Bind and serve until ctrl-c.
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .expect("bind server");
    info!(
        addr = %bind_addr,
        db_host = %settings.db.host,
        db_port = settings.db.port,
        db_name = %settings.db.name,
        "server_started"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("serve");
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "shutdown_signal_failed");
        std::future::pending::<()>().await;
    }
    info!("server_stopping");
}
