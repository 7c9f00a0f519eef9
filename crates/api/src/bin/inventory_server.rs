//! Inventory RPC server entry point.

use api::config::Config;
use axum::Router;
use inventory::{InMemoryDirectory, PostgresDirectory};
use tokio::signal;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install SIGINT handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }
    tracing::info!("shutdown signal received");
}

#[tokio::main]
async fn main() {
    let config = Config::from_env();

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.log_level)),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let metrics_handle = metrics_exporter_prometheus::PrometheusBuilder::new()
        .install_recorder()
        .expect("failed to install Prometheus recorder");

    let rpc: Router = match &config.database_url {
        Some(url) => {
            let pool = api::bootstrap::connect(url, &config)
                .await
                .expect("failed to connect to database");
            inventory::server::router(PostgresDirectory::new(pool))
        }
        None => {
            tracing::warn!("DATABASE_URL not set, inventory is kept in memory");
            inventory::server::router(InMemoryDirectory::new())
        }
    };
    let app = rpc.merge(
        Router::new()
            .route("/metrics", axum::routing::get(api::routes::metrics::get))
            .with_state(metrics_handle),
    );

    let addr = config.inventory_addr();
    tracing::info!(%addr, "starting inventory rpc server");

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind address");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("server error");

    tracing::info!("inventory rpc server shut down gracefully");
}
