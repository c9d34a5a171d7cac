use std::net::SocketAddr;

use anyhow::Context;
use campus::logging::{init_tracing, shutdown_tracer};
use campus::metrics::{init_metrics, metrics_app};
use campus::router::init_router;
use campus::state::AppState;
use campus_config::{DatabaseConfig, ServerConfig};
use dotenvy::dotenv;
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    init_tracing();

    let server_config = ServerConfig::from_env();
    let database_config = DatabaseConfig::from_env()?;

    let db = campus_db::connect(&database_config)
        .await
        .context("Failed to connect to database")?;
    campus_db::run_migrations(&db)
        .await
        .context("Failed to run migrations")?;

    if let Some(handle) = init_metrics() {
        let metrics_address = server_config.metrics_address();
        tokio::spawn(async move {
            match tokio::net::TcpListener::bind(&metrics_address).await {
                Ok(listener) => {
                    info!("Metrics available at http://{}/metrics", metrics_address);
                    if let Err(e) = axum::serve(listener, metrics_app(handle)).await {
                        error!(error = %e, "Metrics server stopped");
                    }
                }
                Err(e) => error!(error = %e, "Failed to bind metrics listener"),
            }
        });
    }

    let state = AppState::from_env(db.clone());
    let app = init_router(state);

    let address = server_config.address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {}", address))?;

    info!("Server running on http://{}", address);
    info!("Swagger UI available at http://{}/swagger-ui", address);
    info!("Scalar UI available at http://{}/scalar", address);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("Server error")?;

    campus_db::close_pool(&db).await;
    shutdown_tracer().await;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for shutdown signal");
        return;
    }
    info!("Shutdown signal received");
}
