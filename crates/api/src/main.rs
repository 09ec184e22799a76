use std::sync::Arc;

use anyhow::Context;

use shopcart_api::{app, config::ApiConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ApiConfig::from_env().context("invalid configuration")?;
    shopcart_observability::init_with(config.log_format);

    let services = app::services::build_services(&config)
        .await
        .context("failed to initialize cart store")?;
    tracing::info!(
        backend = services.backend().as_str(),
        cors_origins = ?config.cors_origins,
        "cart services ready"
    );

    let app = app::build_app(Arc::new(services), &config);

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
