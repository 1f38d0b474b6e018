use std::{sync::Arc, time::Duration};

use anyhow::Context;
use pub_recorder::{
    app, config::Settings, models::AppState, producer::KafkaBroker, store::MySqlAuditStore,
    telemetry,
};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load().context("failed to load configuration")?;
    telemetry::init(&settings.log.level);

    let broker = Arc::new(
        KafkaBroker::create(&settings.broker).context("failed to create kafka producer")?,
    );
    let store = MySqlAuditStore::from_url(&settings.database.url)
        .context("invalid database url")?;

    let state = AppState::new(broker.clone(), Arc::new(store), &settings);

    let addr = (settings.server.host.as_str(), settings.server.port);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}:{}", addr.0, addr.1))?;
    info!(addr = %listener.local_addr()?, "listening");

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("http server failed")?;

    info!("shutting down, flushing broker");
    broker.flush(Duration::from_secs(5));
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
