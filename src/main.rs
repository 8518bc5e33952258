use clap::Parser;
use miette::{IntoDiagnostic, Result};
use paygate::application::gateway::PaymentGateway;
use paygate::config::Config;
use paygate::domain::validation::PaymentValidator;
use paygate::infrastructure::bank::AcquiringBankClient;
use paygate::infrastructure::in_memory::InMemoryPaymentStore;
use paygate::interfaces::http::{AppState, router};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let shutdown = CancellationToken::new();

    let bank = AcquiringBankClient::new(
        &config.bank_url,
        config.max_retries,
        Duration::from_millis(config.retry_delay_ms),
        shutdown.clone(),
    )
    .into_diagnostic()?;

    let gateway = PaymentGateway::new(
        Arc::new(InMemoryPaymentStore::new()),
        Arc::new(bank),
        PaymentValidator::new(config.currencies.clone()),
    );

    let app = router(AppState {
        gateway: Arc::new(gateway),
    });

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .into_diagnostic()?;
    info!(addr = %config.bind_addr, "payment gateway listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown))
        .await
        .into_diagnostic()?;

    Ok(())
}

/// Cancels in-flight bank retries, then lets the server drain.
async fn shutdown_signal(shutdown: CancellationToken) {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("shutting down");
    }
    shutdown.cancel();
}
