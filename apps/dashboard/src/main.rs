use anyhow::{Context, Result};
use dashboard::{AppState, config::Config, routes};
use stock::{PriceClient, SymbolStore};
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();

    let config = Config::from_env()?;
    info!(version = %config.version, "starting stock dashboard");

    let symbol_store = SymbolStore::load(&config.tickers_path)?;
    let price_client = PriceClient::from_env().context("init price client failed")?;
    info!(
        tickers = symbol_store.len(),
        provider = price_client.base_api(),
        history_days = config.history_days,
        ma_windows = ?config.ma_windows,
        "dashboard configured"
    );

    let addr = config.bind_addr;
    let state = AppState::new(config, symbol_store, price_client);

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(%addr, "listening");
    info!("  GET  /            home");
    info!("  GET  /about/      about");
    info!("  GET  /dash/       dashboard");
    info!("  POST /dash/graph  chart + live price");
    info!("  POST /dash/buy    purchase confirmation");

    axum::serve(listener, routes::router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Shutdown complete.");
    Ok(())
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::{
            select,
            signal::unix::{SignalKind, signal},
        };
        let (mut sigterm, mut sigint) =
            match (signal(SignalKind::terminate()), signal(SignalKind::interrupt())) {
                (Ok(term), Ok(int)) => (term, int),
                (Err(e), _) | (_, Err(e)) => {
                    error!(error = ?e, "failed to install signal handlers");
                    let _ = tokio::signal::ctrl_c().await;
                    return;
                }
            };
        select! {
            _ = sigterm.recv() => {},
            _ = sigint.recv()  => {},
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}
