use anyhow::Context;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let port = std::env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let seed = match std::env::var("SEED") {
        Ok(raw) => raw.parse::<u64>().with_context(|| format!("SEED must be an integer, got {raw:?}"))?,
        Err(_) => 0,
    };

    let addr = format!("127.0.0.1:{port}");
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!(%addr, seed, "mock posts server listening");
    axum::serve(listener, mock_server::app_with(mock_server::seed_posts(seed)))
        .await
        .context("server terminated")
}
