use anyhow::Context;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use warehouse_insight::app::create_app;
use warehouse_insight::card::AGENT_NAME;
use warehouse_insight::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env().context("invalid configuration")?;
    tracing::info!(
        url = %config.public_base_url,
        "determined public base URL for agent card"
    );

    let bind_addr = config.bind_addr();
    let app = create_app(config);

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {bind_addr}"))?;
    tracing::info!(addr = %bind_addr, agent = AGENT_NAME, "warehouse insight agent listening");

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
