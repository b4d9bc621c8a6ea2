use swiftbatch_core::Config;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    // Load configuration first - fail fast on misconfiguration
    let config = Config::from_env()?;

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Configuration loaded successfully");

    let (_state, router) = swiftbatch_api::setup::initialize_app(config.clone())?;

    swiftbatch_api::setup::server::start_server(&config, router).await?;

    Ok(())
}
