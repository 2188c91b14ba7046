use ironlist::{server, Config};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ironlist=debug,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting IronList S3-compatible mock server...");

    let config = Config::from_env()?;
    info!(
        "Listing defaults: max-keys={}, owner={}",
        config.listing.default_max_keys, config.storage.owner_display_name
    );

    if let Err(e) = server::run(config).await {
        error!("Server error: {:#}", e);
        return Err(e);
    }

    Ok(())
}
