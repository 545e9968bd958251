use std::time::Duration;

use backend_facade::Backends;
use dotenvy::dotenv;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const ROUND_TRIP_KEY: &str = "demo-status:round-trip";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("{}=debug,backend_facade=debug", env!("CARGO_CRATE_NAME")).into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let backends = Backends::from_env()?;

    // Construction returns immediately; give the connect attempts a chance to settle.
    if tokio::time::timeout(Duration::from_secs(5), backends.ready())
        .await
        .is_err()
    {
        tracing::warn!("Backends still connecting after 5s");
    }

    println!("{}", serde_json::to_string(&backends.status())?);
    println!("{}", serde_json::to_string(&backends.stats().await)?);

    backends.cache.set(ROUND_TRIP_KEY, "ok", 10).await;
    let echoed = backends.cache.get(ROUND_TRIP_KEY).await;
    tracing::info!(value = ?echoed, "Cache round trip");
    backends.cache.del(ROUND_TRIP_KEY).await;

    backends.close().await;
    Ok(())
}
