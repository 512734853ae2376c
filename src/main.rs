//! feedbot - relays a game feed into an IRC channel.

use slirc_feedbot::Bridge;
use slirc_feedbot::config::Config;
use slirc_feedbot::dex::MemoryDex;
use slirc_feedbot::scoring::open_score_store;
use slirc_feedbot::telemetry::spans;
use std::sync::Arc;
use tracing::{Instrument, error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "feedbot.toml".to_string());

    let config = Config::load(&config_path).map_err(|e| {
        error!(path = %config_path, error = %e, "Failed to load config");
        e
    })?;
    config.validate()?;

    info!(
        server = %config.irc.server,
        nick = %config.irc.nickname,
        channel = %config.irc.channel,
        "Starting feedbot"
    );

    let dex = MemoryDex::load_dir(&config.data.path).map_err(|e| {
        error!(path = %config.data.path.display(), error = %e, "Failed to load game data");
        e
    })?;
    let scores = open_score_store(config.database.as_ref())
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to open score database");
            e
        })?;
    let bridge = Bridge::from_config(&config, Arc::new(dex)).with_score_store(scores);

    let span = spans::connection(&config.irc.server, &config.irc.nickname);
    tokio::select! {
        result = bridge.run(&config).instrument(span) => result?,
        _ = tokio::signal::ctrl_c() => info!("Received shutdown signal"),
    }

    info!("Shutdown complete");
    Ok(())
}
