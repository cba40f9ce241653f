use std::path::PathBuf;
use std::process::ExitCode;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use wuwa_rpc::config::load_config;
use wuwa_rpc::presence::{DiscordClient, PresenceSession, SessionConfig};
use wuwa_rpc::process::SystemProcessMonitor;
use wuwa_rpc::DISCORD_APP_ID;

const DEFAULT_CONFIG_PATH: &str = "config/config.json";
const LOG_DIR_NAME: &str = "WutheringWavesRPC";
const LOG_FILE_NAME: &str = "log.txt";

/// Sets up console logging plus an append-only `log.txt` under the platform
/// local data directory. The returned guard keeps the file writer's worker
/// alive so buffered lines are flushed on shutdown.
fn init_logging() -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let log_dir = dirs::data_local_dir()
        .map(|dir| dir.join(LOG_DIR_NAME))
        .filter(|dir| std::fs::create_dir_all(dir).is_ok());

    match log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::never(dir, LOG_FILE_NAME);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer())
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_ansi(false)
                        .with_writer(writer),
                )
                .init();
            Some(guard)
        }
        None => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer())
                .init();
            None
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let _guard = init_logging();

    let config_path = std::env::args()
        .nth(1)
        .map_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH), PathBuf::from);

    let config = match load_config(&config_path) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("{e}");
            return ExitCode::FAILURE;
        }
    };

    let session = PresenceSession::new(
        SessionConfig::from_config(&config),
        Box::new(DiscordClient::new(DISCORD_APP_ID)),
        Box::new(SystemProcessMonitor),
    );

    if let Err(e) = session.run().await {
        tracing::error!("An uncaught error occurred: {e}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
