use std::path::PathBuf;
use std::time::Duration;

use chrono::Utc;
use tokio::time::sleep;

use super::client::{ActivityPayload, Button, PresenceClient};
use crate::config::Config;
use crate::process::ProcessProbe;
use crate::store::{select_active_file, LocalStore};
use crate::{GAME_PROCESS_NAME, LOCAL_STORAGE_SUBDIR};

const LARGE_IMAGE: &str = "logo";
const LARGE_TEXT: &str = "Wuthering Waves";
const SMALL_IMAGE: &str = "logo";
const PLACEHOLDER_DETAILS: &str = "Exploring SOL-III";
const PROMO_LABEL: &str = "Want a status like this?";
const PROMO_URL: &str = "https://github.com/xAkre/Wuthering-Waves-RPC";

/// The slice of the installer config the session actually consumes.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub game_install: PathBuf,
    pub use_local_data: bool,
    pub player_id: Option<String>,
    pub keep_running: bool,
    pub promote: bool,
}

impl SessionConfig {
    pub fn from_config(config: &Config) -> Self {
        Self {
            game_install: config.wuwa_install_location.clone(),
            use_local_data: config.database_access_preference,
            player_id: config.kuro_games_uid.clone(),
            keep_running: config.keep_running_preference,
            promote: config.promote_preference,
        }
    }
}

/// Poll cadences for the session loop. Tests shrink these to run the machine
/// without real waiting.
#[derive(Debug, Clone, Copy)]
pub struct Timing {
    /// Delay between presence-service connection attempts.
    pub connect_retry: Duration,
    /// Period of the awaiting-game and active polling loops.
    pub poll: Duration,
    /// Period of the paused loop once the game has exited.
    pub paused_poll: Duration,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            connect_retry: Duration::from_secs(15),
            poll: Duration::from_secs(15),
            paused_poll: Duration::from_secs(30),
        }
    }
}

enum State {
    Disconnected,
    AwaitingGame,
    Active { start: i64 },
    Paused,
    Terminated,
}

/// The presence lifecycle: connect to the presence service, wait for the
/// game, publish an update every tick while it runs, then either pause until
/// the game returns or terminate.
///
/// Failure policy: connection attempts retry forever, local-data problems
/// degrade the tick, and anything else propagates out of [`run`] so the
/// caller can log once and exit.
///
/// [`run`]: PresenceSession::run
pub struct PresenceSession {
    config: SessionConfig,
    timing: Timing,
    client: Box<dyn PresenceClient>,
    probe: Box<dyn ProcessProbe>,
}

impl PresenceSession {
    pub fn new(
        config: SessionConfig,
        client: Box<dyn PresenceClient>,
        probe: Box<dyn ProcessProbe>,
    ) -> Self {
        Self {
            config,
            timing: Timing::default(),
            client,
            probe,
        }
    }

    pub fn with_timing(mut self, timing: Timing) -> Self {
        self.timing = timing;
        self
    }

    /// Drives the session until the game exits (unless configured to keep
    /// running) or an unrecoverable presence error occurs.
    pub async fn run(mut self) -> Result<(), crate::error::PresenceError> {
        let mut state = State::Disconnected;

        loop {
            state = match state {
                State::Disconnected => match self.client.connect().await {
                    Ok(()) => State::AwaitingGame,
                    Err(e) => {
                        tracing::info!(
                            "{} could not be found installed and running on this machine: {e}",
                            self.client.name()
                        );
                        sleep(self.timing.connect_retry).await;
                        State::Disconnected
                    }
                },
                State::AwaitingGame => {
                    if self.probe.exists(GAME_PROCESS_NAME) {
                        tracing::info!(
                            "Wuthering Waves and {} are running, starting rich presence...",
                            self.client.name()
                        );
                        let start = Utc::now().timestamp();
                        self.client.update(&ActivityPayload::starting(start)).await?;
                        State::Active { start }
                    } else {
                        tracing::info!("Wuthering Waves is not running, waiting...");
                        sleep(self.timing.poll).await;
                        State::AwaitingGame
                    }
                }
                State::Active { start } => {
                    if self.probe.exists(GAME_PROCESS_NAME) {
                        tracing::info!("Updating rich presence...");
                        let payload = self.build_payload(start);
                        self.client.update(&payload).await?;
                        sleep(self.timing.poll).await;
                        State::Active { start }
                    } else {
                        self.client.close().await;
                        if self.config.keep_running {
                            State::Paused
                        } else {
                            State::Terminated
                        }
                    }
                }
                State::Paused => {
                    if self.probe.exists(GAME_PROCESS_NAME) {
                        // Re-enter the full startup sequence, reconnecting to
                        // the presence service from scratch.
                        State::Disconnected
                    } else {
                        tracing::info!(
                            "Wuthering Waves has closed, waiting for it to start again..."
                        );
                        sleep(self.timing.paused_poll).await;
                        State::Paused
                    }
                }
                State::Terminated => {
                    tracing::info!("Wuthering Waves has closed, closing rich presence...");
                    return Ok(());
                }
            };
        }
    }

    /// Builds the payload for one tick. The session start timestamp is never
    /// refreshed within a single active run.
    fn build_payload(&self, start: i64) -> ActivityPayload {
        let buttons = if self.config.promote {
            vec![Button {
                label: PROMO_LABEL.to_string(),
                url: PROMO_URL.to_string(),
            }]
        } else {
            Vec::new()
        };

        let placeholder = ActivityPayload {
            start,
            details: Some(PLACEHOLDER_DETAILS.to_string()),
            large_image: Some(LARGE_IMAGE.to_string()),
            large_text: Some(LARGE_TEXT.to_string()),
            buttons: buttons.clone(),
            ..ActivityPayload::default()
        };

        if !self.config.use_local_data {
            return placeholder;
        }
        let Some(player_id) = self.config.player_id.as_deref() else {
            return placeholder;
        };

        let directory = self.config.game_install.join(LOCAL_STORAGE_SUBDIR);
        let path = match select_active_file(&directory, player_id) {
            Ok(Some(path)) => path,
            Ok(None) => {
                tracing::warn!("No save files found in {}", directory.display());
                return placeholder;
            }
            Err(e) => {
                tracing::warn!("Could not scan {} for save files: {e}", directory.display());
                return placeholder;
            }
        };

        // Reopened every tick; the active file can change between ticks.
        let store = match LocalStore::open(&path) {
            Ok(store) => store,
            Err(e) => {
                tracing::warn!("{e}");
                return placeholder;
            }
        };

        ActivityPayload {
            start,
            details: Some(format!("Union Level {}", store.read_union_level(player_id))),
            state: Some(format!("Region: {}", store.read_region(player_id))),
            large_image: Some(LARGE_IMAGE.to_string()),
            large_text: Some(LARGE_TEXT.to_string()),
            small_image: Some(SMALL_IMAGE.to_string()),
            small_text: Some(format!("Version: {}", store.read_game_version())),
            buttons,
        }
    }
}
