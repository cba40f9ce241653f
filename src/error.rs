use std::path::PathBuf;

/// Errors raised while talking to the presence service.
///
/// `ConnectFailed` is recoverable and retried by the session; everything else
/// propagates out of the session loop and ends the process.
#[derive(Debug, thiserror::Error)]
pub enum PresenceError {
    #[error("could not connect to the presence service: {0}")]
    ConnectFailed(String),

    #[error("presence update was attempted before connecting")]
    NotConnected,

    #[error("presence update failed: {0}")]
    UpdateFailed(String),
}

/// Errors raised while loading or validating the config file written by the
/// installer.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file {path} could not be read: {source}")]
    Unreadable {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("config file {path} could not be parsed: {source}")]
    Malformed {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("the game install location {0} does not exist")]
    MissingInstallLocation(PathBuf),

    #[error("database access is enabled but no Kuro Games UID is configured")]
    MissingUid,
}
