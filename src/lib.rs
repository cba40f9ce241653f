pub mod config;
pub mod error;
pub mod presence;
pub mod process;
pub mod store;

/// Discord application id registered for this rich presence.
pub const DISCORD_APP_ID: i64 = 1_243_855_663_210_303_488;

/// Executable name of the monitored game process.
pub const GAME_PROCESS_NAME: &str = "Wuthering Waves.exe";

/// Location of the game's local key-value store, relative to the install
/// directory.
pub const LOCAL_STORAGE_SUBDIR: &str = "Wuthering Waves Game/Client/Saved/LocalStorage";

/// Sentinel published in place of any field that could not be read from the
/// local store.
pub const UNKNOWN: &str = "Unknown";
