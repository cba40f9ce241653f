use std::path::{Path, PathBuf};

use rusqlite::{Connection, OpenFlags};
use serde::Deserialize;

use crate::UNKNOWN;

const SDK_LEVEL_DATA_KEY: &str = "SdkLevelData";
const PATCH_VERSION_KEY: &str = "PatchVersion";

/// Typed failures while reading the game's local store. Only
/// [`StoreError::ConnectFailed`] is ever seen by callers of
/// [`LocalStore::open`]; the per-field read methods swallow the rest into the
/// `"Unknown"` sentinel.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("could not open local store {path}: {source}")]
    ConnectFailed {
        path: PathBuf,
        source: rusqlite::Error,
    },

    #[error("key {0:?} is not present in the local store")]
    KeyMissing(&'static str),

    #[error("local store query for {key:?} failed: {source}")]
    QueryFailed {
        key: &'static str,
        source: rusqlite::Error,
    },

    #[error("value for {key:?} is not the expected shape: {source}")]
    Malformed {
        key: &'static str,
        source: serde_json::Error,
    },

    #[error("no level data entry for player {0}")]
    PlayerNotFound(String),
}

/// Shape of the `SdkLevelData` value: an association list from Kuro Games UID
/// to a one-element list of level records. The store may hold several local
/// profiles; only the entry matching the configured UID is authoritative.
#[derive(Debug, Deserialize)]
struct SdkLevelData {
    #[serde(rename = "Content")]
    content: Vec<SdkLevelEntry>,
}

#[derive(Debug, Deserialize)]
struct SdkLevelEntry(String, Vec<PlayerLevelData>);

/// One player's progression record as stored by the game client.
#[derive(Debug, Clone, Deserialize)]
pub struct PlayerLevelData {
    #[serde(rename = "Region")]
    pub region: Option<String>,
    #[serde(rename = "Level")]
    pub level: Option<u32>,
}

/// Read-only view over one of the game's `LocalStorage*.db` SQLite files.
/// Connections are short-lived: the session opens a fresh store every tick
/// because the game rotates the active file.
pub struct LocalStore {
    conn: Connection,
}

impl LocalStore {
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let conn = Connection::open_with_flags(path, OpenFlags::SQLITE_OPEN_READ_ONLY)
            .map_err(|source| StoreError::ConnectFailed {
                path: path.to_path_buf(),
                source,
            })?;

        Ok(Self { conn })
    }

    fn value(&self, key: &'static str) -> Result<String, StoreError> {
        self.conn
            .query_row(
                "SELECT value FROM LocalStorage WHERE key = ?1",
                [key],
                |row| row.get(0),
            )
            .map_err(|source| match source {
                rusqlite::Error::QueryReturnedNoRows => StoreError::KeyMissing(key),
                source => StoreError::QueryFailed { key, source },
            })
    }

    /// Level record for `player_id`, with a typed error for every way the
    /// stored blob can fail to hold one.
    pub fn level_data(&self, player_id: &str) -> Result<PlayerLevelData, StoreError> {
        let raw = self.value(SDK_LEVEL_DATA_KEY)?;
        let data: SdkLevelData =
            serde_json::from_str(&raw).map_err(|source| StoreError::Malformed {
                key: SDK_LEVEL_DATA_KEY,
                source,
            })?;

        data.content
            .into_iter()
            .find(|entry| entry.0 == player_id)
            .and_then(|entry| entry.1.into_iter().next())
            .ok_or_else(|| StoreError::PlayerNotFound(player_id.to_string()))
    }

    /// The player's region, or `"Unknown"` if it cannot be read. Never fails.
    pub fn read_region(&self, player_id: &str) -> String {
        match self.level_data(player_id) {
            Ok(PlayerLevelData {
                region: Some(region),
                ..
            }) if !region.is_empty() => region,
            Ok(_) => UNKNOWN.to_string(),
            Err(e) => {
                tracing::warn!("Could not read the player's region: {e}");
                UNKNOWN.to_string()
            }
        }
    }

    /// The player's union level, or `"Unknown"` if it cannot be read. Never
    /// fails.
    pub fn read_union_level(&self, player_id: &str) -> String {
        match self.level_data(player_id) {
            Ok(PlayerLevelData {
                level: Some(level), ..
            }) => level.to_string(),
            Ok(_) => UNKNOWN.to_string(),
            Err(e) => {
                tracing::warn!("Could not read the player's union level: {e}");
                UNKNOWN.to_string()
            }
        }
    }

    /// The game version, or `"Unknown"` if it cannot be read. The store wraps
    /// the version in literal quote characters; those are stripped. Never
    /// fails.
    pub fn read_game_version(&self) -> String {
        match self.value(PATCH_VERSION_KEY) {
            Ok(version) => {
                let version = version.replace('"', "");
                if version.is_empty() {
                    UNKNOWN.to_string()
                } else {
                    version
                }
            }
            Err(e) => {
                tracing::warn!("Could not read the game version: {e}");
                UNKNOWN.to_string()
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Creates a store file shaped like the game's, with the given key/value
    /// rows.
    pub(crate) fn write_store(path: &Path, rows: &[(&str, &str)]) {
        let conn = Connection::open(path).unwrap();
        conn.execute("CREATE TABLE LocalStorage (key TEXT PRIMARY KEY, value TEXT)", [])
            .unwrap();
        for (key, value) in rows {
            conn.execute(
                "INSERT INTO LocalStorage (key, value) VALUES (?1, ?2)",
                [key, value],
            )
            .unwrap();
        }
    }

    pub(crate) const LEVEL_DATA: &str = r#"{
        "___MetaType___": "___Map___",
        "Content": [
            ["535414272", [{"Region": "Europe", "Level": 4}]],
            ["536678859", [{"Region": "Europe", "Level": 3}]],
            ["536789175", [{"Region": "Europe", "Level": 22}]]
        ]
    }"#;

    #[test]
    fn test_reads_fields_for_the_configured_player() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("LocalStorage.db");
        write_store(
            &path,
            &[("SdkLevelData", LEVEL_DATA), ("PatchVersion", "\"2.1.0\"")],
        );

        let store = LocalStore::open(&path).unwrap();
        assert_eq!(store.read_region("536789175"), "Europe");
        assert_eq!(store.read_union_level("536789175"), "22");
        assert_eq!(store.read_union_level("535414272"), "4");
        assert_eq!(store.read_game_version(), "2.1.0");
    }

    #[test]
    fn test_version_without_quotes_passes_through() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("LocalStorage.db");
        write_store(&path, &[("PatchVersion", "2.1.0")]);

        let store = LocalStore::open(&path).unwrap();
        assert_eq!(store.read_game_version(), "2.1.0");
    }

    #[test]
    fn test_missing_keys_degrade_to_unknown() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("LocalStorage.db");
        write_store(&path, &[]);

        let store = LocalStore::open(&path).unwrap();
        assert_eq!(store.read_region("536789175"), "Unknown");
        assert_eq!(store.read_union_level("536789175"), "Unknown");
        assert_eq!(store.read_game_version(), "Unknown");
    }

    #[test]
    fn test_malformed_level_data_degrades_to_unknown() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("LocalStorage.db");
        write_store(
            &path,
            &[("SdkLevelData", "{\"Content\": \"not an association list\"}")],
        );

        let store = LocalStore::open(&path).unwrap();
        assert_eq!(store.read_region("536789175"), "Unknown");
        assert_eq!(store.read_union_level("536789175"), "Unknown");
    }

    #[test]
    fn test_unlisted_player_degrades_to_unknown() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("LocalStorage.db");
        write_store(&path, &[("SdkLevelData", LEVEL_DATA)]);

        let store = LocalStore::open(&path).unwrap();
        assert_eq!(store.read_region("999999999"), "Unknown");
        assert!(matches!(
            store.level_data("999999999"),
            Err(StoreError::PlayerNotFound(_))
        ));
    }

    #[test]
    fn test_open_missing_file_is_connect_failed() {
        let dir = tempfile::tempdir().unwrap();
        let result = LocalStore::open(&dir.path().join("nope.db"));
        assert!(matches!(result, Err(StoreError::ConnectFailed { .. })));
    }
}
