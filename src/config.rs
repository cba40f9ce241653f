use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::LOCAL_STORAGE_SUBDIR;

/// Config record written by the installer. The installer-only fields
/// (`rich_presence_install_location`, `startup_preference`,
/// `shortcut_preference`) are carried so a round-trip through this type does
/// not lose them, but the session never reads them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub wuwa_install_location: PathBuf,
    pub database_access_preference: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kuro_games_uid: Option<String>,
    pub rich_presence_install_location: PathBuf,
    #[serde(default)]
    pub startup_preference: bool,
    #[serde(default)]
    pub keep_running_preference: bool,
    #[serde(default)]
    pub shortcut_preference: bool,
    #[serde(default)]
    pub promote_preference: bool,
}

impl Config {
    /// Directory holding the game's local key-value store files.
    pub fn local_storage_dir(&self) -> PathBuf {
        self.wuwa_install_location.join(LOCAL_STORAGE_SUBDIR)
    }

    /// Checks the invariants the installer is supposed to guarantee.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.wuwa_install_location.exists() {
            return Err(ConfigError::MissingInstallLocation(
                self.wuwa_install_location.clone(),
            ));
        }

        if self.database_access_preference
            && self
                .kuro_games_uid
                .as_ref()
                .map_or(true, |uid| uid.trim().is_empty())
        {
            return Err(ConfigError::MissingUid);
        }

        Ok(())
    }
}

pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    tracing::debug!("Loading config from {}", path.display());

    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Unreadable {
        path: path.to_path_buf(),
        source,
    })?;

    let config: Config =
        serde_json::from_str(&contents).map_err(|source| ConfigError::Malformed {
            path: path.to_path_buf(),
            source,
        })?;

    config.validate()?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConfigError;

    fn base_config(install: PathBuf) -> Config {
        Config {
            wuwa_install_location: install,
            database_access_preference: false,
            kuro_games_uid: None,
            rich_presence_install_location: PathBuf::from("C:\\WutheringWavesRPC"),
            startup_preference: false,
            keep_running_preference: false,
            shortcut_preference: false,
            promote_preference: false,
        }
    }

    #[test]
    fn test_validate_rejects_missing_install_location() {
        let config = base_config(PathBuf::from("/definitely/not/a/real/path"));
        assert!(matches!(
            config.validate(),
            Err(ConfigError::MissingInstallLocation(_))
        ));
    }

    #[test]
    fn test_validate_requires_uid_with_database_access() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = base_config(dir.path().to_path_buf());
        config.database_access_preference = true;

        assert!(matches!(config.validate(), Err(ConfigError::MissingUid)));

        config.kuro_games_uid = Some("536789175".to_string());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_config_parses_installer_output() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        let contents = serde_json::json!({
            "wuwa_install_location": dir.path(),
            "database_access_preference": true,
            "kuro_games_uid": "536789175",
            "rich_presence_install_location": dir.path(),
            "startup_preference": true,
            "keep_running_preference": true,
            "shortcut_preference": false,
            "promote_preference": true,
        });
        fs::write(&path, contents.to_string()).unwrap();

        let config = load_config(&path).unwrap();
        assert!(config.database_access_preference);
        assert_eq!(config.kuro_games_uid.as_deref(), Some("536789175"));
        assert!(config.keep_running_preference);
        assert_eq!(
            config.local_storage_dir(),
            dir.path().join(LOCAL_STORAGE_SUBDIR)
        );
    }

    #[test]
    fn test_load_config_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_config(&dir.path().join("config.json"));
        assert!(matches!(result, Err(ConfigError::Unreadable { .. })));
    }
}
