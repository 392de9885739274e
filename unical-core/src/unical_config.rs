//! Global unical configuration.

use std::path::{Path, PathBuf};

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::error::{UnicalError, UnicalResult};
use crate::org_zone::{DEFAULT_TZID, DEFAULT_UTC_OFFSET, OrgZone};

static DEFAULT_DATA_DIR: &str = "~/.local/share/unical";
static DEFAULT_USER: &str = "default";
pub const DEFAULT_SERVER_PORT: u16 = 4096;

fn default_data_dir() -> PathBuf {
    PathBuf::from(DEFAULT_DATA_DIR)
}

fn default_user() -> String {
    DEFAULT_USER.to_string()
}

fn default_utc_offset() -> String {
    DEFAULT_UTC_OFFSET.to_string()
}

fn default_tzid() -> String {
    DEFAULT_TZID.to_string()
}

fn default_server_port() -> u16 {
    DEFAULT_SERVER_PORT
}

/// Global configuration at ~/.config/unical/config.toml
///
/// Every key can be overridden from the environment with a `UNICAL_`
/// prefix, e.g. `UNICAL_UTC_OFFSET=+09:00`.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct UnicalConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Where published feeds are written. Defaults to `<data_dir>/public`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publish_dir: Option<PathBuf>,

    /// URL prefix that serves `publish_dir`. Defaults to `file://<publish_dir>`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_base_url: Option<String>,

    #[serde(default = "default_user")]
    pub user: String,

    #[serde(default = "default_utc_offset")]
    pub utc_offset: String,

    #[serde(default = "default_tzid")]
    pub tzid: String,

    #[serde(default = "default_server_port")]
    pub server_port: u16,
}

impl Default for UnicalConfig {
    fn default() -> Self {
        UnicalConfig {
            data_dir: default_data_dir(),
            publish_dir: None,
            public_base_url: None,
            user: default_user(),
            utc_offset: default_utc_offset(),
            tzid: default_tzid(),
            server_port: default_server_port(),
        }
    }
}

impl UnicalConfig {
    pub fn config_path() -> UnicalResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| UnicalError::Config("Could not determine config directory".into()))?
            .join("unical");

        Ok(config_dir.join("config.toml"))
    }

    /// Load the global config, writing a commented default file first if there is none.
    pub fn load() -> UnicalResult<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            Self::create_default_config(&config_path)?;
        }

        Self::load_from(&config_path)
    }

    pub fn load_from(path: &Path) -> UnicalResult<Self> {
        let config: UnicalConfig = Config::builder()
            .add_source(File::from(path.to_path_buf()).required(false))
            .add_source(Environment::with_prefix("UNICAL").try_parsing(true))
            .build()
            .map_err(|e| UnicalError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| UnicalError::Config(e.to_string()))?;

        // Fail on a bad offset at load time rather than at first use
        config.zone()?;

        Ok(config)
    }

    /// Write this config as TOML, leaving unset options out.
    pub fn save_to(&self, path: &Path) -> UnicalResult<()> {
        let content =
            toml::to_string_pretty(self).map_err(|e| UnicalError::Config(e.to_string()))?;

        std::fs::write(path, content)
            .map_err(|e| UnicalError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }

    /// Create a default config file with all options commented out.
    pub fn create_default_config(path: &Path) -> UnicalResult<()> {
        let contents = format!(
            "\
# unical configuration

# Where event data lives:
# data_dir = \"{DEFAULT_DATA_DIR}\"

# Where published feeds are written (defaults to <data_dir>/public):
# publish_dir = \"{DEFAULT_DATA_DIR}/public\"

# URL prefix that serves publish_dir:
# public_base_url = \"https://calendars.example.com\"

# Whose schedule this is:
# user = \"{DEFAULT_USER}\"

# Fixed offset used for floating times in imported feeds:
# utc_offset = \"{DEFAULT_UTC_OFFSET}\"

# TZID label written on exported times:
# tzid = \"{DEFAULT_TZID}\"

# Port for unical-server:
# server_port = {DEFAULT_SERVER_PORT}
"
        );

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                UnicalError::Config(format!("Could not create config directory: {e}"))
            })?;
        }

        std::fs::write(path, contents)
            .map_err(|e| UnicalError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }

    pub fn data_path(&self) -> PathBuf {
        expand(&self.data_dir)
    }

    /// Directory holding this user's event and feed-key tables.
    pub fn user_path(&self) -> PathBuf {
        self.data_path().join(&self.user)
    }

    pub fn publish_path(&self) -> PathBuf {
        match &self.publish_dir {
            Some(dir) => expand(dir),
            None => self.data_path().join("public"),
        }
    }

    pub fn public_base_url(&self) -> String {
        match &self.public_base_url {
            Some(url) => url.trim_end_matches('/').to_string(),
            None => format!("file://{}", self.publish_path().display()),
        }
    }

    pub fn zone(&self) -> UnicalResult<OrgZone> {
        OrgZone::parse(&self.utc_offset, &self.tzid)
    }
}

fn expand(path: &Path) -> PathBuf {
    PathBuf::from(shellexpand::tilde(&path.to_string_lossy()).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;
    use tempfile::TempDir;

    #[test]
    fn test_default_file_loads_as_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("unical").join("config.toml");

        UnicalConfig::create_default_config(&path).unwrap();
        let config = UnicalConfig::load_from(&path).unwrap();

        assert_eq!(config.user, "default");
        assert_eq!(config.server_port, 4096);
        assert_eq!(config.zone().unwrap(), OrgZone::default());
    }

    #[test]
    fn test_values_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "data_dir = \"/srv/unical\"\n\
             user = \"alice\"\n\
             utc_offset = \"-05:00\"\n\
             tzid = \"America/New_York\"\n\
             public_base_url = \"https://cal.example.com/\"\n",
        )
        .unwrap();

        let config = UnicalConfig::load_from(&path).unwrap();
        assert_eq!(config.user_path(), PathBuf::from("/srv/unical/alice"));
        assert_eq!(config.publish_path(), PathBuf::from("/srv/unical/public"));
        assert_eq!(config.public_base_url(), "https://cal.example.com");

        let zone = config.zone().unwrap();
        assert_eq!(zone.offset, FixedOffset::west_opt(5 * 3600).unwrap());
        assert_eq!(zone.tzid, "America/New_York");
    }

    #[test]
    fn test_bad_offset_is_a_config_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "utc_offset = \"eight\"\n").unwrap();

        assert!(UnicalConfig::load_from(&path).is_err());
    }

    #[test]
    fn test_saved_config_loads_back() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        let config = UnicalConfig {
            user: "bob".into(),
            publish_dir: Some(PathBuf::from("/var/www/feeds")),
            ..Default::default()
        };

        config.save_to(&path).unwrap();
        let saved = std::fs::read_to_string(&path).unwrap();
        assert!(!saved.contains("public_base_url"));

        let loaded = UnicalConfig::load_from(&path).unwrap();
        assert_eq!(loaded.user, "bob");
        assert_eq!(loaded.publish_path(), PathBuf::from("/var/www/feeds"));
    }

    #[test]
    fn test_public_url_defaults_to_publish_dir() {
        let config = UnicalConfig {
            data_dir: PathBuf::from("/data"),
            ..Default::default()
        };
        assert_eq!(config.public_base_url(), "file:///data/public");
    }
}
