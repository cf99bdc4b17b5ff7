//! Configuration file handling for money.
//!
//! The configuration file is stored at `$MONEY_HOME/config.json` and says where the transaction
//! snapshot lives, whose transactions to show, and how often `watch` polls for changes.

use crate::period::PeriodSelector;
use crate::store::FileSource;
use crate::{utils, Result};
use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

const APP_NAME: &str = "money";
const CONFIG_VERSION: u8 = 1;
const POLL_INTERVAL_SECS: u64 = 2;
const CONFIG_JSON: &str = "config.json";
const TRANSACTIONS_JSON: &str = "transactions.json";

/// The `Config` object represents the configuration of the app. You instantiate it by providing
/// the path to `$MONEY_HOME` and from there it loads `$MONEY_HOME/config.json`.
#[derive(Debug, Clone)]
pub struct Config {
    root: PathBuf,
    config_path: PathBuf,
    config_file: ConfigFile,
}

impl Config {
    /// Creates the data directory and an initial `config.json`. When the snapshot file does not
    /// exist yet, an empty snapshot is written in its place so that every command works right
    /// away.
    ///
    /// # Arguments
    /// - `dir` - The directory that will be the root of data directory, e.g. `$HOME/money`
    /// - `snapshot` - Where the exported transaction snapshot lives. Relative paths are resolved
    ///   against `dir`. Defaults to `$MONEY_HOME/transactions.json`.
    /// - `owner` - Only transactions of this user are shown. `None` shows every transaction.
    ///
    /// # Errors
    /// - Returns an error if any file operations fail.
    pub async fn create(
        dir: impl Into<PathBuf>,
        snapshot: Option<PathBuf>,
        owner: Option<String>,
    ) -> Result<Self> {
        let maybe_relative = dir.into();
        utils::make_dir(&maybe_relative)
            .await
            .context("Unable to create the money home directory")?;
        let root = utils::canonicalize(&maybe_relative).await?;
        let config_path = root.join(CONFIG_JSON);

        let config_file = ConfigFile {
            snapshot_path: snapshot,
            owner,
            ..ConfigFile::default()
        };
        config_file.save(&config_path).await?;

        let config = Self {
            root,
            config_path,
            config_file,
        };

        let snapshot_path = config.snapshot_path();
        if !snapshot_path.exists() {
            if let Some(parent) = snapshot_path.parent() {
                utils::make_dir(parent).await?;
            }
            utils::write(&snapshot_path, "{}")
                .await
                .context("Unable to create an empty snapshot")?;
        }

        Ok(config)
    }

    /// This will
    /// - validate that `money_home` and the config file exist
    /// - load the config file
    /// - return the loaded configuration object
    ///
    /// The snapshot file is not checked here; it may legitimately appear later.
    pub async fn load(money_home: impl Into<PathBuf>) -> Result<Self> {
        let maybe_relative = money_home.into();
        let root = utils::canonicalize(&maybe_relative)
            .await
            .context("Money Home is missing, run `money init` first")?;

        let config_path = root.join(CONFIG_JSON);
        if !config_path.is_file() {
            bail!("The config file is missing '{}'", config_path.display())
        }
        let config_file = ConfigFile::load(&config_path).await?;

        Ok(Self {
            root,
            config_path,
            config_file,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Returns the stored `snapshot_path` if it is absolute, otherwise resolves it against the
    /// home directory.
    pub fn snapshot_path(&self) -> PathBuf {
        let p = self.config_file.snapshot_path();
        if p.is_absolute() {
            return p;
        }
        self.root.join(p)
    }

    pub fn owner(&self) -> Option<&str> {
        self.config_file.owner.as_deref()
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.config_file.poll_interval_secs.max(1))
    }

    /// The selector used when a command is not given `--period`.
    pub fn default_period(&self) -> PeriodSelector {
        self.config_file.default_period
    }

    /// The snapshot source described by this configuration.
    pub fn source(&self) -> FileSource {
        FileSource::new(self.snapshot_path(), self.config_file.owner.clone())
    }
}

/// Represents the serialization and deserialization format of the configuration file.
///
/// Example configuration:
/// ```json
/// {
///   "app_name": "money",
///   "config_version": 1,
///   "snapshot_path": "transactions.json",
///   "owner": "Qm4x8Zr1",
///   "poll_interval_secs": 2,
///   "default_period": "all"
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
struct ConfigFile {
    /// Application name, should always be "money"
    app_name: String,

    /// Configuration file version
    config_version: u8,

    /// Path to the exported snapshot (optional, relative to config.json or absolute)
    /// Defaults to $MONEY_HOME/transactions.json if not specified
    #[serde(default, skip_serializing_if = "Option::is_none")]
    snapshot_path: Option<PathBuf>,

    /// The user whose transactions are shown
    #[serde(default, skip_serializing_if = "Option::is_none")]
    owner: Option<String>,

    /// Seconds between checks for a new snapshot in `watch`
    #[serde(default = "default_poll_interval_secs")]
    poll_interval_secs: u64,

    /// Period used when none is given on the command line
    #[serde(default)]
    default_period: PeriodSelector,
}

fn default_poll_interval_secs() -> u64 {
    POLL_INTERVAL_SECS
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            app_name: APP_NAME.to_string(),
            config_version: CONFIG_VERSION,
            snapshot_path: None,
            owner: None,
            poll_interval_secs: POLL_INTERVAL_SECS,
            default_period: PeriodSelector::default(),
        }
    }
}

impl ConfigFile {
    /// Loads a ConfigFile asynchronously from the specified path.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let config: ConfigFile = utils::deserialize(path.as_ref()).await?;

        anyhow::ensure!(
            config.app_name == APP_NAME,
            "Invalid app_name in config file: expected '{}', got '{}'",
            APP_NAME,
            config.app_name
        );
        anyhow::ensure!(
            config.config_version <= CONFIG_VERSION,
            "Unsupported config_version {}, this build understands up to {}",
            config.config_version,
            CONFIG_VERSION
        );

        Ok(config)
    }

    /// Saves the ConfigFile to the specified path.
    pub async fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let p = path.as_ref();
        let data = serde_json::to_string_pretty(self).context("Unable to serialize config")?;
        utils::write(p, data)
            .await
            .context("Unable to write config file")
    }

    /// Gets the snapshot path.
    ///
    /// If the path is relative, it should be interpreted as relative to the config.json file.
    pub fn snapshot_path(&self) -> PathBuf {
        self.snapshot_path
            .clone()
            .unwrap_or_else(|| PathBuf::from(TRANSACTIONS_JSON))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::period::YearMonth;
    use crate::store::SnapshotSource;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_config_create() {
        let dir = TempDir::new().unwrap();
        let home_dir = dir.path().join("money_home");

        let config = Config::create(&home_dir, None, Some("u1".to_string()))
            .await
            .unwrap();

        assert!(config.config_path().is_file());
        assert_eq!(config.snapshot_path(), config.root().join("transactions.json"));
        assert_eq!(config.owner(), Some("u1"));
        assert_eq!(config.poll_interval(), Duration::from_secs(2));
        assert_eq!(config.default_period(), PeriodSelector::All);

        let snapshot = config.source().snapshot().await.unwrap();
        assert!(snapshot.is_empty());
    }

    #[tokio::test]
    async fn test_config_create_keeps_existing_snapshot() {
        let dir = TempDir::new().unwrap();
        let snapshot = dir.path().join("export.json");
        let json = r#"{"a": {"amount": -5, "date": "2024-01-01"}}"#;
        utils::write(&snapshot, json).await.unwrap();

        let config = Config::create(dir.path().join("home"), Some(snapshot.clone()), None)
            .await
            .unwrap();
        assert_eq!(config.snapshot_path(), snapshot);
        assert_eq!(utils::read(&snapshot).await.unwrap(), json);
    }

    #[tokio::test]
    async fn test_config_load() {
        let dir = TempDir::new().unwrap();
        let home = dir.path().join("home");
        let created = Config::create(&home, Some(PathBuf::from("data/tx.json")), None)
            .await
            .unwrap();
        let loaded = Config::load(&home).await.unwrap();
        assert_eq!(created.root(), loaded.root());
        assert_eq!(loaded.snapshot_path(), loaded.root().join("data/tx.json"));
        assert!(loaded.snapshot_path().is_file());
        assert_eq!(loaded.owner(), None);
    }

    #[tokio::test]
    async fn test_config_load_missing_home() {
        let dir = TempDir::new().unwrap();
        let result = Config::load(dir.path().join("nope")).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_config_load_missing_config_file() {
        let dir = TempDir::new().unwrap();
        let result = Config::load(dir.path()).await;
        assert!(result.unwrap_err().to_string().contains("config file is missing"));
    }

    #[test]
    fn test_config_file_default() {
        let config = ConfigFile::default();
        assert_eq!(config.app_name, "money");
        assert_eq!(config.snapshot_path(), PathBuf::from(TRANSACTIONS_JSON));
        assert_eq!(config.poll_interval_secs, 2);
    }

    #[tokio::test]
    async fn test_config_file_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.json");

        let original = ConfigFile {
            snapshot_path: Some(PathBuf::from("/data/export.json")),
            owner: Some("u1".to_string()),
            poll_interval_secs: 10,
            default_period: PeriodSelector::Month(Some(YearMonth::new(2024, 3).unwrap())),
            ..ConfigFile::default()
        };
        original.save(&config_path).await.unwrap();

        let loaded = ConfigFile::load(&config_path).await.unwrap();
        assert_eq!(original, loaded);
    }

    #[tokio::test]
    async fn test_config_file_load_with_minimal_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.json");
        let json = r#"{ "app_name": "money", "config_version": 1 }"#;
        utils::write(&config_path, json).await.unwrap();

        let config = ConfigFile::load(&config_path).await.unwrap();
        assert_eq!(config, ConfigFile::default());
    }

    #[tokio::test]
    async fn test_config_file_load_week_period() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.json");
        let json = r#"{ "app_name": "money", "config_version": 1, "default_period": "week" }"#;
        utils::write(&config_path, json).await.unwrap();

        let config = ConfigFile::load(&config_path).await.unwrap();
        assert_eq!(config.default_period, PeriodSelector::Week(None));
    }

    #[tokio::test]
    async fn test_config_file_load_invalid_app_name() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.json");
        let json = r#"{ "app_name": "budget", "config_version": 1 }"#;
        utils::write(&config_path, json).await.unwrap();

        let result = ConfigFile::load(&config_path).await;
        assert!(result.unwrap_err().to_string().contains("Invalid app_name"));
    }

    #[tokio::test]
    async fn test_config_file_load_future_version() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.json");
        let json = r#"{ "app_name": "money", "config_version": 9 }"#;
        utils::write(&config_path, json).await.unwrap();

        let result = ConfigFile::load(&config_path).await;
        assert!(result.unwrap_err().to_string().contains("config_version"));
    }

    #[test]
    fn test_config_file_serialization_omits_none_fields() {
        let json = serde_json::to_string(&ConfigFile::default()).unwrap();
        assert!(!json.contains("snapshot_path"));
        assert!(!json.contains("owner"));
        assert!(json.contains(r#""default_period":"all""#));
    }
}
