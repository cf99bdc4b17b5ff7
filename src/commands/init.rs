use crate::commands::Out;
use crate::error::{ErrorType, IntoResult};
use crate::{Config, Result};
use anyhow::Context;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Where `init` put things.
#[derive(Debug, Clone, Serialize)]
pub struct InitOutput {
    pub root: PathBuf,
    pub config_path: PathBuf,
    pub snapshot_path: PathBuf,
}

/// Creates the data directory and an initial `config.json` file.
///
/// # Arguments
/// - `money_home` - The directory that will be the root of data directory, e.g. `$HOME/money`
/// - `snapshot` - The exported transaction snapshot. An empty one is created when it does not
///   exist.
/// - `owner` - Only transactions of this user id are shown.
///
/// # Errors
/// - Returns an error if any file operations fail.
pub async fn init(
    money_home: &Path,
    snapshot: Option<&Path>,
    owner: Option<&str>,
) -> Result<Out<InitOutput>> {
    let config = Config::create(
        money_home,
        snapshot.map(Path::to_path_buf),
        owner.map(str::to_string),
    )
    .await
    .context("Unable to create the data directory and config")
    .pub_result(ErrorType::Config)?;

    let output = InitOutput {
        root: config.root().to_path_buf(),
        config_path: config.config_path().to_path_buf(),
        snapshot_path: config.snapshot_path(),
    };
    let message = format!(
        "Successfully created the money directory at {}\nTransactions are read from {}",
        output.root.display(),
        output.snapshot_path.display()
    );
    Ok(Out::new(message, output))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_init() {
        let dir = TempDir::new().unwrap();
        let home = dir.path().join("money");
        let out = init(&home, None, Some("u1")).await.unwrap();
        let output = out.structure().unwrap();
        assert!(output.config_path.is_file());
        assert!(output.snapshot_path.is_file());
        assert!(out.message().contains("Successfully created"));

        let config = Config::load(&home).await.unwrap();
        assert_eq!(config.owner(), Some("u1"));
    }

    #[tokio::test]
    async fn test_init_error_is_tagged() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("a-file");
        crate::utils::write(&file, "x").await.unwrap();
        // A home directory cannot be created below a regular file.
        let err = init(&file.join("money"), None, None).await.unwrap_err();
        assert!(format!("{err:#}").contains("Configuration error"));
    }
}
