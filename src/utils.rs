use crate::Result;
use anyhow::Context;
use serde::de::DeserializeOwned;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// Write a file.
pub(crate) async fn write(path: impl AsRef<Path>, contents: impl AsRef<[u8]>) -> Result<()> {
    let path = path.as_ref();
    tokio::fs::write(path, contents)
        .await
        .context(format!("Unable to write to {}", path.to_string_lossy()))
}

/// Read a file to a `String`.
pub async fn read(path: &Path) -> Result<String> {
    tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read file at {}", path.display()))
}

/// Deserialize a JSON file into type `T`.
pub async fn deserialize<T>(path: &Path) -> Result<T>
where
    T: DeserializeOwned,
{
    let content = read(path).await?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse JSON file at {}", path.display()))
}

/// Create a directory and all of its parents.
pub(crate) async fn make_dir(p: &Path) -> Result<()> {
    tokio::fs::create_dir_all(p)
        .await
        .with_context(|| format!("Unable to create directory at {}", p.to_string_lossy()))
}

pub(crate) async fn canonicalize(p: &Path) -> Result<PathBuf> {
    tokio::fs::canonicalize(p)
        .await
        .with_context(|| format!("Unable to canonicalize the path {}", p.to_string_lossy()))
}

/// Returns the modification time and length of a file, which together serve as a cheap change
/// token for files that are replaced wholesale.
pub(crate) async fn stamp(p: &Path) -> Result<(SystemTime, u64)> {
    let meta = tokio::fs::metadata(p)
        .await
        .with_context(|| format!("Unable to read metadata for {}", p.display()))?;
    let modified = meta
        .modified()
        .with_context(|| format!("Modification time unavailable for {}", p.display()))?;
    Ok((modified, meta.len()))
}

/// Hashes the contents of a file.
pub(crate) async fn digest(p: &Path) -> Result<u64> {
    let bytes = tokio::fs::read(p)
        .await
        .with_context(|| format!("Unable to read {}", p.display()))?;
    let mut hasher = DefaultHasher::new();
    bytes.hash(&mut hasher);
    Ok(hasher.finish())
}
