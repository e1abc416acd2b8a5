use std::path::PathBuf;

use async_trait::async_trait;
use tokio::fs;
use tokio::io::BufReader;

use super::error::StorageError;
use super::traits::{BoxReader, LabelStore};

/// Filesystem-backed artifact store.
///
/// Artifacts live directly under `base_path` under their own name. Writes go
/// to `{base_path}/.tmp` first and are renamed into place, so a partially
/// written file is never visible under its final name.
pub struct FilesystemLabelStore {
    base_path: PathBuf,
}

impl FilesystemLabelStore {
    /// Create a new filesystem artifact store.
    pub async fn new(base_path: PathBuf) -> Result<Self, StorageError> {
        fs::create_dir_all(&base_path).await?;
        fs::create_dir_all(base_path.join(".tmp")).await?;
        Ok(Self { base_path })
    }

    /// Compute the filesystem path for a given artifact name.
    fn artifact_path(&self, name: &str) -> Result<PathBuf, StorageError> {
        validate_name(name)?;
        Ok(self.base_path.join(name))
    }

    /// Path for a temporary file during writes.
    fn temp_path(&self) -> PathBuf {
        self.base_path
            .join(".tmp")
            .join(uuid::Uuid::new_v4().to_string())
    }
}

/// Only flat, visible file names are addressable.
fn validate_name(name: &str) -> Result<(), StorageError> {
    let invalid = name.is_empty()
        || name.starts_with('.')
        || name.contains(['/', '\\'])
        || name.chars().any(|c| c.is_control());
    if invalid {
        return Err(StorageError::InvalidName(name.to_string()));
    }
    Ok(())
}

#[async_trait]
impl LabelStore for FilesystemLabelStore {
    async fn put(&self, name: &str, data: &[u8]) -> Result<(), StorageError> {
        let artifact_path = self.artifact_path(name)?;

        let temp_path = self.temp_path();
        if let Err(e) = fs::write(&temp_path, data).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(e.into());
        }

        if let Err(e) = fs::rename(&temp_path, &artifact_path).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(e.into());
        }

        Ok(())
    }

    async fn get_stream(&self, name: &str) -> Result<BoxReader, StorageError> {
        let artifact_path = self.artifact_path(name)?;
        match fs::File::open(&artifact_path).await {
            Ok(file) => Ok(Box::new(BufReader::new(file))),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StorageError::NotFound(name.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn list(&self) -> Result<Vec<String>, StorageError> {
        let mut names = Vec::new();
        let mut entries = fs::read_dir(&self.base_path).await?;
        while let Some(entry) = entries.next_entry().await? {
            if !entry.file_type().await?.is_file() {
                continue;
            }
            // Non-UTF-8 names cannot be addressed through this API anyway.
            if let Ok(name) = entry.file_name().into_string()
                && validate_name(&name).is_ok()
            {
                names.push(name);
            }
        }
        Ok(names)
    }
}
