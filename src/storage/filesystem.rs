// src/storage/filesystem.rs
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;

use super::StoreError;
use crate::table::Dataset;

/// The single on-disk table every query observes.
///
/// The working file is replaced wholesale on upload and re-read on every
/// query. There is no locking: a read racing an upload may observe a partially
/// written file.
#[derive(Debug, Clone)]
pub struct DatasetStore {
    working_file: PathBuf,
    default_file: PathBuf,
}

impl DatasetStore {
    pub fn new(working_file: impl Into<PathBuf>, default_file: impl Into<PathBuf>) -> Self {
        Self {
            working_file: working_file.into(),
            default_file: default_file.into(),
        }
    }

    pub fn working_file(&self) -> &Path {
        &self.working_file
    }

    /// Seed the working file from the bundled default when it is missing or empty.
    ///
    /// Returns true if the working file was (re)created.
    pub async fn initialize(&self) -> Result<bool, StoreError> {
        if let Ok(meta) = fs::metadata(&self.working_file).await {
            if meta.len() > 0 {
                return Ok(false);
            }
        }

        if !fs::try_exists(&self.default_file).await? {
            return Err(StoreError::NotFound(self.default_file.clone()));
        }

        create_parent_dirs(&self.working_file).await?;
        fs::copy(&self.default_file, &self.working_file).await?;

        tracing::info!(
            working_file = %self.working_file.display(),
            default_file = %self.default_file.display(),
            "Seeded working dataset from bundled default"
        );

        Ok(true)
    }

    /// Parse `content` as CSV and overwrite the working file with the normalized table.
    ///
    /// Decode and parse failures surface as [`StoreError::BadInput`] and leave
    /// the working file untouched.
    pub async fn replace(&self, content: &[u8]) -> Result<Dataset, StoreError> {
        let text =
            std::str::from_utf8(content).map_err(|e| StoreError::BadInput(e.to_string()))?;
        let dataset = Dataset::parse(text).map_err(|e| StoreError::BadInput(e.to_string()))?;
        let normalized = dataset
            .to_csv()
            .map_err(|e| StoreError::BadInput(e.to_string()))?;

        create_parent_dirs(&self.working_file).await?;
        fs::write(&self.working_file, normalized).await?;

        Ok(dataset)
    }

    /// Parse the whole working file into memory.
    pub async fn read_all(&self) -> Result<Dataset, StoreError> {
        let bytes = match fs::read(&self.working_file).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(StoreError::NotFound(self.working_file.clone()))
            }
            Err(e) => return Err(e.into()),
        };

        let text = std::str::from_utf8(&bytes)?;
        Ok(Dataset::parse(text)?)
    }
}

async fn create_parent_dirs(path: &Path) -> Result<(), StoreError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).await?;
        }
    }
    Ok(())
}
