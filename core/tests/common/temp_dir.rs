// SPDX-FileCopyrightText: 2025 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Temporary directory management for integration tests.

use std::path::PathBuf;

use tokio::fs;

/// Temporary directory holding the event store of one test.
///
/// Automatically cleans up the directory when dropped.
#[derive(Debug)]
pub struct TempDirs {
    /// Directory containing the store file.
    pub data_dir: PathBuf,
    /// Path of the JSON event store, not created up front.
    pub store_path: PathBuf,
}

impl TempDirs {
    /// Creates a new temporary directory for testing.
    pub async fn new() -> Result<Self, Box<dyn std::error::Error>> {
        let data_dir = tempfile::tempdir()?.keep();
        fs::create_dir_all(&data_dir).await?;

        let store_path = data_dir.join("events.json");
        Ok(Self {
            data_dir,
            store_path,
        })
    }

    /// Reads the raw store document.
    pub async fn read_store(&self) -> Result<serde_json::Value, Box<dyn std::error::Error>> {
        let content = fs::read_to_string(&self.store_path).await?;
        Ok(serde_json::from_str(&content)?)
    }
}

/// Sets up a temporary directory for integration tests.
///
/// This is a convenience wrapper around [`TempDirs::new`].
pub async fn setup_temp_dirs() -> Result<TempDirs, Box<dyn std::error::Error>> {
    TempDirs::new().await
}

impl Drop for TempDirs {
    fn drop(&mut self) {
        if let Err(e) = std::fs::remove_dir_all(&self.data_dir) {
            tracing::warn!(path = %self.data_dir.display(), err = %e, "failed to clean up temp directory");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn temp_dirs_creates_data_dir() {
        let dirs = TempDirs::new().await.unwrap();
        assert!(dirs.data_dir.is_dir());
        assert!(!dirs.store_path.exists());
        assert!(dirs.store_path.starts_with(&dirs.data_dir));
    }

    #[tokio::test]
    async fn temp_dirs_cleanup_on_drop() {
        let base = {
            let dirs = TempDirs::new().await.unwrap();
            dirs.data_dir.clone()
        };
        assert!(!base.exists());
    }
}
