// SPDX-FileCopyrightText: 2025 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::error::Error;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tokio::fs;

use crate::Event;

/// Version of the on-disk document layout.
const STORE_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct Document {
    version: u32,
    #[serde(default)]
    events: Vec<Event>,
}

/// Flat JSON file holding every stored event.
#[derive(Debug, Clone)]
pub struct EventStore {
    path: PathBuf,
}

impl EventStore {
    /// Creates a store backed by the file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads every event. A missing file is an empty calendar.
    #[tracing::instrument(skip(self), fields(path = %self.path.display()))]
    pub async fn load(&self) -> Result<Vec<Event>, Box<dyn Error>> {
        let content = match fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("store file not found, starting empty");
                return Ok(Vec::new());
            }
            Err(e) => {
                return Err(format!("Failed to read store {}: {e}", self.path.display()).into());
            }
        };

        let doc: Document = serde_json::from_str(&content)
            .map_err(|e| format!("Failed to parse store {}: {e}", self.path.display()))?;
        if doc.version != STORE_VERSION {
            return Err(format!("Unsupported store version: {}", doc.version).into());
        }

        tracing::debug!(count = doc.events.len(), "loaded events");
        Ok(doc.events)
    }

    /// Replaces the stored events.
    ///
    /// The document is written to a sibling temp file first and then renamed over
    /// the store, so readers never observe a partial write.
    pub async fn save(&self, events: &[Event]) -> Result<(), Box<dyn Error>> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| format!("Failed to create directory {}: {e}", parent.display()))?;
        }

        let doc = Document {
            version: STORE_VERSION,
            events: events.to_vec(),
        };
        let content = serde_json::to_string_pretty(&doc)?;

        let tmp = self.tmp_path();
        fs::write(&tmp, content)
            .await
            .map_err(|e| format!("Failed to write {}: {e}", tmp.display()))?;
        fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| format!("Failed to replace store {}: {e}", self.path.display()))?;

        tracing::debug!(path = %self.path.display(), count = events.len(), "saved events");
        Ok(())
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|a| a.to_owned())
            .unwrap_or_else(|| OsString::from("events.json"));
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}
