// src/scout/snapshot.rs
use anyhow::{anyhow, Context, Result};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::scout::types::ResultSnapshot;

#[async_trait::async_trait]
pub trait SnapshotSink: Send + Sync {
    /// Persist the snapshot, replacing any previous one.
    async fn store(&self, snapshot: &ResultSnapshot) -> Result<()>;
    /// Human-readable destination for logs.
    fn describe(&self) -> String;
}

/// Writes pretty JSON to a file via `<path>.tmp` + rename.
#[derive(Debug, Clone)]
pub struct FileSnapshotSink {
    path: PathBuf,
}

impl FileSnapshotSink {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait::async_trait]
impl SnapshotSink for FileSnapshotSink {
    async fn store(&self, snapshot: &ResultSnapshot) -> Result<()> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(dir)
                .await
                .with_context(|| format!("creating snapshot dir {}", dir.display()))?;
        }

        let json = serde_json::to_string_pretty(snapshot).context("serializing snapshot")?;
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, json.as_bytes())
            .await
            .with_context(|| format!("writing {}", tmp.display()))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .with_context(|| format!("replacing snapshot at {}", self.path.display()))?;
        Ok(())
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Keeps every stored snapshot in memory. Handy for tests and tools.
#[derive(Debug, Default)]
pub struct MemorySink {
    stored: Mutex<Vec<ResultSnapshot>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshots(&self) -> Vec<ResultSnapshot> {
        self.stored
            .lock()
            .map(|v| v.clone())
            .unwrap_or_else(|p| p.into_inner().clone())
    }
}

#[async_trait::async_trait]
impl SnapshotSink for MemorySink {
    async fn store(&self, snapshot: &ResultSnapshot) -> Result<()> {
        self.stored
            .lock()
            .map_err(|_| anyhow!("memory sink mutex poisoned"))?
            .push(snapshot.clone());
        Ok(())
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}

/// Load a persisted snapshot.
pub fn read_snapshot<P: AsRef<Path>>(path: P) -> Result<ResultSnapshot> {
    let path = path.as_ref();
    let s = std::fs::read_to_string(path)
        .with_context(|| format!("reading snapshot from {}", path.display()))?;
    serde_json::from_str(&s).with_context(|| format!("parsing snapshot {}", path.display()))
}
