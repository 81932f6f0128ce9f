//! JSON status file for health checks and dashboards.
//!
//! A running `ledgerwatch run` rewrites this file with its latest
//! connectivity snapshot, so health checks can read readiness without
//! talking to the process.

use std::fs;
use std::io::Write;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::ConnectivitySnapshot;
use crate::error::Result;

const STATUS_VERSION: &str = "1";

/// On-disk layout of the status file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusFile {
    pub version: String,
    pub started_at: DateTime<Utc>,
    pub pid: u32,
    /// Monitored JSON-RPC endpoint.
    pub endpoint: String,
    pub connectivity: ConnectivitySnapshot,
    pub updated_at: DateTime<Utc>,
}

/// Rewrites one status file path for the lifetime of the process.
pub struct StatusWriter {
    path: PathBuf,
    endpoint: String,
    started_at: DateTime<Utc>,
}

impl StatusWriter {
    #[must_use]
    pub fn new(path: PathBuf, endpoint: impl Into<String>) -> Self {
        Self {
            path,
            endpoint: endpoint.into(),
            started_at: Utc::now(),
        }
    }

    /// Replace the file's contents with `snapshot`.
    ///
    /// Readers never see a partial file: the JSON goes to a sibling `.tmp`
    /// file first and is renamed over the target. Missing parent
    /// directories are created.
    pub fn write(&self, snapshot: &ConnectivitySnapshot) -> Result<()> {
        let status = StatusFile {
            version: STATUS_VERSION.to_string(),
            started_at: self.started_at,
            pid: std::process::id(),
            endpoint: self.endpoint.clone(),
            connectivity: snapshot.clone(),
            updated_at: Utc::now(),
        };
        let json = serde_json::to_string_pretty(&status)?;

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let temp_path = self.path.with_extension("tmp");
        let mut file = fs::File::create(&temp_path)?;

        let cleanup_and_err = |e| {
            let _ = fs::remove_file(&temp_path);
            e
        };

        file.write_all(json.as_bytes()).map_err(cleanup_and_err)?;
        file.sync_all().map_err(cleanup_and_err)?;

        fs::rename(&temp_path, &self.path).map_err(cleanup_and_err)?;

        Ok(())
    }

    #[must_use]
    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}
