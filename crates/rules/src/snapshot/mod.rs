//! Snapshot persistence for rule records and reading streams.
//!
//! Files are JSON unless the extension is `.yml`/`.yaml`. Rule snapshots
//! are written atomically (temp file + rename) and can be hot-reloaded into
//! a [`crate::RuleStore`] with [`SnapshotWatcher`].

mod watcher;

use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use sigrule_core::Reading;
use tracing::{debug, info};

use crate::error::Result;
use crate::schema::RuleRecord;

pub use self::watcher::{reload_from, watch_file, SnapshotWatcher};

/// Encoding of a snapshot file, chosen by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotFormat {
    Json,
    Yaml,
}

impl SnapshotFormat {
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("yml") | Some("yaml") => SnapshotFormat::Yaml,
            _ => SnapshotFormat::Json,
        }
    }
}

fn read_records<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let contents = fs::read_to_string(path)?;
    let records = match SnapshotFormat::from_path(path) {
        SnapshotFormat::Json => serde_json::from_str(&contents)?,
        SnapshotFormat::Yaml => serde_yaml::from_str(&contents)?,
    };
    Ok(records)
}

/// Read a rule snapshot: an ordered list of `{signal_id, type, operator, test_data}`.
pub fn read_rules_file(path: &Path) -> Result<Vec<RuleRecord>> {
    let records: Vec<RuleRecord> = read_records(path)?;
    debug!(path = %path.display(), records = records.len(), "read rule snapshot");
    Ok(records)
}

/// Read a reading stream: an ordered list of `{signal, value_type, value}`.
pub fn read_readings_file(path: &Path) -> Result<Vec<Reading>> {
    let readings: Vec<Reading> = read_records(path)?;
    debug!(path = %path.display(), readings = readings.len(), "read reading stream");
    Ok(readings)
}

/// Atomically write a rule snapshot.
///
/// Writes to a hidden `.tmp` sibling first, then renames over the final
/// path so readers (and the watcher) never see a partial file.
pub fn write_rules_file(path: &Path, records: &[RuleRecord]) -> Result<()> {
    let contents = match SnapshotFormat::from_path(path) {
        SnapshotFormat::Json => serde_json::to_string_pretty(records)?,
        SnapshotFormat::Yaml => serde_yaml::to_string(records)?,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let tmp_path = tmp_path_for(path);
    fs::write(&tmp_path, contents)?;
    fs::rename(&tmp_path, path)?;

    info!(path = %path.display(), rules = records.len(), "wrote rule snapshot");
    Ok(())
}

fn tmp_path_for(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "rules".to_string());
    path.with_file_name(format!(".{}.tmp", name))
}
