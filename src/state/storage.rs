use super::types::{Snapshot, SNAPSHOT_VERSION};
use crate::error::{CompetitionError, Result};
use anyhow::Context;
use atomic_write_file::AtomicWriteFile;
use std::fs::{self, File};
use std::path::{Path, PathBuf};

/// Get the default competition state path (~/.config/climb-score/competition.json)
pub fn get_state_path() -> PathBuf {
    crate::config::get_config_dir().join("competition.json")
}

/// Load the competition snapshot from a JSON file
///
/// If the file doesn't exist, returns a new empty state.
/// If the file is unreadable, malformed or has an unsupported version,
/// returns a persistence error.
pub fn load_snapshot(path: &Path) -> Result<Snapshot> {
    read_snapshot(path).map_err(|e| CompetitionError::persistence(format!("{:#}", e)))
}

/// Path the unreadable state file is moved to (`competition.json.bak`)
pub fn backup_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".bak");
    PathBuf::from(name)
}

/// Load the snapshot, degrading to an empty competition if it cannot be read.
///
/// The unreadable file is moved aside first so the next save cannot
/// overwrite it.
pub fn load_or_empty(path: &Path) -> Snapshot {
    match load_snapshot(path) {
        Ok(snapshot) => snapshot,
        Err(e) => {
            let backup = backup_path(path);
            match fs::rename(path, &backup) {
                Ok(()) => tracing::warn!(
                    "{}; moved it to {} and starting with an empty competition",
                    e,
                    backup.display()
                ),
                Err(rename_err) => tracing::warn!(
                    "{}; could not move it to {} ({}); starting with an empty competition",
                    e,
                    backup.display(),
                    rename_err
                ),
            }
            Snapshot::new()
        }
    }
}

fn read_snapshot(path: &Path) -> anyhow::Result<Snapshot> {
    if !path.exists() {
        return Ok(Snapshot::new());
    }

    let file = File::open(path)
        .with_context(|| format!("Failed to open competition state at {}", path.display()))?;

    let snapshot: Snapshot = serde_json::from_reader(file)
        .with_context(|| format!("Failed to parse competition state at {}", path.display()))?;

    // Version check
    if snapshot.version != SNAPSHOT_VERSION {
        anyhow::bail!("Unsupported competition state version: {}", snapshot.version);
    }

    Ok(snapshot)
}

/// Save the snapshot to a JSON file atomically
///
/// The file is never left half-written. Creates the parent directory if it
/// doesn't exist.
pub fn save_snapshot(path: &Path, snapshot: &Snapshot) -> Result<()> {
    write_snapshot(path, snapshot).map_err(|e| CompetitionError::persistence(format!("{:#}", e)))
}

fn write_snapshot(path: &Path, snapshot: &Snapshot) -> anyhow::Result<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create directory at {}", dir.display()))?;
    }

    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;

    serde_json::to_writer_pretty(&mut file, snapshot)
        .context("Failed to serialize competition state")?;

    file.commit().context("Failed to save competition state")?;

    Ok(())
}
