//! Tournament file persistence.

use anyhow::{Context, Result};
use std::{fs, path::Path};
use swiss_pairing::Tournament;

/// Read a tournament JSON file
pub fn load(path: &Path) -> Result<Tournament> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read tournament file {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse tournament file {}", path.display()))
}

/// Write a tournament as pretty-printed JSON.
///
/// The file is written next to its destination first and then renamed, so a
/// failed write never leaves a truncated tournament behind.
pub fn save(path: &Path, tournament: &Tournament) -> Result<()> {
    let json = serde_json::to_string_pretty(tournament).context("Failed to encode tournament")?;

    let mut staging = path.as_os_str().to_owned();
    staging.push(".tmp");
    fs::write(&staging, json + "\n")
        .with_context(|| format!("Failed to write {}", Path::new(&staging).display()))?;
    fs::rename(&staging, path)
        .with_context(|| format!("Failed to replace tournament file {}", path.display()))
}
