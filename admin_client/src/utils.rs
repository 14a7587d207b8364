use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use crate::error::{AdminError, AdminResult};

/// Reads a flat string map written by [`save_json_map`]. A missing file is an empty map.
pub fn load_json_map(path: &Path) -> AdminResult<BTreeMap<String, String>> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(BTreeMap::new()),
        Err(e) => return Err(e.into()),
    };
    if raw.trim().is_empty() {
        return Ok(BTreeMap::new());
    }
    serde_json::from_str(&raw)
        .map_err(|e| AdminError::Storage(format!("{} is not a session file: {}", path.display(), e)))
}

pub fn save_json_map(path: &Path, entries: &BTreeMap<String, String>) -> AdminResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let body = serde_json::to_string_pretty(entries)
        .map_err(|e| AdminError::Storage(e.to_string()))?;
    fs::write(path, body)?;
    tracing::debug!("wrote {} entries to {}", entries.len(), path.display());
    Ok(())
}

pub fn remove_file_if_exists(path: &Path) -> AdminResult<()> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}
