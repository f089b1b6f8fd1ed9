//! State file and ledger path layout.
//!
//! Everything lives in a folder named after the host document, next to it:
//!
//! ```text
//! model.canvas
//! model.States/
//!   model.State.3f9a1c.txt
//!   model.State.b04e77.txt
//!   model.States.csv
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use uuid::Uuid;

use crate::error::StateError;
use crate::host::DocumentLocation;

/// The states folder sitting next to the document.
pub fn states_dir(location: &DocumentLocation) -> PathBuf {
    location.directory.join(format!("{}.States", location.name))
}

/// The CSV ledger inside the states folder.
pub fn ledger_path(location: &DocumentLocation) -> PathBuf {
    states_dir(location).join(format!("{}.States.csv", location.name))
}

/// The state file for a known token.
pub fn state_path_for(location: &DocumentLocation, token: &str) -> PathBuf {
    states_dir(location).join(format!("{}.State.{}.txt", location.name, token))
}

/// Allocate a path for a fresh save: a new 6-character lowercase hex token
/// and the file it names. Tokens are random, so every save gets its own
/// file rather than overwriting a previous one.
pub fn new_state_path(location: &DocumentLocation) -> (PathBuf, String) {
    let mut token = Uuid::new_v4().simple().to_string();
    token.truncate(6);
    let path = state_path_for(location, &token);
    (path, token)
}

/// Recover the token from a state file name: the second-to-last dot-separated
/// part, accepted only when the name has at least three parts and the token
/// is exactly six characters.
pub fn state_token_from_path(path: &Path) -> Option<String> {
    let name = path.file_name()?.to_str()?;
    let parts: Vec<&str> = name.split('.').collect();
    if parts.len() < 3 {
        return None;
    }
    let token = parts[parts.len() - 2];
    (token.len() == 6).then(|| token.to_string())
}

fn creation_time(metadata: &fs::Metadata) -> SystemTime {
    // Creation time is not available on every filesystem; fall back to the
    // modification time, which state files never change after write.
    metadata
        .created()
        .or_else(|_| metadata.modified())
        .unwrap_or(UNIX_EPOCH)
}

/// All state files of this document, newest first.
///
/// Fails when the states folder itself is missing; an existing folder with
/// no matching files yields an empty list.
pub fn list_state_files(
    location: &DocumentLocation,
) -> Result<Vec<(PathBuf, SystemTime)>, StateError> {
    let dir = states_dir(location);
    if !dir.is_dir() {
        return Err(StateError::StatesFolderMissing(dir));
    }
    let prefix = format!("{}.State.", location.name);

    let mut files = Vec::new();
    let entries = fs::read_dir(&dir).map_err(|e| StateError::io("read states folder", &dir, e))?;
    for entry in entries {
        let entry = entry.map_err(|e| StateError::io("read states folder", &dir, e))?;
        let path = entry.path();
        let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if !file_name.starts_with(&prefix) || !file_name.ends_with(".txt") {
            continue;
        }
        let metadata = entry
            .metadata()
            .map_err(|e| StateError::io("stat state file", &path, e))?;
        if !metadata.is_file() {
            continue;
        }
        let created = creation_time(&metadata);
        files.push((path, created));
    }
    files.sort_by(|a, b| b.1.cmp(&a.1));
    Ok(files)
}

/// The most recently created state file of this document.
pub fn find_latest_state(location: &DocumentLocation) -> Result<PathBuf, StateError> {
    let files = list_state_files(location)?;
    match files.into_iter().next() {
        Some((path, _)) => Ok(path),
        None => Err(StateError::NoSavedStates(states_dir(location))),
    }
}
