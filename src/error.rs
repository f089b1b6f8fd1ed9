//! Error taxonomy for save/restore operations

use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by a save or restore pass.
///
/// Every variant maps to a single user-visible status message; none of them
/// are fatal to the host. Malformed stored data is deliberately absent here:
/// bad entries are skipped one at a time and never abort a pass.
#[derive(Error, Debug)]
pub enum StateError {
    /// The host document has never been saved, so there is no folder to
    /// put state files next to.
    #[error("unable to determine the document location")]
    UnknownDocumentLocation,

    /// Restore was asked for, but the states folder does not exist yet.
    #[error("states folder not found: {}", .0.display())]
    StatesFolderMissing(PathBuf),

    /// An explicit state id was given and its file is absent.
    #[error("state file with id '{id}' not found: {}", .path.display())]
    StateIdNotFound { id: String, path: PathBuf },

    /// The states folder exists but holds no state files for this document.
    #[error("no state files found in: {}", .0.display())]
    NoSavedStates(PathBuf),

    /// A filesystem operation failed; `op` names what was being attempted.
    #[error("{op} {}: {source}", .path.display())]
    Io {
        op: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Reading or writing the CSV ledger failed.
    #[error("ledger {op} {}: {source}", .path.display())]
    Ledger {
        op: &'static str,
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

impl StateError {
    /// Shorthand for wrapping an io error with the attempted operation and path.
    pub(crate) fn io(op: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        StateError::Io {
            op,
            path: path.into(),
            source,
        }
    }

    pub(crate) fn ledger(op: &'static str, path: impl Into<PathBuf>, source: csv::Error) -> Self {
        StateError::Ledger {
            op,
            path: path.into(),
            source,
        }
    }
}
