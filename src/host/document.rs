//! Host document interface
//!
//! Everything the engine needs from the surrounding canvas application:
//! enumerate objects, know where the document lives on disk, and queue a
//! deferred full-graph re-solve. The host side of these calls is free to be
//! as stateful as it likes; the engine never holds onto a document between
//! evaluation ticks.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Weak};

use super::widget::CanvasObject;

/// Where the host document sits on disk. Unsaved documents have none.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentLocation {
    /// Document name without extension; used as the prefix of every state
    /// file and of the states folder itself.
    pub name: String,
    /// Directory containing the document.
    pub directory: PathBuf,
}

impl DocumentLocation {
    pub fn new(name: impl Into<String>, directory: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            directory: directory.into(),
        }
    }

    /// Derive a location from a document file path (stem + parent directory).
    /// Returns `None` when the path has no stem or no parent.
    pub fn from_document_path(path: &Path) -> Option<Self> {
        let name = path.file_stem()?.to_str()?.to_string();
        let directory = path.parent()?.to_path_buf();
        if name.is_empty() {
            return None;
        }
        Some(Self { name, directory })
    }
}

/// Token owned by a live component instance.
///
/// Deferred work holds a [`Weak`] reference to it; once the component is
/// dropped the work can tell and must do nothing.
#[derive(Debug, Default)]
pub struct InstanceToken(());

impl InstanceToken {
    pub fn new() -> Arc<Self> {
        Arc::new(Self(()))
    }
}

/// A deferred full-graph re-solve, requested after a restore.
///
/// The host executes it once `delay_ticks` evaluation ticks have elapsed,
/// but only if the requesting instance is still alive.
#[derive(Debug, Clone)]
pub struct ResolveRequest {
    delay_ticks: u32,
    guard: Weak<InstanceToken>,
}

impl ResolveRequest {
    pub fn after(delay_ticks: u32, guard: Weak<InstanceToken>) -> Self {
        Self { delay_ticks, guard }
    }

    /// Ticks the host should wait before executing.
    pub fn delay_ticks(&self) -> u32 {
        self.delay_ticks
    }

    /// Whether the requesting instance still exists. Hosts check this when
    /// the request becomes due and drop it silently when it returns false.
    pub fn is_live(&self) -> bool {
        self.guard.strong_count() > 0
    }
}

/// The host document as seen by the engine.
pub trait CanvasDocument {
    /// Location of the document on disk, if it has ever been saved.
    fn location(&self) -> Option<DocumentLocation>;

    /// Visit every object in host enumeration order. The engine mutates
    /// objects only during a restore pass.
    fn for_each_object(&mut self, visit: &mut dyn FnMut(&mut dyn CanvasObject));

    /// Queue a deferred full-graph re-solve. Fire-and-forget: there is no
    /// cancellation beyond the request's own liveness guard.
    fn schedule_resolve(&mut self, request: ResolveRequest);
}
