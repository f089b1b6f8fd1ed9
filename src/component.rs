//! The state manager component.
//!
//! One instance lives on the canvas. Each evaluation tick it reads two
//! boolean triggers and an optional state id, and fires a save or restore on
//! the tick a trigger goes from released to asserted. Holding a trigger does
//! nothing further; asserting both at once is a configuration error that is
//! reported once and then ignored until both are released.

use std::collections::HashSet;
use std::fs;
use std::sync::Arc;

use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::StateError;
use crate::handlers::HandlerRegistry;
use crate::host::{CanvasDocument, InstanceToken, ResolveRequest, WidgetSummary};
use crate::ledger::{Ledger, RunValues};
use crate::paths;
use crate::state_file::{StateFile, StateSection};

/// Counter value both triggers are parked at while they conflict. Any value
/// above one works; it only has to keep the rising-edge comparison false
/// until a release resets the counter to zero.
const HELD: u32 = 10;

/// Ticks to wait before the post-restore re-solve, giving the widgets' own
/// change propagation time to settle.
const RESOLVE_DELAY_TICKS: u32 = 5;

/// Trigger inputs observed on one evaluation tick.
#[derive(Debug, Clone, Default)]
pub struct TickInputs {
    pub save: bool,
    pub restore: bool,
    /// State token to restore; empty or whitespace means "most recent".
    pub state_id: String,
}

impl TickInputs {
    pub fn idle() -> Self {
        Self::default()
    }

    pub fn save() -> Self {
        Self {
            save: true,
            ..Self::default()
        }
    }

    pub fn restore() -> Self {
        Self {
            restore: true,
            ..Self::default()
        }
    }

    pub fn restore_id(id: impl Into<String>) -> Self {
        Self {
            restore: true,
            state_id: id.into(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Error,
}

/// Human-readable outcome of one fired action, surfaced through the host's
/// status facility. Ticks that fire nothing produce no report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusReport {
    pub level: StatusLevel,
    pub message: String,
}

impl StatusReport {
    fn info(message: impl Into<String>) -> Self {
        Self {
            level: StatusLevel::Info,
            message: message.into(),
        }
    }

    fn error(message: impl Into<String>) -> Self {
        Self {
            level: StatusLevel::Error,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.level == StatusLevel::Error
    }
}

/// Persists and restores widget values for one canvas document.
///
/// The selection set is owned here for the life of the instance; the canvas
/// UI reads it through [`StateManager::is_selected`] and mutates it only
/// through [`StateManager::toggle_selected`].
#[derive(Debug)]
pub struct StateManager {
    selected: HashSet<Uuid>,
    save_ticks: u32,
    restore_ticks: u32,
    conflict_ticks: u32,
    live: Arc<InstanceToken>,
    last_status: Option<StatusReport>,
}

impl StateManager {
    pub fn new() -> Self {
        Self {
            selected: HashSet::new(),
            save_ticks: 0,
            restore_ticks: 0,
            conflict_ticks: 0,
            live: InstanceToken::new(),
            last_status: None,
        }
    }

    /// Run one evaluation tick.
    ///
    /// Each trigger has a consecutive-tick counter: it counts up while the
    /// trigger is held and resets to zero on release. An action fires only
    /// when its counter reaches exactly one, so holding a trigger for N
    /// ticks still yields a single save or restore.
    pub fn solve(
        &mut self,
        doc: &mut dyn CanvasDocument,
        inputs: &TickInputs,
    ) -> Option<StatusReport> {
        let conflict = inputs.save && inputs.restore;
        self.restore_ticks = if inputs.restore {
            self.restore_ticks + 1
        } else {
            0
        };
        self.save_ticks = if inputs.save { self.save_ticks + 1 } else { 0 };
        self.conflict_ticks = if conflict { self.conflict_ticks + 1 } else { 0 };

        let state_id = inputs.state_id.trim();
        let target = (!state_id.is_empty()).then(|| state_id.to_string());

        // Handlers are rebuilt every tick; host object identities may have
        // changed since the last one.
        let registry = HandlerRegistry::new();

        let status = if conflict {
            self.save_ticks = HELD;
            self.restore_ticks = HELD;
            if self.conflict_ticks == 1 {
                warn!("save and restore triggers asserted together");
                Some(StatusReport::error(
                    "save and restore cannot be active at the same time",
                ))
            } else {
                None
            }
        } else if self.save_ticks == 1 {
            Some(self.save(doc, &registry))
        } else if self.restore_ticks == 1 {
            Some(self.restore(doc, &registry, target.as_deref()))
        } else {
            None
        };

        if let Some(report) = &status {
            self.last_status = Some(report.clone());
        }
        status
    }

    /// Most recent report, kept so the UI can keep showing it on the many
    /// ticks that fire nothing.
    pub fn last_status(&self) -> Option<&StatusReport> {
        self.last_status.as_ref()
    }

    /// Everything on the canvas a handler can persist, in host enumeration
    /// order.
    pub fn selectable_widgets(&self, doc: &mut dyn CanvasDocument) -> Vec<WidgetSummary> {
        let registry = HandlerRegistry::new();
        let mut widgets = Vec::new();
        doc.for_each_object(&mut |obj| {
            if let Some(handler) = registry.resolve(obj) {
                widgets.push(WidgetSummary {
                    id: obj.id(),
                    label: handler.display_label(obj),
                    kind: handler.kind(),
                });
            }
        });
        widgets
    }

    pub fn is_selected(&self, id: Uuid) -> bool {
        self.selected.contains(&id)
    }

    /// Flip a widget in or out of the selection; returns the new membership.
    /// The caller is responsible for asking the host to re-evaluate.
    pub fn toggle_selected(&mut self, id: Uuid) -> bool {
        if !self.selected.insert(id) {
            self.selected.remove(&id);
        }
        self.selected.contains(&id)
    }

    fn save(&self, doc: &mut dyn CanvasDocument, registry: &HandlerRegistry) -> StatusReport {
        match self.save_inner(doc, registry) {
            Ok(message) => StatusReport::info(message),
            Err(e) => {
                warn!(error = %e, "save failed");
                StatusReport::error(e.to_string())
            }
        }
    }

    fn save_inner(
        &self,
        doc: &mut dyn CanvasDocument,
        registry: &HandlerRegistry,
    ) -> Result<String, StateError> {
        let location = doc.location().ok_or(StateError::UnknownDocumentLocation)?;
        let states = paths::states_dir(&location);
        fs::create_dir_all(&states)
            .map_err(|e| StateError::io("create states folder", &states, e))?;

        let (path, token) = paths::new_state_path(&location);
        if path.exists() {
            // A token collision with an earlier save; the new snapshot wins.
            fs::remove_file(&path)
                .map_err(|e| StateError::io("delete stale state file", &path, e))?;
        }

        let mut sections: Vec<StateSection> = registry
            .handlers()
            .iter()
            .map(|h| StateSection::new(h.section()))
            .collect();
        let selected = &self.selected;
        doc.for_each_object(&mut |obj| {
            if !selected.contains(&obj.id()) {
                return;
            }
            let Some(index) = registry.handlers().iter().position(|h| h.matches(obj)) else {
                return;
            };
            let Some((label, value)) = registry.handlers()[index].capture(obj) else {
                return;
            };
            sections[index].push(label, obj.id(), value);
        });

        // Ledger columns follow handler registration order first, host
        // enumeration order within each section.
        let mut run = RunValues::new();
        for section in &sections {
            for entry in &section.entries {
                run.insert(&entry.label, &entry.value);
            }
        }

        let file = StateFile { sections };
        fs::write(&path, file.render())
            .map_err(|e| StateError::io("write state file", &path, e))?;

        Ledger::append_run(&paths::ledger_path(&location), Some(&token), &run)?;

        info!(
            path = %path.display(),
            entries = file.entry_count(),
            "saved state"
        );
        Ok(format!("saved state to {}", path.display()))
    }

    fn restore(
        &self,
        doc: &mut dyn CanvasDocument,
        registry: &HandlerRegistry,
        target: Option<&str>,
    ) -> StatusReport {
        match self.restore_inner(doc, registry, target) {
            Ok(message) => StatusReport::info(message),
            Err(e) => {
                warn!(error = %e, "restore failed");
                StatusReport::error(e.to_string())
            }
        }
    }

    fn restore_inner(
        &self,
        doc: &mut dyn CanvasDocument,
        registry: &HandlerRegistry,
        target: Option<&str>,
    ) -> Result<String, StateError> {
        let location = doc.location().ok_or(StateError::UnknownDocumentLocation)?;
        let states = paths::states_dir(&location);
        if !states.is_dir() {
            return Err(StateError::StatesFolderMissing(states));
        }

        let path = match target {
            Some(id) => {
                let path = paths::state_path_for(&location, id);
                if !path.is_file() {
                    return Err(StateError::StateIdNotFound {
                        id: id.to_string(),
                        path,
                    });
                }
                path
            }
            None => paths::find_latest_state(&location)?,
        };

        let text = fs::read_to_string(&path)
            .map_err(|e| StateError::io("read state file", &path, e))?;
        let file = StateFile::parse(&text, &registry.section_labels());

        // Restore visits every object on the canvas, selected or not; the
        // file itself decides which ids get a value back.
        let mut applied = 0usize;
        doc.for_each_object(&mut |obj| {
            let Some(handler) = registry.resolve(obj) else {
                return;
            };
            let Some(section) = file.sections.iter().find(|s| s.label == handler.section())
            else {
                return;
            };
            // When a section repeats an id, only the last occurrence is
            // applied, even if an earlier one would have decoded.
            let id = obj.id();
            if let Some(entry) = section.entries.iter().rfind(|e| e.id == id) {
                handler.restore(obj, &entry.value);
                applied += 1;
            }
        });
        debug!(applied, total = file.entry_count(), "applied stored values");

        doc.schedule_resolve(ResolveRequest::after(
            RESOLVE_DELAY_TICKS,
            Arc::downgrade(&self.live),
        ));

        info!(path = %path.display(), "restored state");
        Ok(format!("restored state from {}", path.display()))
    }
}

impl Default for StateManager {
    fn default() -> Self {
        Self::new()
    }
}
