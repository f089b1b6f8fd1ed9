//! Handler registry: which widget kinds are persisted, and how
//!
//! Eight fixed handlers in a fixed order, one per input kind. Resolution is
//! first-match-wins over that order; objects no handler accepts are invisible
//! to both save and restore. The registry carries no state and is rebuilt for
//! every evaluation tick rather than cached, since host object identities may
//! have changed between ticks.

use tracing::debug;

use crate::codec;
use crate::host::{CanvasObject, WidgetKind};

/// Persistence handler for one widget kind: the section label it serializes
/// under plus the codec glue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WidgetHandler {
    kind: WidgetKind,
    section: &'static str,
}

impl WidgetHandler {
    pub fn kind(&self) -> WidgetKind {
        self.kind
    }

    /// Section header line, brackets included.
    pub fn section(&self) -> &'static str {
        self.section
    }

    /// Whether this handler owns the given object.
    pub fn matches(&self, object: &dyn CanvasObject) -> bool {
        object.kind() == Some(self.kind)
    }

    /// Display label for an object of this kind, falling back to the kind's
    /// own name when the user never set one.
    pub fn display_label(&self, object: &dyn CanvasObject) -> String {
        let label = object.label();
        if label.is_empty() {
            self.kind.display_name().to_string()
        } else {
            label.to_string()
        }
    }

    /// Read the object into a `(display label, canonical value)` pair.
    ///
    /// `None` when the object exposes no value or its variant does not match
    /// the kind; the object is skipped either way.
    pub fn capture(&self, object: &dyn CanvasObject) -> Option<(String, String)> {
        let value = object.value()?;
        let canonical = codec::encode(self.kind, &value)?;
        Some((self.display_label(object), canonical))
    }

    /// Apply a stored canonical value to a live object.
    ///
    /// A malformed value is a silent per-entry no-op; the rest of the restore
    /// pass is unaffected. The color-picker kind additionally expires its
    /// downstream after a successful apply, since that widget does not
    /// propagate value writes on its own.
    pub fn restore(&self, object: &mut dyn CanvasObject, canonical: &str) {
        let current = match object.value() {
            Some(value) => value,
            None => return,
        };
        match codec::decode(self.kind, canonical, &current) {
            Some(value) => {
                object.set_value(value);
                if self.kind == WidgetKind::ColorPicker {
                    object.expire_downstream();
                }
            }
            None => {
                debug!(
                    kind = ?self.kind,
                    id = %object.id(),
                    raw = canonical,
                    "skipping entry with malformed value"
                );
            }
        }
    }
}

/// Handler table in registration order. The order is part of the on-disk
/// contract: sections are emitted in this order and the flat CSV name map is
/// folded in this order.
const HANDLERS: [WidgetHandler; 8] = [
    WidgetHandler {
        kind: WidgetKind::Slider,
        section: "[Sliders]",
    },
    WidgetHandler {
        kind: WidgetKind::Knob,
        section: "[Control Knobs]",
    },
    WidgetHandler {
        kind: WidgetKind::MultiSlider,
        section: "[Multidimensional Sliders]",
    },
    WidgetHandler {
        kind: WidgetKind::Toggle,
        section: "[Boolean Toggles]",
    },
    WidgetHandler {
        kind: WidgetKind::Panel,
        section: "[Panels]",
    },
    WidgetHandler {
        kind: WidgetKind::ValueList,
        section: "[Value Lists]",
    },
    WidgetHandler {
        kind: WidgetKind::ColorSwatch,
        section: "[Color Swatches]",
    },
    WidgetHandler {
        kind: WidgetKind::ColorPicker,
        section: "[Color Pickers]",
    },
];

/// Ordered, closed set of [`WidgetHandler`] entries.
#[derive(Debug)]
pub struct HandlerRegistry {
    handlers: &'static [WidgetHandler],
}

impl HandlerRegistry {
    /// Build a fresh registry. Callers construct one per save or restore
    /// pass instead of holding onto an instance.
    pub fn new() -> Self {
        Self {
            handlers: &HANDLERS,
        }
    }

    /// First handler whose predicate accepts the object, in registration
    /// order.
    pub fn resolve(&self, object: &dyn CanvasObject) -> Option<&WidgetHandler> {
        self.handlers.iter().find(|h| h.matches(object))
    }

    /// Handler whose section header equals the given line exactly.
    pub fn by_section(&self, line: &str) -> Option<&WidgetHandler> {
        self.handlers.iter().find(|h| h.section == line)
    }

    /// All handlers in registration order.
    pub fn handlers(&self) -> &[WidgetHandler] {
        self.handlers
    }

    /// All section header lines in registration order.
    pub fn section_labels(&self) -> Vec<&'static str> {
        self.handlers.iter().map(|h| h.section).collect()
    }
}

impl Default for HandlerRegistry {
    fn default() -> Self {
        Self::new()
    }
}
