//! In-memory host implementation.
//!
//! A scriptable document that fulfills [`CanvasDocument`] without a real
//! canvas behind it. Tests drive it directly; embedders can use it for dry
//! runs against a synthetic widget set.

use std::mem;
use std::path::PathBuf;

use uuid::Uuid;

use crate::host::document::{CanvasDocument, DocumentLocation, ResolveRequest};
use crate::host::widget::{CanvasObject, Rgba, WidgetKind, WidgetValue};

/// A widget with a fixed kind and an owned value.
#[derive(Debug, Clone)]
pub struct MemoryWidget {
    id: Uuid,
    label: String,
    kind: Option<WidgetKind>,
    value: Option<WidgetValue>,
    expire_count: usize,
}

impl MemoryWidget {
    fn with_kind(label: impl Into<String>, kind: WidgetKind, value: WidgetValue) -> Self {
        Self {
            id: Uuid::new_v4(),
            label: label.into(),
            kind: Some(kind),
            value: Some(value),
            expire_count: 0,
        }
    }

    pub fn slider(label: impl Into<String>, value: f64) -> Self {
        Self::with_kind(label, WidgetKind::Slider, WidgetValue::Scalar(value))
    }

    pub fn knob(label: impl Into<String>, value: f64) -> Self {
        Self::with_kind(label, WidgetKind::Knob, WidgetValue::Scalar(value))
    }

    pub fn multi_slider(label: impl Into<String>, axes: [f64; 3]) -> Self {
        Self::with_kind(label, WidgetKind::MultiSlider, WidgetValue::Vector3(axes))
    }

    pub fn toggle(label: impl Into<String>, on: bool) -> Self {
        Self::with_kind(label, WidgetKind::Toggle, WidgetValue::Bool(on))
    }

    pub fn panel(label: impl Into<String>, text: impl Into<String>) -> Self {
        Self::with_kind(label, WidgetKind::Panel, WidgetValue::Text(text.into()))
    }

    pub fn value_list(label: impl Into<String>, selected: Vec<bool>) -> Self {
        Self::with_kind(label, WidgetKind::ValueList, WidgetValue::Selection(selected))
    }

    pub fn color_swatch(label: impl Into<String>, color: Rgba) -> Self {
        Self::with_kind(label, WidgetKind::ColorSwatch, WidgetValue::Color(color))
    }

    pub fn color_picker(label: impl Into<String>, color: Rgba) -> Self {
        Self::with_kind(label, WidgetKind::ColorPicker, WidgetValue::Color(color))
    }

    /// An object no handler claims, e.g. a text note on the canvas.
    pub fn note(label: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            label: label.into(),
            kind: None,
            value: None,
            expire_count: 0,
        }
    }

    /// Replace the random id with a fixed one.
    pub fn with_id(mut self, id: Uuid) -> Self {
        self.id = id;
        self
    }

    /// How many downstream-expiry calls this widget has observed.
    pub fn expire_count(&self) -> usize {
        self.expire_count
    }
}

impl CanvasObject for MemoryWidget {
    fn id(&self) -> Uuid {
        self.id
    }

    fn label(&self) -> &str {
        &self.label
    }

    fn kind(&self) -> Option<WidgetKind> {
        self.kind
    }

    fn value(&self) -> Option<WidgetValue> {
        self.value.clone()
    }

    fn set_value(&mut self, value: WidgetValue) {
        self.value = Some(value);
    }

    fn expire_downstream(&mut self) {
        self.expire_count += 1;
    }
}

#[derive(Debug)]
struct PendingResolve {
    remaining: u32,
    request: ResolveRequest,
}

/// A document whose widgets live in a plain `Vec`.
#[derive(Debug, Default)]
pub struct MemoryCanvas {
    widgets: Vec<MemoryWidget>,
    location: Option<DocumentLocation>,
    pending: Vec<PendingResolve>,
    resolve_count: usize,
}

impl MemoryCanvas {
    /// An unsaved document with no widgets.
    pub fn new() -> Self {
        Self::default()
    }

    /// Give the document a name and a directory, as if it had been saved.
    pub fn with_location(mut self, name: impl Into<String>, directory: impl Into<PathBuf>) -> Self {
        self.location = Some(DocumentLocation::new(name, directory));
        self
    }

    /// Add a widget and return its id for later lookups.
    pub fn add(&mut self, widget: MemoryWidget) -> Uuid {
        let id = widget.id;
        self.widgets.push(widget);
        id
    }

    pub fn widget(&self, id: Uuid) -> Option<&MemoryWidget> {
        self.widgets.iter().find(|w| w.id == id)
    }

    /// Scheduled re-solves that have not come due yet.
    pub fn pending_resolves(&self) -> usize {
        self.pending.len()
    }

    /// Re-solves actually executed so far.
    pub fn resolve_count(&self) -> usize {
        self.resolve_count
    }

    /// Run `ticks` evaluation ticks. Each tick counts every pending request
    /// down by one; requests that come due run once if their instance is
    /// still alive and are dropped silently otherwise. A request scheduled
    /// with delay zero runs on the next tick.
    pub fn advance(&mut self, ticks: u32) {
        for _ in 0..ticks {
            for mut pending in mem::take(&mut self.pending) {
                if pending.remaining > 1 {
                    pending.remaining -= 1;
                    self.pending.push(pending);
                } else if pending.request.is_live() {
                    self.resolve_count += 1;
                }
            }
        }
    }
}

impl CanvasDocument for MemoryCanvas {
    fn location(&self) -> Option<DocumentLocation> {
        self.location.clone()
    }

    fn for_each_object(&mut self, visit: &mut dyn FnMut(&mut dyn CanvasObject)) {
        for widget in &mut self.widgets {
            visit(widget);
        }
    }

    fn schedule_resolve(&mut self, request: ResolveRequest) {
        self.pending.push(PendingResolve {
            remaining: request.delay_ticks(),
            request,
        });
    }
}
