//! Canvas fixtures with one widget of every persistable kind.

use std::path::Path;

use patchstate::{
    CanvasDocument, CanvasObject, MemoryCanvas, MemoryWidget, Rgba, StateManager, TickInputs,
    WidgetValue,
};
use uuid::Uuid;

/// Ids of the widgets created by [`full_canvas`].
pub struct CanvasIds {
    pub slider: Uuid,
    pub knob: Uuid,
    pub multi_slider: Uuid,
    pub toggle: Uuid,
    pub panel: Uuid,
    pub value_list: Uuid,
    pub color_swatch: Uuid,
    pub color_picker: Uuid,
}

impl CanvasIds {
    pub fn all(&self) -> [Uuid; 8] {
        [
            self.slider,
            self.knob,
            self.multi_slider,
            self.toggle,
            self.panel,
            self.value_list,
            self.color_swatch,
            self.color_picker,
        ]
    }
}

/// The text stored in the fixture panel: multiple lines with both kinds of
/// line break.
pub const PANEL_TEXT: &str = "first line\nsecond line\rthird";

/// One widget of every kind, plus a note no handler persists.
pub fn full_canvas(dir: &Path) -> (MemoryCanvas, CanvasIds) {
    let mut canvas = MemoryCanvas::new().with_location("model", dir);
    let ids = CanvasIds {
        slider: canvas.add(MemoryWidget::slider("Radius", 1.5)),
        knob: canvas.add(MemoryWidget::knob("Gain", -0.25)),
        multi_slider: canvas.add(MemoryWidget::multi_slider("Offset", [1.0, -2.5, 3.75])),
        toggle: canvas.add(MemoryWidget::toggle("Bake", true)),
        panel: canvas.add(MemoryWidget::panel("Notes", PANEL_TEXT)),
        value_list: canvas.add(MemoryWidget::value_list(
            "Mode",
            vec![false, true, true, false],
        )),
        color_swatch: canvas.add(MemoryWidget::color_swatch("Fill", Rgba::new(0, 128, 255, 7))),
        color_picker: canvas.add(MemoryWidget::color_picker(
            "Accent",
            Rgba::new(255, 0, 255, 0),
        )),
    };
    canvas.add(MemoryWidget::note("not persisted"));
    (canvas, ids)
}

/// A manager with every fixture widget selected.
pub fn manager_for(ids: &CanvasIds) -> StateManager {
    let mut manager = StateManager::new();
    for id in ids.all() {
        manager.toggle_selected(id);
    }
    manager
}

/// Overwrite one widget's value in place.
pub fn set_value(canvas: &mut MemoryCanvas, id: Uuid, value: WidgetValue) {
    canvas.for_each_object(&mut |obj| {
        if obj.id() == id {
            obj.set_value(value.clone());
        }
    });
}

/// Current value of one widget.
pub fn value_of(canvas: &MemoryCanvas, id: Uuid) -> Option<WidgetValue> {
    canvas.widget(id).and_then(|w| w.value())
}

/// Run one save tick followed by a release tick, so the next assertion
/// starts from a clean edge.
pub fn save_once(manager: &mut StateManager, canvas: &mut MemoryCanvas) -> String {
    let report = manager
        .solve(canvas, &TickInputs::save())
        .expect("save tick should produce a report");
    assert!(!report.is_error(), "save failed: {}", report.message);
    manager.solve(canvas, &TickInputs::idle());
    report.message
}

/// Run one restore tick followed by a release tick.
pub fn restore_once(manager: &mut StateManager, canvas: &mut MemoryCanvas) -> String {
    let report = manager
        .solve(canvas, &TickInputs::restore())
        .expect("restore tick should produce a report");
    assert!(!report.is_error(), "restore failed: {}", report.message);
    manager.solve(canvas, &TickInputs::idle());
    report.message
}
