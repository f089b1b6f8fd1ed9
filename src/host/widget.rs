//! Widget model shared between the engine and the host document
//!
//! The host canvas owns the live objects; the engine only ever sees them
//! through [`CanvasObject`]. Non-input objects (wires, groups, notes) report
//! `kind() == None` and are ignored by every pass.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The eight interactive input kinds the engine knows how to persist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WidgetKind {
    Slider,
    Knob,
    MultiSlider,
    Toggle,
    Panel,
    ValueList,
    ColorSwatch,
    ColorPicker,
}

impl WidgetKind {
    /// Fallback display label for widgets the user never named.
    pub fn display_name(&self) -> &'static str {
        match self {
            WidgetKind::Slider => "Slider",
            WidgetKind::Knob => "Knob",
            WidgetKind::MultiSlider => "MultiSlider",
            WidgetKind::Toggle => "Toggle",
            WidgetKind::Panel => "Panel",
            WidgetKind::ValueList => "ValueList",
            WidgetKind::ColorSwatch => "ColorSwatch",
            WidgetKind::ColorPicker => "ColorPicker",
        }
    }
}

/// An RGBA color, one byte per channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Fully opaque color.
    pub fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }
}

/// Runtime value of an input widget.
///
/// Which variant a widget carries is fixed by its kind; a mismatched variant
/// handed to `set_value` is the host's problem and hosts are expected to
/// ignore it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum WidgetValue {
    /// Scalar sliders and knobs.
    Scalar(f64),
    /// 3-axis sliders.
    Vector3([f64; 3]),
    /// Boolean toggles.
    Bool(bool),
    /// Free text panels, may span multiple lines.
    Text(String),
    /// Per-item selected flag of a value list, in item order.
    Selection(Vec<bool>),
    /// Color swatches and pickers.
    Color(Rgba),
}

/// One live object on the canvas, as exposed by the host document.
pub trait CanvasObject {
    /// Host-assigned stable identifier; survives save/restore as long as the
    /// graph is not rebuilt.
    fn id(&self) -> Uuid;

    /// User-assigned label. Empty when the user never named the object.
    fn label(&self) -> &str;

    /// Concrete input kind, or `None` for objects the engine cannot persist.
    fn kind(&self) -> Option<WidgetKind>;

    /// Current value. `None` exactly when `kind()` is `None`.
    fn value(&self) -> Option<WidgetValue>;

    /// Overwrite the current value.
    fn set_value(&mut self, value: WidgetValue);

    /// Ask the host to re-evaluate everything downstream of this object.
    /// Only the color-picker kind needs this after a restore; the default is
    /// a no-op.
    fn expire_downstream(&mut self) {}
}

/// Lightweight description of a selectable widget, handed to the canvas UI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WidgetSummary {
    pub id: Uuid,
    /// User label, or the kind's fallback name when the label is empty.
    pub label: String,
    pub kind: WidgetKind,
}
