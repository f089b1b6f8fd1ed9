//! Canonical string encoding of widget values
//!
//! One stable text form per widget kind:
//!
//! - scalar sliders and knobs: decimal text (`1.5`)
//! - 3-axis sliders: comma-joined triple (`0,1.5,-2`)
//! - toggles: `True` / `False`
//! - panels: raw text with `\n` and `\r` escaped to `<lf>` / `<cr>`
//! - value lists: comma-joined selected indices (`0,2,5`), empty = none
//! - colors: comma-joined channels (`255,0,0,255`)
//!
//! Decoding is tolerant by contract: any malformed input yields `None` and
//! the caller skips that one entry. A restore pass must never fail outright
//! because one stored value went bad.
//!
//! Scalars round-trip exactly: Rust formats an `f64` as the shortest decimal
//! string that parses back to the identical bits.

use crate::host::{Rgba, WidgetKind, WidgetValue};

const LF_TOKEN: &str = "<lf>";
const CR_TOKEN: &str = "<cr>";

/// Escape line breaks in panel text so the value stays on one line.
pub fn escape_text(text: &str) -> String {
    text.replace('\r', CR_TOKEN).replace('\n', LF_TOKEN)
}

/// Inverse of [`escape_text`]. Applied on restore.
pub fn unescape_text(text: &str) -> String {
    text.replace(LF_TOKEN, "\n").replace(CR_TOKEN, "\r")
}

/// Encode a live value to its canonical string.
///
/// Returns `None` when the value variant does not belong to the kind; the
/// caller skips such objects.
pub fn encode(kind: WidgetKind, value: &WidgetValue) -> Option<String> {
    match (kind, value) {
        (WidgetKind::Slider | WidgetKind::Knob, WidgetValue::Scalar(v)) => Some(v.to_string()),
        (WidgetKind::MultiSlider, WidgetValue::Vector3([x, y, z])) => {
            Some(format!("{},{},{}", x, y, z))
        }
        (WidgetKind::Toggle, WidgetValue::Bool(v)) => {
            Some(if *v { "True" } else { "False" }.to_string())
        }
        (WidgetKind::Panel, WidgetValue::Text(text)) => Some(escape_text(text)),
        (WidgetKind::ValueList, WidgetValue::Selection(selected)) => {
            let indices: Vec<String> = selected
                .iter()
                .enumerate()
                .filter(|(_, on)| **on)
                .map(|(i, _)| i.to_string())
                .collect();
            Some(indices.join(","))
        }
        (WidgetKind::ColorSwatch | WidgetKind::ColorPicker, WidgetValue::Color(c)) => {
            Some(format!("{},{},{},{}", c.r, c.g, c.b, c.a))
        }
        _ => None,
    }
}

/// Decode a canonical string back into a value for a widget of `kind`.
///
/// `current` is the widget's live value; only the value-list kind consults it
/// (the stored form is an index list, so the item count comes from the live
/// widget). `None` means the string is malformed for this kind and the entry
/// is skipped.
pub fn decode(kind: WidgetKind, raw: &str, current: &WidgetValue) -> Option<WidgetValue> {
    match kind {
        WidgetKind::Slider | WidgetKind::Knob => parse_finite(raw).map(WidgetValue::Scalar),
        WidgetKind::MultiSlider => {
            let parts: Vec<&str> = raw.split(',').collect();
            if parts.len() != 3 {
                return None;
            }
            let x = parse_finite(parts[0])?;
            let y = parse_finite(parts[1])?;
            let z = parse_finite(parts[2])?;
            Some(WidgetValue::Vector3([x, y, z]))
        }
        WidgetKind::Toggle => {
            let raw = raw.trim();
            if raw.eq_ignore_ascii_case("true") {
                Some(WidgetValue::Bool(true))
            } else if raw.eq_ignore_ascii_case("false") {
                Some(WidgetValue::Bool(false))
            } else {
                None
            }
        }
        WidgetKind::Panel => Some(WidgetValue::Text(unescape_text(raw))),
        WidgetKind::ValueList => {
            let WidgetValue::Selection(current_selection) = current else {
                return None;
            };
            let mut selected = vec![false; current_selection.len()];
            if !raw.is_empty() {
                for part in raw.split(',') {
                    // Unparseable or out-of-range indices are dropped one by
                    // one; the rest of the list still applies.
                    if let Ok(index) = part.trim().parse::<usize>() {
                        if index < selected.len() {
                            selected[index] = true;
                        }
                    }
                }
            }
            Some(WidgetValue::Selection(selected))
        }
        WidgetKind::ColorSwatch | WidgetKind::ColorPicker => {
            let parts: Vec<&str> = raw.split(',').collect();
            if parts.len() != 4 {
                return None;
            }
            let r = parts[0].trim().parse::<u8>().ok()?;
            let g = parts[1].trim().parse::<u8>().ok()?;
            let b = parts[2].trim().parse::<u8>().ok()?;
            let a = parts[3].trim().parse::<u8>().ok()?;
            Some(WidgetValue::Color(Rgba::new(r, g, b, a)))
        }
    }
}

fn parse_finite(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}
