//! Ledger reconciliation across saves, and restore target resolution.

use std::path::Path;
use std::thread;
use std::time::Duration;

use super::common::canvas;
use patchstate::{
    paths, DocumentLocation, Ledger, MemoryCanvas, MemoryWidget, StateManager, TickInputs,
    WidgetValue,
};

fn location(dir: &Path) -> DocumentLocation {
    DocumentLocation::new("model", dir)
}

fn load_ledger(dir: &Path) -> Ledger {
    Ledger::load(&paths::ledger_path(&location(dir))).unwrap()
}

fn latest_token(dir: &Path) -> String {
    let path = paths::find_latest_state(&location(dir)).unwrap();
    paths::state_token_from_path(&path).unwrap()
}

/// The first save creates the ledger: the token column, then one column per
/// widget.
#[test]
fn test_first_save_builds_header_and_row() {
    let dir = tempfile::tempdir().unwrap();
    let (mut canvas, ids) = canvas::full_canvas(dir.path());
    let mut manager = canvas::manager_for(&ids);
    canvas::save_once(&mut manager, &mut canvas);

    let ledger = load_ledger(dir.path());
    assert_eq!(
        ledger.header,
        [
            "ModelState",
            "Radius",
            "Gain",
            "Offset",
            "Bake",
            "Notes",
            "Mode",
            "Fill",
            "Accent"
        ]
    );
    assert_eq!(ledger.rows.len(), 1);
    assert_eq!(ledger.rows[0][0], latest_token(dir.path()));

    let radius = ledger.header.iter().position(|h| h == "Radius").unwrap();
    assert_eq!(ledger.rows[0][radius], "1.5");
    let bake = ledger.header.iter().position(|h| h == "Bake").unwrap();
    assert_eq!(ledger.rows[0][bake], "True");
}

/// Columns are ordered by handler registration first, not by where the
/// widgets sit on the canvas.
#[test]
fn test_columns_follow_registration_order() {
    let dir = tempfile::tempdir().unwrap();
    let mut canvas = MemoryCanvas::new().with_location("model", dir.path());
    // The knob comes first on the canvas, but sliders register first.
    let knob = canvas.add(MemoryWidget::knob("Gain", 0.5));
    let slider = canvas.add(MemoryWidget::slider("Radius", 1.5));

    let mut manager = StateManager::new();
    manager.toggle_selected(knob);
    manager.toggle_selected(slider);
    canvas::save_once(&mut manager, &mut canvas);

    let ledger = load_ledger(dir.path());
    assert_eq!(ledger.header, ["ModelState", "Radius", "Gain"]);
}

/// A second save with the same widgets adds a row and leaves the header
/// alone.
#[test]
fn test_repeat_save_reuses_columns() {
    let dir = tempfile::tempdir().unwrap();
    let (mut canvas, ids) = canvas::full_canvas(dir.path());
    let mut manager = canvas::manager_for(&ids);
    canvas::save_once(&mut manager, &mut canvas);

    canvas::set_value(&mut canvas, ids.slider, WidgetValue::Scalar(8.25));
    canvas::save_once(&mut manager, &mut canvas);

    let ledger = load_ledger(dir.path());
    assert_eq!(ledger.header.len(), 9);
    assert_eq!(ledger.rows.len(), 2);
    let radius = ledger.header.iter().position(|h| h == "Radius").unwrap();
    assert_eq!(ledger.rows[0][radius], "1.5");
    assert_eq!(ledger.rows[1][radius], "8.25");
}

/// A widget first seen on a later save appends exactly one column; earlier
/// rows stay short and read as empty for it.
#[test]
fn test_new_widget_appends_single_column() {
    let dir = tempfile::tempdir().unwrap();
    let (mut canvas, ids) = canvas::full_canvas(dir.path());
    let mut manager = canvas::manager_for(&ids);
    canvas::save_once(&mut manager, &mut canvas);

    let before = load_ledger(dir.path());
    let extra = canvas.add(MemoryWidget::slider("Extra", 7.25));
    manager.toggle_selected(extra);
    canvas::save_once(&mut manager, &mut canvas);

    let after = load_ledger(dir.path());
    assert_eq!(after.header.len(), before.header.len() + 1);
    assert_eq!(after.header.last().map(String::as_str), Some("Extra"));
    // The old row is untouched, so it is shorter than the new header.
    assert_eq!(after.rows[0], before.rows[0]);
    assert!(after.rows[0].len() < after.header.len());
    assert_eq!(after.rows[1].last().map(String::as_str), Some("7.25"));
}

/// Panel line breaks arrive in the ledger as the same escaped single line
/// that goes into the state file.
#[test]
fn test_panel_cell_is_single_line() {
    let dir = tempfile::tempdir().unwrap();
    let (mut canvas, ids) = canvas::full_canvas(dir.path());
    let mut manager = canvas::manager_for(&ids);
    canvas::save_once(&mut manager, &mut canvas);

    let ledger = load_ledger(dir.path());
    let notes = ledger.header.iter().position(|h| h == "Notes").unwrap();
    assert_eq!(ledger.rows[0][notes], "first line<lf>second line<cr>third");
}

/// With no explicit token the newest file wins; with one, that exact file
/// is used regardless of age, and an unknown token is an error.
#[test]
fn test_restore_latest_vs_by_id() {
    let dir = tempfile::tempdir().unwrap();
    let mut canvas = MemoryCanvas::new().with_location("model", dir.path());
    let slider = canvas.add(MemoryWidget::slider("Radius", 1.0));

    let mut manager = StateManager::new();
    manager.toggle_selected(slider);

    canvas::save_once(&mut manager, &mut canvas);
    let first_token = latest_token(dir.path());
    thread::sleep(Duration::from_millis(20));

    canvas::set_value(&mut canvas, slider, WidgetValue::Scalar(2.0));
    canvas::save_once(&mut manager, &mut canvas);
    thread::sleep(Duration::from_millis(20));

    canvas::set_value(&mut canvas, slider, WidgetValue::Scalar(3.0));
    canvas::save_once(&mut manager, &mut canvas);

    canvas::set_value(&mut canvas, slider, WidgetValue::Scalar(99.0));
    canvas::restore_once(&mut manager, &mut canvas);
    assert_eq!(
        canvas::value_of(&canvas, slider),
        Some(WidgetValue::Scalar(3.0))
    );

    let report = manager
        .solve(&mut canvas, &TickInputs::restore_id(first_token))
        .unwrap();
    assert!(!report.is_error());
    manager.solve(&mut canvas, &TickInputs::idle());
    assert_eq!(
        canvas::value_of(&canvas, slider),
        Some(WidgetValue::Scalar(1.0))
    );

    let report = manager
        .solve(&mut canvas, &TickInputs::restore_id("zzzzzz"))
        .unwrap();
    assert!(report.is_error());
    assert!(report.message.contains("not found"));
}

/// Every save writes a distinct file; the ledger keeps one row for each.
#[test]
fn test_three_saves_three_files_three_rows() {
    let dir = tempfile::tempdir().unwrap();
    let (mut canvas, ids) = canvas::full_canvas(dir.path());
    let mut manager = canvas::manager_for(&ids);

    for _ in 0..3 {
        canvas::save_once(&mut manager, &mut canvas);
        thread::sleep(Duration::from_millis(20));
    }

    let files = paths::list_state_files(&location(dir.path())).unwrap();
    assert_eq!(files.len(), 3);
    let ledger = load_ledger(dir.path());
    assert_eq!(ledger.rows.len(), 3);
}
