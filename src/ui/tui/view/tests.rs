use std::sync::Arc;

use ratatui::Terminal;
use ratatui::backend::TestBackend;

use super::draw;
use crate::infrastructure::event_log::NullEventLogger;
use crate::infrastructure::snapshot::{demo_snapshot, store_from_snapshot};
use crate::infrastructure::store::Store;
use crate::ui::tui::model::{MenuOverlay, TallyApp};

fn demo_app() -> TallyApp {
    TallyApp::new(
        store_from_snapshot(demo_snapshot()),
        Arc::new(NullEventLogger),
        false,
    )
}

fn rendered(app: &mut TallyApp, width: u16, height: u16) -> String {
    app.viewport_width = width;
    let model = app.frame_model();
    let backend = TestBackend::new(width, height);
    let mut terminal = Terminal::new(backend).expect("test terminal should build");
    terminal
        .draw(|frame| draw(frame, &model))
        .expect("frame should draw");

    let buffer = terminal.backend().buffer();
    let mut text = String::new();
    for y in 0..buffer.area.height {
        for x in 0..buffer.area.width {
            if let Some(cell) = buffer.cell((x, y)) {
                text.push_str(cell.symbol());
            }
        }
        text.push('\n');
    }
    text
}

#[test]
fn wide_frame_lists_rows_under_the_column_header() {
    let mut app = demo_app();

    let text = rendered(&mut app, 120, 24);

    assert!(text.contains("Workspaces (5)"));
    assert!(text.contains("NAME"));
    assert!(text.contains("Design Collective"));
    assert!(text.contains("Orbit Labs"));
    assert!(text.contains("join request"));
    assert!(text.contains("q quit"));
}

#[test]
fn narrow_frame_drops_the_column_header() {
    let mut app = demo_app();

    let text = rendered(&mut app, 60, 24);

    assert!(!text.contains("NAME"));
    assert!(text.contains("Design Collective"));
}

#[test]
fn menu_overlay_shows_entries_for_the_selected_row() {
    let mut app = demo_app();
    app.menu = Some(MenuOverlay {
        row_index: 1,
        selected_entry: 0,
    });

    let text = rendered(&mut app, 120, 24);

    assert!(text.contains("Go to workspace"));
    assert!(text.contains("Delete"));
    assert!(text.contains("#admins"));
}

#[test]
fn empty_store_renders_the_empty_state() {
    let mut app = TallyApp::new(Store::new(), Arc::new(NullEventLogger), false);

    let text = rendered(&mut app, 120, 24);

    assert!(text.contains("No workspaces yet"));
    assert!(text.contains("Track and collect expenses"));
    assert!(text.contains("Press n to create one"));
}

#[test]
fn loading_store_renders_the_loading_state() {
    let mut store = Store::new();
    store.set_app_loading(true);
    let mut app = TallyApp::new(store, Arc::new(NullEventLogger), false);

    let text = rendered(&mut app, 120, 24);

    assert!(text.contains("Loading workspaces"));
}
