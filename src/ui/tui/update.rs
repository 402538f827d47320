use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::application::menu::MenuEntry;
use crate::application::page::{DispatchContext, MenuSelectOutcome};
use crate::application::rows::WorkspaceRow;

use super::model::{BILLING_CALC_TICKS, MenuOverlay, TallyApp};

/// Key routing mirrors the modal stack: the support notice sits above the
/// delete confirmation, which sits above the row menu, which sits above
/// the list itself.
pub(super) fn handle_key(app: &mut TallyApp, key: KeyEvent) {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.should_quit = true;
        return;
    }
    if app.page.is_support_notice_open() {
        handle_support_notice_key(app, key);
        return;
    }
    if app.page.is_delete_confirm_open() {
        handle_confirm_key(app, key);
        return;
    }
    if app.menu.is_some() {
        handle_menu_key(app, key);
        return;
    }
    handle_base_key(app, key);
}

pub(super) fn handle_resize(app: &mut TallyApp, width: u16) {
    app.viewport_width = width;
}

/// Poll timeout. Only the simulated billing recalculation advances on it.
pub(super) fn tick(app: &mut TallyApp) {
    let Some(ticks) = app.billing_ticks_remaining else {
        return;
    };
    if ticks > 1 {
        app.billing_ticks_remaining = Some(ticks - 1);
        return;
    }
    app.billing_ticks_remaining = None;
    app.store.borrow_mut().set_billing_recalc_required(false);
    if app.page.billing_calc_completed() {
        app.status_line = None;
    }
}

fn handle_support_notice_key(app: &mut TallyApp, key: KeyEvent) {
    if matches!(key.code, KeyCode::Esc | KeyCode::Enter | KeyCode::Char('x')) {
        app.page.dismiss_support_notice();
    }
}

fn handle_confirm_key(app: &mut TallyApp, key: KeyEvent) {
    match key.code {
        KeyCode::Enter | KeyCode::Char('y') => {
            let ctx = DispatchContext::capture(&app.store.borrow());
            let actions = app.actions();
            if let Some(target) = app.page.confirm_delete(&ctx, &actions) {
                app.menu = None;
                app.status_line = Some(format!("Deleting {}", target.policy_name));
            }
        }
        KeyCode::Esc | KeyCode::Char('n') => {
            if app.page.cancel_delete() {
                app.status_line = None;
            }
        }
        _ => {}
    }
}

fn handle_menu_key(app: &mut TallyApp, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('m') => app.menu = None,
        KeyCode::Up | KeyCode::Char('k') => move_menu_selection(app, -1),
        KeyCode::Down | KeyCode::Char('j') => move_menu_selection(app, 1),
        KeyCode::Enter => select_menu_entry(app),
        _ => {}
    }
}

fn handle_base_key(app: &mut TallyApp, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') => app.should_quit = true,
        KeyCode::Up | KeyCode::Char('k') => move_row_selection(app, -1),
        KeyCode::Down | KeyCode::Char('j') => move_row_selection(app, 1),
        KeyCode::Enter => open_selected_row(app),
        KeyCode::Char('m') | KeyCode::Char(' ') => open_menu(app),
        KeyCode::Char('n') => request_new_workspace(app),
        KeyCode::Char('x') => dismiss_selected_row_error(app),
        _ => {}
    }
}

fn row_count(app: &mut TallyApp) -> usize {
    let store = app.store.borrow();
    app.page.rows(&store).len()
}

fn selected_row(app: &mut TallyApp) -> Option<WorkspaceRow> {
    let store = app.store.borrow();
    app.page.rows(&store).get(app.selected_row).cloned()
}

fn menu_entries(app: &mut TallyApp, row_index: usize) -> Vec<MenuEntry> {
    let store = app.store.borrow();
    let Some(row) = app.page.rows(&store).get(row_index).cloned() else {
        return Vec::new();
    };
    app.page.menu_for_row(&store, &row, row_index)
}

fn move_row_selection(app: &mut TallyApp, delta: isize) {
    let len = row_count(app);
    if len == 0 {
        app.selected_row = 0;
        return;
    }
    let current = app.selected_row as isize;
    app.selected_row = (current + delta).clamp(0, len as isize - 1) as usize;
}

fn move_menu_selection(app: &mut TallyApp, delta: isize) {
    let Some(overlay) = app.menu else {
        return;
    };
    let len = menu_entries(app, overlay.row_index).len();
    if len == 0 {
        return;
    }
    let current = overlay.selected_entry as isize;
    let selected_entry = (current + delta).clamp(0, len as isize - 1) as usize;
    app.menu = Some(MenuOverlay {
        selected_entry,
        ..overlay
    });
}

fn open_selected_row(app: &mut TallyApp) {
    let Some(row) = selected_row(app) else {
        return;
    };
    let actions = app.actions();
    if app.page.open_row(&row, &actions) {
        app.status_line = Some(format!("Opened {}", row.title));
    }
}

fn open_menu(app: &mut TallyApp) {
    let row_index = app.selected_row;
    if menu_entries(app, row_index).is_empty() {
        return;
    }
    app.menu = Some(MenuOverlay {
        row_index,
        selected_entry: 0,
    });
}

fn select_menu_entry(app: &mut TallyApp) {
    let Some(overlay) = app.menu else {
        return;
    };
    let entries = menu_entries(app, overlay.row_index);
    let Some(entry) = entries.get(overlay.selected_entry).cloned() else {
        app.menu = None;
        return;
    };

    if entry.runs_after_modal_close {
        app.menu = None;
    }
    let ctx = DispatchContext::capture(&app.store.borrow());
    let actions = app.actions();
    let outcome = app
        .page
        .select(&entry.action, overlay.row_index, &ctx, &actions);
    if !entry.keeps_parent_modal_open {
        app.menu = None;
    }
    apply_outcome(app, outcome);
}

fn request_new_workspace(app: &mut TallyApp) {
    let ctx = DispatchContext::capture(&app.store.borrow());
    let actions = app.actions();
    let outcome = app.page.request_new_workspace(&ctx, &actions);
    apply_outcome(app, outcome);
}

fn dismiss_selected_row_error(app: &mut TallyApp) {
    let Some(row) = selected_row(app) else {
        return;
    };
    if row.errors.is_empty() {
        return;
    }
    let actions = app.actions();
    app.page.dismiss_row_error(&row, &actions);
    app.status_line = None;
}

fn apply_outcome(app: &mut TallyApp, outcome: MenuSelectOutcome) {
    match outcome {
        MenuSelectOutcome::Dispatched => app.status_line = None,
        MenuSelectOutcome::ConfirmOpen => {}
        MenuSelectOutcome::BillingPending => {
            app.billing_ticks_remaining = Some(BILLING_CALC_TICKS);
            app.status_line = Some("Recalculating billing before delete".to_string());
        }
        MenuSelectOutcome::Ignored => {
            app.status_line = Some("Another delete is already running".to_string());
        }
        MenuSelectOutcome::SupportRestricted => {}
        MenuSelectOutcome::SignInRequired => {
            app.status_line = Some("Sign in to use this action".to_string());
        }
    }
}
