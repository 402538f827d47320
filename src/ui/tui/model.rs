use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use crate::application::local_actions::LocalWorkspaceActions;
use crate::application::menu::MenuEntry;
use crate::application::page::{LayoutWidth, PageRenderModel, WorkspaceHubPage};
use crate::infrastructure::event_log::EventLogger;
use crate::infrastructure::store::Store;

/// Columns below this switch the hub to the narrow layout.
pub(super) const NARROW_WIDTH_THRESHOLD: u16 = 100;

/// Poll timeouts to burn before a pending billing recalculation completes.
/// There is no live backend; the countdown stands in for the round trip.
pub(super) const BILLING_CALC_TICKS: u8 = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct MenuOverlay {
    pub row_index: usize,
    pub selected_entry: usize,
}

/// Interactive shell state. The page controller owns the hub semantics;
/// this layer adds terminal concerns only: cursor position, the open menu
/// overlay, the simulated billing countdown, and the status line.
pub(super) struct TallyApp {
    pub store: Rc<RefCell<Store>>,
    pub page: WorkspaceHubPage,
    pub event_log: Arc<dyn EventLogger>,
    pub forced_narrow: bool,
    pub viewport_width: u16,
    pub selected_row: usize,
    pub menu: Option<MenuOverlay>,
    pub billing_ticks_remaining: Option<u8>,
    pub status_line: Option<String>,
    pub should_quit: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct MenuOverlayModel {
    pub row_title: String,
    pub entries: Vec<MenuEntry>,
    pub selected_entry: usize,
}

/// Snapshot handed to the view. Pure data so drawing never touches the
/// store or the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct FrameModel {
    pub page: PageRenderModel,
    pub selected_row: usize,
    pub menu: Option<MenuOverlayModel>,
    pub layout: LayoutWidth,
    pub status_line: Option<String>,
}

impl TallyApp {
    pub fn new(store: Store, event_log: Arc<dyn EventLogger>, forced_narrow: bool) -> Self {
        Self {
            store: Rc::new(RefCell::new(store)),
            page: WorkspaceHubPage::new(Arc::clone(&event_log)),
            event_log,
            forced_narrow,
            viewport_width: NARROW_WIDTH_THRESHOLD,
            selected_row: 0,
            menu: None,
            billing_ticks_remaining: None,
            status_line: None,
            should_quit: false,
        }
    }

    pub fn layout(&self) -> LayoutWidth {
        if self.forced_narrow || self.viewport_width < NARROW_WIDTH_THRESHOLD {
            LayoutWidth::Narrow
        } else {
            LayoutWidth::Wide
        }
    }

    /// Built per dispatch so a resize between frames changes which screen
    /// navigation lands on.
    pub fn actions(&self) -> LocalWorkspaceActions {
        LocalWorkspaceActions::new(
            Rc::clone(&self.store),
            Arc::clone(&self.event_log),
            self.layout(),
        )
    }

    pub fn frame_model(&mut self) -> FrameModel {
        let layout = self.layout();
        let store = self.store.borrow();
        let page = self.page.render_model(&store, layout);
        drop(store);

        if !page.rows.is_empty() && self.selected_row >= page.rows.len() {
            self.selected_row = page.rows.len() - 1;
        }
        if let Some(overlay) = self.menu
            && overlay.row_index >= page.rows.len()
        {
            self.menu = None;
        }
        if let Some(overlay) = self.menu.as_mut()
            && let Some(row_model) = page.rows.get(overlay.row_index)
            && overlay.selected_entry >= row_model.menu.len()
        {
            overlay.selected_entry = row_model.menu.len().saturating_sub(1);
        }

        let menu = self.menu.and_then(|overlay| {
            let row_model = page.rows.get(overlay.row_index)?;
            Some(MenuOverlayModel {
                row_title: row_model.row.title.clone(),
                entries: row_model.menu.clone(),
                selected_entry: overlay.selected_entry,
            })
        });

        FrameModel {
            selected_row: self.selected_row,
            menu,
            layout,
            status_line: self.status_line.clone(),
            page,
        }
    }
}
