use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use crate::application::actions::WorkspaceActions;
use crate::application::delete_flow::{DeleteFlow, DeleteRequest, DeleteTarget};
use crate::application::menu::{MenuAction, MenuContext, MenuEntry, build_row_menu};
use crate::application::rooms::{RoomIndex, build_room_index};
use crate::application::rows::{RowProjectionInputs, WorkspaceRow, project_workspace_rows};
use crate::domain::{CardFeeds, PendingAction, Policy, PolicyId};
use crate::infrastructure::event_log::{Event, EventLogger};
use crate::infrastructure::store::{Derivation, Slice, Store};

/// Wide layouts show the column header and open a workspace on its overview
/// screen; narrow layouts skip the header and open the workspace initial
/// screen instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutWidth {
    #[default]
    Wide,
    Narrow,
}

/// Store fields consulted while dispatching a selection. Captured before
/// dispatch so handlers never hold a store borrow while effects run.
#[derive(Debug, Clone, Default)]
pub struct DispatchContext {
    pub is_support_session: bool,
    pub is_anonymous: bool,
    pub billing_recalc_required: bool,
    pub active_workspace_id: Option<PolicyId>,
}

impl DispatchContext {
    pub fn capture(store: &Store) -> Self {
        let session = store.session();
        Self {
            is_support_session: session.is_some_and(|session| session.is_support_session),
            is_anonymous: session.is_some_and(|session| session.is_anonymous),
            billing_recalc_required: store.billing_recalc_required(),
            active_workspace_id: store.active_workspace_id().cloned(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuSelectOutcome {
    /// The effect was dispatched; nothing else to show.
    Dispatched,
    /// Delete started and the confirmation dialog is open.
    ConfirmOpen,
    /// Delete started; the billing recalculation runs first and the
    /// triggering row shows a spinner.
    BillingPending,
    /// Dropped: another delete is already in flight.
    Ignored,
    /// Support session: the restricted-action notice opened instead.
    SupportRestricted,
    /// Anonymous session routed to sign-in instead of the gated action.
    SignInRequired,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeletePrompt {
    Standard,
    WithCardFeeds,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeleteConfirmModel {
    pub workspace_name: String,
    pub prompt: DeletePrompt,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowRenderModel {
    pub row: WorkspaceRow,
    pub menu: Vec<MenuEntry>,
    pub spinner_active: bool,
}

/// Everything a shell needs to draw the hub. Pure data; the shells decide
/// widgets and styling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageRenderModel {
    pub rows: Vec<RowRenderModel>,
    pub show_column_header: bool,
    pub show_empty_state: bool,
    pub show_loading: bool,
    pub delete_confirm: Option<DeleteConfirmModel>,
    pub support_notice_open: bool,
}

/// Controller for the workspace hub screen. Owns the two memoized
/// derivations (room index, row list), the delete flow, and the
/// support-restriction notice; everything else lives in the store or behind
/// [`WorkspaceActions`].
pub struct WorkspaceHubPage {
    room_index: Derivation<RoomIndex>,
    rows: Derivation<Vec<WorkspaceRow>>,
    delete_flow: DeleteFlow,
    support_notice_open: bool,
    event_log: Arc<dyn EventLogger>,
}

impl WorkspaceHubPage {
    pub fn new(event_log: Arc<dyn EventLogger>) -> Self {
        Self {
            room_index: Derivation::new([Slice::Reports]),
            rows: Derivation::new([
                Slice::Policies,
                Slice::Reports,
                Slice::Session,
                Slice::ReimbursementAccount,
                Slice::SyncProgress,
                Slice::Offline,
            ]),
            delete_flow: DeleteFlow::default(),
            support_notice_open: false,
            event_log,
        }
    }

    /// Ordered hub rows, recomputed only when a dependency slice moved.
    pub fn rows(&mut self, store: &Store) -> &[WorkspaceRow] {
        let Self {
            room_index, rows, ..
        } = self;
        rows.get_or_recompute(store, |store| {
            let rooms = room_index
                .get_or_recompute(store, |store| build_room_index(store.reports().values()));
            project_workspace_rows(&RowProjectionInputs {
                policies: store.policies(),
                rooms,
                session: store.session(),
                reimbursement_account: store.reimbursement_account(),
                sync_progress: store.sync_progress(),
                offline: store.is_offline(),
            })
        })
    }

    /// Three-dot menu for one row, resolved at render time.
    pub fn menu_for_row(
        &self,
        store: &Store,
        row: &WorkspaceRow,
        row_index: usize,
    ) -> Vec<MenuEntry> {
        build_row_menu(row, &MenuContext {
            session: store.session(),
            default_policy_id: store.default_policy_id(),
            billing_recalc_required: store.billing_recalc_required(),
            row_spinner_active: self.delete_flow.spinner_row() == Some(row_index),
        })
    }

    /// Row primary action. Disabled rows (pending delete, join requests)
    /// never navigate.
    pub fn open_row(&self, row: &WorkspaceRow, actions: &dyn WorkspaceActions) -> bool {
        if row.disabled {
            return false;
        }
        actions.navigate_to_workspace(&row.policy_id);
        true
    }

    pub fn select(
        &mut self,
        action: &MenuAction,
        row_index: usize,
        ctx: &DispatchContext,
        actions: &dyn WorkspaceActions,
    ) -> MenuSelectOutcome {
        match action {
            MenuAction::GoToWorkspace { policy_id } => {
                actions.navigate_to_workspace(policy_id);
                MenuSelectOutcome::Dispatched
            }
            MenuAction::RequestDelete {
                policy_id,
                policy_name,
            } => self.request_delete(
                DeleteTarget::new(policy_id.clone(), policy_name.clone()),
                row_index,
                ctx,
                actions,
            ),
            MenuAction::LeaveWorkspace { policy_id } => {
                if ctx.is_anonymous {
                    actions.require_sign_in();
                    return MenuSelectOutcome::SignInRequired;
                }
                actions.leave_workspace(policy_id);
                MenuSelectOutcome::Dispatched
            }
            MenuAction::GoToAdminRoom { report_id }
            | MenuAction::GoToAnnounceRoom { report_id } => {
                actions.navigate_to_report(report_id);
                MenuSelectOutcome::Dispatched
            }
            MenuAction::SetAsDefault {
                policy_id,
                previous_default,
            } => {
                actions.set_default_workspace(policy_id, previous_default.as_ref());
                MenuSelectOutcome::Dispatched
            }
        }
    }

    /// Entry point of the delete flow. Checked in order: a delete already in
    /// flight drops the request; a support session opens the restricted
    /// notice without touching the flow; otherwise the flow starts, routed
    /// through the billing step when a recalculation is required.
    pub fn request_delete(
        &mut self,
        target: DeleteTarget,
        row_index: usize,
        ctx: &DispatchContext,
        actions: &dyn WorkspaceActions,
    ) -> MenuSelectOutcome {
        if self.delete_flow.is_busy() {
            return MenuSelectOutcome::Ignored;
        }
        if ctx.is_support_session {
            self.support_notice_open = true;
            self.event_log.log(
                Event::new("delete_flow", "support_restricted")
                    .with_data("policy_id", Value::from(target.policy_id.as_str())),
            );
            return MenuSelectOutcome::SupportRestricted;
        }
        match self
            .delete_flow
            .request(target.clone(), row_index, ctx.billing_recalc_required)
        {
            DeleteRequest::AwaitingBillingCalc => {
                actions.trigger_billing_recalculation();
                self.event_log.log(
                    Event::new("delete_flow", "billing_pending")
                        .with_data("policy_id", Value::from(target.policy_id.as_str()))
                        .with_data("row_index", Value::from(row_index as u64)),
                );
                MenuSelectOutcome::BillingPending
            }
            DeleteRequest::ConfirmReady => {
                self.event_log.log(
                    Event::new("delete_flow", "confirm_opened")
                        .with_data("policy_id", Value::from(target.policy_id.as_str())),
                );
                MenuSelectOutcome::ConfirmOpen
            }
            DeleteRequest::Busy => MenuSelectOutcome::Ignored,
        }
    }

    /// External completion of the billing recalculation. Opens the
    /// confirmation when a billing step was pending.
    pub fn billing_calc_completed(&mut self) -> bool {
        let advanced = self.delete_flow.billing_calc_completed();
        if advanced && let Some(target) = self.delete_flow.confirm_target() {
            self.event_log.log(
                Event::new("delete_flow", "confirm_opened")
                    .with_data("policy_id", Value::from(target.policy_id.as_str())),
            );
        }
        advanced
    }

    /// Confirms the pending delete. Dispatches the delete effect and, when
    /// the deleted workspace was the navigation-context one, clears that
    /// context and resets dependent navigation state.
    pub fn confirm_delete(
        &mut self,
        ctx: &DispatchContext,
        actions: &dyn WorkspaceActions,
    ) -> Option<DeleteTarget> {
        let target = self.delete_flow.confirm()?;
        actions.delete_workspace(&target.policy_id, &target.policy_name);
        let was_active = ctx.active_workspace_id.as_ref() == Some(&target.policy_id);
        if was_active {
            actions.update_last_accessed_workspace(None);
            actions.reset_navigation_workspace_context();
        }
        self.event_log.log(
            Event::new("delete_flow", "confirmed")
                .with_data("policy_id", Value::from(target.policy_id.as_str()))
                .with_data("was_active", Value::from(was_active)),
        );
        Some(target)
    }

    pub fn cancel_delete(&mut self) -> bool {
        let cancelled = self.delete_flow.cancel();
        if cancelled {
            self.event_log.log(Event::new("delete_flow", "cancelled"));
        }
        cancelled
    }

    pub fn is_delete_confirm_open(&self) -> bool {
        self.delete_flow.confirm_target().is_some()
    }

    pub fn is_support_notice_open(&self) -> bool {
        self.support_notice_open
    }

    pub fn dismiss_support_notice(&mut self) {
        self.support_notice_open = false;
    }

    /// Dismisses a row's error payload. The clear path is selected by the
    /// pending-action tag: a failed delete clears the delete error, a failed
    /// optimistic add retries the local removal, anything else clears the
    /// generic error bag.
    pub fn dismiss_row_error(&self, row: &WorkspaceRow, actions: &dyn WorkspaceActions) {
        match row.pending_action {
            Some(PendingAction::Delete) => actions.clear_workspace_delete_error(&row.policy_id),
            Some(PendingAction::Add) => actions.remove_workspace(&row.policy_id),
            _ => actions.clear_workspace_errors(&row.policy_id),
        }
    }

    /// Header button and empty-state call-to-action.
    pub fn request_new_workspace(
        &self,
        ctx: &DispatchContext,
        actions: &dyn WorkspaceActions,
    ) -> MenuSelectOutcome {
        if ctx.is_anonymous {
            actions.require_sign_in();
            return MenuSelectOutcome::SignInRequired;
        }
        actions.navigate_to_new_workspace();
        MenuSelectOutcome::Dispatched
    }

    pub fn render_model(&mut self, store: &Store, layout: LayoutWidth) -> PageRenderModel {
        let rows = self.rows(store).to_vec();
        let spinner_row = self.delete_flow.spinner_row();
        let row_models: Vec<RowRenderModel> = rows
            .iter()
            .enumerate()
            .map(|(index, row)| RowRenderModel {
                menu: self.menu_for_row(store, row, index),
                spinner_active: spinner_row == Some(index),
                row: row.clone(),
            })
            .collect();

        let delete_confirm = self
            .delete_flow
            .confirm_target()
            .map(|target| DeleteConfirmModel {
                workspace_name: target.policy_name.clone(),
                prompt: delete_prompt_for(store, &target.policy_id),
            });

        let show_loading = store.is_app_loading() && !store.is_offline();
        PageRenderModel {
            show_column_header: layout == LayoutWidth::Wide && !row_models.is_empty(),
            show_empty_state: row_models.is_empty() && !show_loading,
            show_loading,
            rows: row_models,
            delete_confirm,
            support_notice_open: self.support_notice_open,
        }
    }
}

fn delete_prompt_for(store: &Store, policy_id: &PolicyId) -> DeletePrompt {
    let Some(policy) = store.policy(policy_id) else {
        return DeletePrompt::Standard;
    };
    if has_card_feed_or_expense_card(policy, store.card_feeds_for(policy_id)) {
        DeletePrompt::WithCardFeeds
    } else {
        DeletePrompt::Standard
    }
}

/// A policy keeps card data when any feed or active card exists, or when card
/// features are enabled on a provisioned workspace account. Such workspaces
/// get the stronger deletion warning.
pub fn has_card_feed_or_expense_card(policy: &Policy, feeds: Option<&CardFeeds>) -> bool {
    if feeds.is_some_and(|feeds| !feeds.is_empty()) {
        return true;
    }
    (policy.expense_cards_enabled || policy.company_cards_enabled)
        && policy.workspace_account_id.is_some()
}
