use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use serde_json::Value;

use crate::application::actions::WorkspaceActions;
use crate::application::page::LayoutWidth;
use crate::domain::{PendingAction, PolicyId, ReportId};
use crate::infrastructure::event_log::{Event, EventLogger};
use crate::infrastructure::store::Store;

/// In-process [`WorkspaceActions`] adapter. Applies the optimistic store
/// mutations the backend actions would apply and logs every dispatch; both
/// shells run on it.
pub struct LocalWorkspaceActions {
    store: Rc<RefCell<Store>>,
    event_log: Arc<dyn EventLogger>,
    layout: LayoutWidth,
}

impl LocalWorkspaceActions {
    pub fn new(
        store: Rc<RefCell<Store>>,
        event_log: Arc<dyn EventLogger>,
        layout: LayoutWidth,
    ) -> Self {
        Self {
            store,
            event_log,
            layout,
        }
    }
}

impl WorkspaceActions for LocalWorkspaceActions {
    fn navigate_to_workspace(&self, policy_id: &PolicyId) {
        self.store
            .borrow_mut()
            .set_active_workspace_id(Some(policy_id.clone()));
        let destination = match self.layout {
            LayoutWidth::Wide => "overview",
            LayoutWidth::Narrow => "initial",
        };
        self.event_log.log(
            Event::new("workspace_actions", "workspace_opened")
                .with_data("policy_id", Value::from(policy_id.as_str()))
                .with_data("destination", Value::from(destination)),
        );
    }

    fn navigate_to_report(&self, report_id: &ReportId) {
        self.event_log.log(
            Event::new("workspace_actions", "report_opened")
                .with_data("report_id", Value::from(report_id.as_str())),
        );
    }

    fn navigate_to_new_workspace(&self) {
        self.event_log
            .log(Event::new("workspace_actions", "new_workspace_opened"));
    }

    /// Optimistic delete: tag the policy pending-delete. Once online and
    /// error-free the row drops out of the projection.
    fn delete_workspace(&self, policy_id: &PolicyId, policy_name: &str) {
        self.store.borrow_mut().update_policy(policy_id, |policy| {
            policy.pending_action = Some(PendingAction::Delete);
        });
        self.event_log.log(
            Event::new("workspace_actions", "workspace_deleted")
                .with_data("policy_id", Value::from(policy_id.as_str()))
                .with_data("name", Value::from(policy_name)),
        );
    }

    fn leave_workspace(&self, policy_id: &PolicyId) {
        let email = self
            .store
            .borrow()
            .session()
            .map(|session| session.email.clone());
        self.store.borrow_mut().update_policy(policy_id, |policy| {
            policy.role = None;
            if let Some(email) = &email {
                policy.employees.remove(email);
            }
        });
        self.event_log.log(
            Event::new("workspace_actions", "workspace_left")
                .with_data("policy_id", Value::from(policy_id.as_str())),
        );
    }

    fn remove_workspace(&self, policy_id: &PolicyId) {
        self.store.borrow_mut().remove_policy(policy_id);
        self.event_log.log(
            Event::new("workspace_actions", "workspace_removed")
                .with_data("policy_id", Value::from(policy_id.as_str())),
        );
    }

    /// Clears a failed delete: the pending tag and the error bag go together,
    /// restoring the row to its normal state.
    fn clear_workspace_delete_error(&self, policy_id: &PolicyId) {
        self.store.borrow_mut().update_policy(policy_id, |policy| {
            policy.pending_action = None;
            policy.errors.clear();
        });
        self.event_log.log(
            Event::new("workspace_actions", "delete_error_cleared")
                .with_data("policy_id", Value::from(policy_id.as_str())),
        );
    }

    fn clear_workspace_errors(&self, policy_id: &PolicyId) {
        self.store.borrow_mut().update_policy(policy_id, |policy| {
            policy.errors.clear();
        });
        self.event_log.log(
            Event::new("workspace_actions", "errors_cleared")
                .with_data("policy_id", Value::from(policy_id.as_str())),
        );
    }

    fn set_default_workspace(&self, policy_id: &PolicyId, previous: Option<&PolicyId>) {
        self.store
            .borrow_mut()
            .set_default_policy_id(Some(policy_id.clone()));
        self.event_log.log(
            Event::new("workspace_actions", "default_workspace_set")
                .with_data("policy_id", Value::from(policy_id.as_str()))
                .with_data(
                    "previous",
                    previous.map_or(Value::Null, |id| Value::from(id.as_str())),
                ),
        );
    }

    fn trigger_billing_recalculation(&self) {
        self.event_log.log(Event::new(
            "workspace_actions",
            "billing_recalculation_started",
        ));
    }

    fn update_last_accessed_workspace(&self, policy_id: Option<&PolicyId>) {
        self.store
            .borrow_mut()
            .set_active_workspace_id(policy_id.cloned());
        self.event_log.log(
            Event::new("workspace_actions", "last_accessed_workspace_updated").with_data(
                "policy_id",
                policy_id.map_or(Value::Null, |id| Value::from(id.as_str())),
            ),
        );
    }

    fn reset_navigation_workspace_context(&self) {
        self.event_log
            .log(Event::new("workspace_actions", "navigation_context_reset"));
    }

    fn require_sign_in(&self) {
        self.event_log
            .log(Event::new("workspace_actions", "sign_in_required"));
    }
}

#[cfg(test)]
mod tests;
