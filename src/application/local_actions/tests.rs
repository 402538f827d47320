use std::cell::RefCell;
use std::rc::Rc;
use std::sync::{Arc, Mutex};

use super::LocalWorkspaceActions;
use crate::application::actions::WorkspaceActions;
use crate::application::page::LayoutWidth;
use crate::domain::{
    AccountId, Employee, PendingAction, Policy, PolicyId, PolicyRole, PolicyType, Session,
    should_show_policy,
};
use crate::infrastructure::event_log::{Event, EventLogger, NullEventLogger};
use crate::infrastructure::store::Store;

struct RecordingEventLogger {
    events: Arc<Mutex<Vec<Event>>>,
}

impl EventLogger for RecordingEventLogger {
    fn log(&self, event: Event) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}

fn store_with(policies: Vec<Policy>) -> Rc<RefCell<Store>> {
    let mut store = Store::new();
    store.set_session(Some(Session::new(AccountId(100), "me@acme.test")));
    store.set_policies(
        policies
            .into_iter()
            .map(|policy| (policy.id.clone(), policy))
            .collect(),
    );
    Rc::new(RefCell::new(store))
}

fn actions_for(store: &Rc<RefCell<Store>>) -> LocalWorkspaceActions {
    LocalWorkspaceActions::new(Rc::clone(store), Arc::new(NullEventLogger), LayoutWidth::Wide)
}

fn owned_policy(id: &str, name: &str) -> Policy {
    Policy::new(
        id,
        name,
        AccountId(100),
        Some(PolicyRole::Admin),
        PolicyType::Team,
    )
}

#[test]
fn delete_tags_the_policy_pending_delete() {
    let store = store_with(vec![owned_policy("P1", "Acme")]);
    let actions = actions_for(&store);

    actions.delete_workspace(&PolicyId::from("P1"), "Acme");

    let store = store.borrow();
    let policy = store
        .policy(&PolicyId::from("P1"))
        .expect("policy should remain in the store");
    assert_eq!(policy.pending_action, Some(PendingAction::Delete));
    // Online and error-free, the soft-deleted policy leaves the projection.
    assert!(!should_show_policy(policy, false, Some("me@acme.test")));
    assert!(should_show_policy(policy, true, Some("me@acme.test")));
}

#[test]
fn clear_delete_error_restores_the_policy() {
    let mut failed = owned_policy("P1", "Acme");
    failed.pending_action = Some(PendingAction::Delete);
    failed
        .errors
        .insert("deleteFailed".to_string(), "Could not delete".to_string());
    let store = store_with(vec![failed]);
    let actions = actions_for(&store);

    actions.clear_workspace_delete_error(&PolicyId::from("P1"));

    let store = store.borrow();
    let policy = store
        .policy(&PolicyId::from("P1"))
        .expect("policy should exist");
    assert_eq!(policy.pending_action, None);
    assert!(policy.errors.is_empty());
}

#[test]
fn leave_removes_the_callers_membership() {
    let mut policy = owned_policy("P1", "Acme");
    policy.employees.insert("me@acme.test".to_string(), Employee {
        role: Some(PolicyRole::User),
        ..Employee::default()
    });
    let store = store_with(vec![policy]);
    let actions = actions_for(&store);

    actions.leave_workspace(&PolicyId::from("P1"));

    let store = store.borrow();
    let policy = store
        .policy(&PolicyId::from("P1"))
        .expect("policy should exist");
    assert_eq!(policy.role_for(Some("me@acme.test")), None);
}

#[test]
fn remove_drops_the_policy_record() {
    let store = store_with(vec![owned_policy("P1", "Acme")]);
    let actions = actions_for(&store);

    actions.remove_workspace(&PolicyId::from("P1"));

    assert!(store.borrow().policy(&PolicyId::from("P1")).is_none());
}

#[test]
fn clear_errors_leaves_the_pending_tag_alone() {
    let mut policy = owned_policy("P1", "Acme");
    policy.pending_action = Some(PendingAction::Update);
    policy
        .errors
        .insert("nameTaken".to_string(), "Name already in use".to_string());
    let store = store_with(vec![policy]);
    let actions = actions_for(&store);

    actions.clear_workspace_errors(&PolicyId::from("P1"));

    let store = store.borrow();
    let policy = store
        .policy(&PolicyId::from("P1"))
        .expect("policy should exist");
    assert!(policy.errors.is_empty());
    assert_eq!(policy.pending_action, Some(PendingAction::Update));
}

#[test]
fn set_default_updates_the_store() {
    let store = store_with(vec![owned_policy("P1", "Acme")]);
    let actions = actions_for(&store);

    actions.set_default_workspace(&PolicyId::from("P1"), None);

    assert_eq!(
        store.borrow().default_policy_id(),
        Some(&PolicyId::from("P1"))
    );
}

#[test]
fn navigation_tracks_the_active_workspace() {
    let store = store_with(vec![owned_policy("P1", "Acme")]);
    let actions = actions_for(&store);

    actions.navigate_to_workspace(&PolicyId::from("P1"));
    assert_eq!(
        store.borrow().active_workspace_id(),
        Some(&PolicyId::from("P1"))
    );

    actions.update_last_accessed_workspace(None);
    assert_eq!(store.borrow().active_workspace_id(), None);
}

#[test]
fn every_dispatch_is_logged() {
    let events = Arc::new(Mutex::new(Vec::new()));
    let store = store_with(vec![owned_policy("P1", "Acme")]);
    let actions = LocalWorkspaceActions::new(
        Rc::clone(&store),
        Arc::new(RecordingEventLogger {
            events: Arc::clone(&events),
        }),
        LayoutWidth::Narrow,
    );

    actions.navigate_to_workspace(&PolicyId::from("P1"));
    actions.trigger_billing_recalculation();
    actions.require_sign_in();

    let events = events.lock().expect("event list should be readable");
    let kinds: Vec<&str> = events.iter().map(|event| event.kind.as_str()).collect();
    assert_eq!(kinds, vec![
        "workspace_opened",
        "billing_recalculation_started",
        "sign_in_required",
    ]);
    assert!(
        events
            .iter()
            .all(|event| event.event == "workspace_actions")
    );
    // Narrow layouts open the workspace initial screen.
    assert_eq!(
        events[0].data["destination"],
        serde_json::Value::from("initial")
    );
}
