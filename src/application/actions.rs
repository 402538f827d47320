use crate::domain::{PolicyId, ReportId};

/// Capability interface for everything the hub delegates: navigation, the
/// mutation effects, and the billing recalculation. Rows and menu entries
/// carry identifying data only; handlers resolve through this trait at call
/// time. Effects are fire-and-forget: completion shows up as new store state,
/// never as a return value.
pub trait WorkspaceActions {
    fn navigate_to_workspace(&self, policy_id: &PolicyId);
    fn navigate_to_report(&self, report_id: &ReportId);
    fn navigate_to_new_workspace(&self);
    fn delete_workspace(&self, policy_id: &PolicyId, policy_name: &str);
    fn leave_workspace(&self, policy_id: &PolicyId);
    /// Soft local removal, used to retry a failed optimistic add.
    fn remove_workspace(&self, policy_id: &PolicyId);
    fn clear_workspace_delete_error(&self, policy_id: &PolicyId);
    fn clear_workspace_errors(&self, policy_id: &PolicyId);
    fn set_default_workspace(&self, policy_id: &PolicyId, previous: Option<&PolicyId>);
    fn trigger_billing_recalculation(&self);
    /// `None` clears the navigation-context workspace.
    fn update_last_accessed_workspace(&self, policy_id: Option<&PolicyId>);
    fn reset_navigation_workspace_context(&self);
    /// Anonymous sessions are routed to sign-in before gated actions run.
    fn require_sign_in(&self);
}

#[cfg(test)]
pub use recording::{RecordedCall, RecordingActions};
