use crate::domain::PolicyId;

/// Identity of the workspace a delete was requested for. Recorded when the
/// flow starts and released to the caller on confirmation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteTarget {
    pub policy_id: PolicyId,
    pub policy_name: String,
}

impl DeleteTarget {
    pub fn new(policy_id: impl Into<PolicyId>, policy_name: impl Into<String>) -> Self {
        Self {
            policy_id: policy_id.into(),
            policy_name: policy_name.into(),
        }
    }
}

/// Outcome of asking the flow to start a delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteRequest {
    /// Another delete is already in flight; this request was dropped.
    Busy,
    /// A billing recalculation must finish first. The triggering row shows a
    /// spinner and the confirmation stays hidden until
    /// [`DeleteFlow::billing_calc_completed`].
    AwaitingBillingCalc,
    /// The confirmation dialog can open immediately.
    ConfirmReady,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DeleteFlowState {
    #[default]
    Idle,
    PendingBillingCalc {
        target: DeleteTarget,
        row_index: usize,
    },
    ConfirmOpen {
        target: DeleteTarget,
    },
}

/// Two-step delete confirmation:
/// `Idle -> PendingBillingCalc -> ConfirmOpen -> Idle`, with the billing step
/// skipped when no recalculation is required. At most one delete is in flight
/// at a time; the flow itself enforces that.
#[derive(Debug, Default)]
pub struct DeleteFlow {
    state: DeleteFlowState,
}

impl DeleteFlow {
    pub fn state(&self) -> &DeleteFlowState {
        &self.state
    }

    pub fn is_idle(&self) -> bool {
        matches!(self.state, DeleteFlowState::Idle)
    }

    pub fn is_busy(&self) -> bool {
        !self.is_idle()
    }

    /// Row whose spinner runs while the billing recalculation is pending.
    pub fn spinner_row(&self) -> Option<usize> {
        match &self.state {
            DeleteFlowState::PendingBillingCalc { row_index, .. } => Some(*row_index),
            _ => None,
        }
    }

    /// Target of the open confirmation dialog, if one is open.
    pub fn confirm_target(&self) -> Option<&DeleteTarget> {
        match &self.state {
            DeleteFlowState::ConfirmOpen { target } => Some(target),
            _ => None,
        }
    }

    pub fn request(
        &mut self,
        target: DeleteTarget,
        row_index: usize,
        billing_recalc_required: bool,
    ) -> DeleteRequest {
        if self.is_busy() {
            return DeleteRequest::Busy;
        }
        if billing_recalc_required {
            self.state = DeleteFlowState::PendingBillingCalc { target, row_index };
            DeleteRequest::AwaitingBillingCalc
        } else {
            self.state = DeleteFlowState::ConfirmOpen { target };
            DeleteRequest::ConfirmReady
        }
    }

    /// External completion of the billing recalculation: clears the spinner
    /// and opens the confirmation. A completion arriving while no billing
    /// step is pending is dropped.
    pub fn billing_calc_completed(&mut self) -> bool {
        match std::mem::take(&mut self.state) {
            DeleteFlowState::PendingBillingCalc { target, .. } => {
                self.state = DeleteFlowState::ConfirmOpen { target };
                true
            }
            other => {
                self.state = other;
                false
            }
        }
    }

    /// Confirms the pending delete and returns its target. The caller
    /// dispatches the delete effect; the flow only releases the identity it
    /// recorded.
    pub fn confirm(&mut self) -> Option<DeleteTarget> {
        match std::mem::take(&mut self.state) {
            DeleteFlowState::ConfirmOpen { target } => Some(target),
            other => {
                self.state = other;
                None
            }
        }
    }

    /// Closes the confirmation without deleting. A pending billing step keeps
    /// running; its completion will still open the confirmation.
    pub fn cancel(&mut self) -> bool {
        match std::mem::take(&mut self.state) {
            DeleteFlowState::ConfirmOpen { .. } => true,
            other => {
                self.state = other;
                false
            }
        }
    }
}
