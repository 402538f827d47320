use std::collections::BTreeMap;

use crate::domain::{
    CardFeeds, ConnectionSyncProgress, Policy, PolicyId, ReimbursementAccount, Report, ReportId,
    Session,
};

/// Named state slices derivations subscribe to. Each slice carries a
/// monotonic version; a derivation re-runs exactly when one of its declared
/// dependencies has moved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slice {
    Policies,
    Reports,
    Session,
    ReimbursementAccount,
    SyncProgress,
    CardFeeds,
    DefaultPolicy,
    ActiveWorkspace,
    Offline,
    AppLoading,
    BillingRecalc,
}

pub const SLICE_COUNT: usize = 11;

impl Slice {
    const fn index(self) -> usize {
        self as usize
    }
}

/// Shared application state the hub reads. All mutation goes through the
/// setters, which bump the owning slice's version. Collection setters always
/// bump; scalar setters bump only when the value actually changes.
#[derive(Debug, Default)]
pub struct Store {
    policies: BTreeMap<PolicyId, Policy>,
    reports: BTreeMap<ReportId, Report>,
    session: Option<Session>,
    reimbursement_account: Option<ReimbursementAccount>,
    sync_progress: BTreeMap<PolicyId, ConnectionSyncProgress>,
    card_feeds: BTreeMap<PolicyId, CardFeeds>,
    default_policy_id: Option<PolicyId>,
    active_workspace_id: Option<PolicyId>,
    offline: bool,
    app_loading: bool,
    billing_recalc_required: bool,
    versions: [u64; SLICE_COUNT],
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn policies(&self) -> &BTreeMap<PolicyId, Policy> {
        &self.policies
    }

    pub fn policy(&self, policy_id: &PolicyId) -> Option<&Policy> {
        self.policies.get(policy_id)
    }

    pub fn reports(&self) -> &BTreeMap<ReportId, Report> {
        &self.reports
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn reimbursement_account(&self) -> Option<&ReimbursementAccount> {
        self.reimbursement_account.as_ref()
    }

    pub fn sync_progress(&self) -> &BTreeMap<PolicyId, ConnectionSyncProgress> {
        &self.sync_progress
    }

    pub fn card_feeds(&self) -> &BTreeMap<PolicyId, CardFeeds> {
        &self.card_feeds
    }

    pub fn card_feeds_for(&self, policy_id: &PolicyId) -> Option<&CardFeeds> {
        self.card_feeds.get(policy_id)
    }

    pub fn default_policy_id(&self) -> Option<&PolicyId> {
        self.default_policy_id.as_ref()
    }

    pub fn active_workspace_id(&self) -> Option<&PolicyId> {
        self.active_workspace_id.as_ref()
    }

    pub fn is_offline(&self) -> bool {
        self.offline
    }

    pub fn is_app_loading(&self) -> bool {
        self.app_loading
    }

    pub fn billing_recalc_required(&self) -> bool {
        self.billing_recalc_required
    }

    pub fn set_policies(&mut self, policies: BTreeMap<PolicyId, Policy>) {
        self.policies = policies;
        self.bump(Slice::Policies);
    }

    pub fn upsert_policy(&mut self, policy: Policy) {
        self.policies.insert(policy.id.clone(), policy);
        self.bump(Slice::Policies);
    }

    pub fn remove_policy(&mut self, policy_id: &PolicyId) -> bool {
        let removed = self.policies.remove(policy_id).is_some();
        if removed {
            self.bump(Slice::Policies);
        }
        removed
    }

    /// Edits one policy in place. Returns false (and bumps nothing) when the
    /// policy is unknown.
    pub fn update_policy(
        &mut self,
        policy_id: &PolicyId,
        update: impl FnOnce(&mut Policy),
    ) -> bool {
        let Some(policy) = self.policies.get_mut(policy_id) else {
            return false;
        };
        update(policy);
        self.bump(Slice::Policies);
        true
    }

    pub fn set_reports(&mut self, reports: BTreeMap<ReportId, Report>) {
        self.reports = reports;
        self.bump(Slice::Reports);
    }

    pub fn upsert_report(&mut self, report: Report) {
        self.reports.insert(report.report_id.clone(), report);
        self.bump(Slice::Reports);
    }

    pub fn set_session(&mut self, session: Option<Session>) {
        self.session = session;
        self.bump(Slice::Session);
    }

    pub fn set_reimbursement_account(&mut self, account: Option<ReimbursementAccount>) {
        self.reimbursement_account = account;
        self.bump(Slice::ReimbursementAccount);
    }

    pub fn set_sync_progress(&mut self, progress: BTreeMap<PolicyId, ConnectionSyncProgress>) {
        self.sync_progress = progress;
        self.bump(Slice::SyncProgress);
    }

    pub fn set_card_feeds(&mut self, card_feeds: BTreeMap<PolicyId, CardFeeds>) {
        self.card_feeds = card_feeds;
        self.bump(Slice::CardFeeds);
    }

    pub fn set_default_policy_id(&mut self, policy_id: Option<PolicyId>) {
        if self.default_policy_id != policy_id {
            self.default_policy_id = policy_id;
            self.bump(Slice::DefaultPolicy);
        }
    }

    pub fn set_active_workspace_id(&mut self, policy_id: Option<PolicyId>) {
        if self.active_workspace_id != policy_id {
            self.active_workspace_id = policy_id;
            self.bump(Slice::ActiveWorkspace);
        }
    }

    pub fn set_offline(&mut self, offline: bool) {
        if self.offline != offline {
            self.offline = offline;
            self.bump(Slice::Offline);
        }
    }

    pub fn set_app_loading(&mut self, app_loading: bool) {
        if self.app_loading != app_loading {
            self.app_loading = app_loading;
            self.bump(Slice::AppLoading);
        }
    }

    pub fn set_billing_recalc_required(&mut self, required: bool) {
        if self.billing_recalc_required != required {
            self.billing_recalc_required = required;
            self.bump(Slice::BillingRecalc);
        }
    }

    pub fn version(&self, slice: Slice) -> u64 {
        self.versions[slice.index()]
    }

    pub fn versions_for(&self, deps: &[Slice]) -> Vec<u64> {
        deps.iter().map(|slice| self.version(*slice)).collect()
    }

    fn bump(&mut self, slice: Slice) {
        let version = &mut self.versions[slice.index()];
        *version = version.saturating_add(1);
    }
}

/// Memoized derivation over declared store slices. `get_or_recompute` returns
/// the cached value unless one of the dependency versions has changed since
/// the last read.
#[derive(Debug)]
pub struct Derivation<T> {
    deps: Vec<Slice>,
    seen: Option<Vec<u64>>,
    value: Option<T>,
}

impl<T> Derivation<T> {
    pub fn new(deps: impl Into<Vec<Slice>>) -> Self {
        Self {
            deps: deps.into(),
            seen: None,
            value: None,
        }
    }

    pub fn is_stale(&self, store: &Store) -> bool {
        match &self.seen {
            Some(seen) => *seen != store.versions_for(&self.deps),
            None => true,
        }
    }

    pub fn get_or_recompute(&mut self, store: &Store, compute: impl FnOnce(&Store) -> T) -> &T {
        let current = store.versions_for(&self.deps);
        if self.seen.as_ref() != Some(&current) {
            self.value = None;
            self.seen = Some(current);
        }
        self.value.get_or_insert_with(|| compute(store))
    }

    pub fn invalidate(&mut self) {
        self.seen = None;
        self.value = None;
    }

    #[cfg(test)]
    pub fn peek(&self) -> Option<&T> {
        self.value.as_ref()
    }
}
