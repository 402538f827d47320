use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::domain::{
    AccountId, CardFeeds, ChatKind, ConnectionSyncProgress, JoinRequest, JoinRequestDetails,
    Policy, PolicyId, PolicyRole, PolicyType, ReimbursementAccount, Report, Session,
};
use crate::infrastructure::store::Store;

/// On-disk bootstrap document for the hub store. Collections are flat lists
/// and get re-keyed by id when loaded; every field may be omitted.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StoreSnapshot {
    #[serde(default)]
    pub policies: Vec<Policy>,
    #[serde(default)]
    pub reports: Vec<Report>,
    #[serde(default)]
    pub session: Option<Session>,
    #[serde(default)]
    pub reimbursement_account: Option<ReimbursementAccount>,
    #[serde(default)]
    pub sync_progress: BTreeMap<PolicyId, ConnectionSyncProgress>,
    #[serde(default)]
    pub card_feeds: BTreeMap<PolicyId, CardFeeds>,
    #[serde(default)]
    pub default_policy_id: Option<PolicyId>,
    #[serde(default)]
    pub active_workspace_id: Option<PolicyId>,
    #[serde(default)]
    pub offline: bool,
    #[serde(default)]
    pub app_loading: bool,
    #[serde(default)]
    pub billing_recalc_required: bool,
}

pub fn load_from_path(path: &Path) -> Result<StoreSnapshot, String> {
    let raw = fs::read_to_string(path).map_err(|error| format!("snapshot read failed: {error}"))?;
    serde_json::from_str(&raw).map_err(|error| format!("snapshot parse failed: {error}"))
}

pub fn store_from_snapshot(snapshot: StoreSnapshot) -> Store {
    let mut store = Store::new();
    store.set_policies(
        snapshot
            .policies
            .into_iter()
            .map(|policy| (policy.id.clone(), policy))
            .collect(),
    );
    store.set_reports(
        snapshot
            .reports
            .into_iter()
            .map(|report| (report.report_id.clone(), report))
            .collect(),
    );
    store.set_session(snapshot.session);
    store.set_reimbursement_account(snapshot.reimbursement_account);
    store.set_sync_progress(snapshot.sync_progress);
    store.set_card_feeds(snapshot.card_feeds);
    store.set_default_policy_id(snapshot.default_policy_id);
    store.set_active_workspace_id(snapshot.active_workspace_id);
    store.set_offline(snapshot.offline);
    store.set_app_loading(snapshot.app_loading);
    store.set_billing_recalc_required(snapshot.billing_recalc_required);
    store
}

/// Built-in dataset for running the hub without a snapshot file: an owned
/// workspace with both rooms, a membership, a card-carrying workspace mid
/// accounting sync, an audited workspace, and a pending join request.
pub fn demo_snapshot() -> StoreSnapshot {
    let me = AccountId(1001);

    let mut design = Policy::new(
        "P-design",
        "Design Collective",
        me,
        Some(PolicyRole::Admin),
        PolicyType::Team,
    );
    design.avatar_url = Some("https://cdn.tally.test/avatars/design.png".to_string());

    let finance = Policy::new(
        "P-finance",
        "Finance Ops",
        AccountId(2002),
        Some(PolicyRole::User),
        PolicyType::Corporate,
    );

    let mut metro = Policy::new(
        "P-metro",
        "Metro Travel",
        me,
        Some(PolicyRole::Admin),
        PolicyType::Corporate,
    );
    metro.expense_cards_enabled = true;
    metro.workspace_account_id = Some(AccountId(77001));

    let audit = Policy::new(
        "P-audit",
        "Auditors Guild",
        AccountId(2002),
        Some(PolicyRole::Auditor),
        PolicyType::Team,
    );

    let mut orbit = Policy::new(
        "P-orbit",
        "Orbit Labs",
        AccountId(3003),
        None,
        PolicyType::Team,
    );
    orbit.join_request = Some(JoinRequest {
        details: BTreeMap::from([(PolicyId::from("P-orbit"), JoinRequestDetails {
            name: "Orbit Labs".to_string(),
            avatar_url: None,
            owner_account_id: AccountId(3003),
            policy_type: PolicyType::Team,
        })]),
    });

    let reports = vec![
        Report::new("R-100")
            .for_policy("P-design")
            .with_chat_kind(ChatKind::PolicyAdmins),
        Report::new("R-101")
            .for_policy("P-design")
            .with_chat_kind(ChatKind::PolicyAnnounce),
        Report::new("R-200")
            .for_policy("P-finance")
            .with_chat_kind(ChatKind::PolicyAnnounce),
        Report::new("R-300")
            .for_policy("P-metro")
            .with_chat_kind(ChatKind::PolicyAdmins),
    ];

    StoreSnapshot {
        policies: vec![design, finance, metro, audit, orbit],
        reports,
        session: Some(Session::new(me, "demo@tally.test")),
        sync_progress: BTreeMap::from([(PolicyId::from("P-metro"), ConnectionSyncProgress {
            stage: "quickbooks".to_string(),
        })]),
        card_feeds: BTreeMap::from([(PolicyId::from("P-metro"), CardFeeds {
            feed_names: vec!["visa".to_string()],
            active_card_ids: vec!["card-9001".to_string()],
        })]),
        default_policy_id: Some(PolicyId::from("P-design")),
        ..StoreSnapshot::default()
    }
}

#[cfg(test)]
mod tests;
