use std::cmp::Ordering;
use std::collections::BTreeMap;

use super::{
    RowIcon, RowProjectionInputs, RowStatus, RowVariant, default_workspace_avatar, locale_compare,
    project_workspace_rows,
};
use crate::application::rooms::{RoomIndex, build_room_index};
use crate::domain::{
    AccountId, ConnectionSyncProgress, ErrorBag, JoinRequest, JoinRequestDetails, PendingAction,
    Policy, PolicyId, PolicyRole, PolicyType, ReimbursementAccount, Report, ReportId, Session,
};
use crate::domain::ChatKind;

struct Fixture {
    policies: BTreeMap<PolicyId, Policy>,
    rooms: RoomIndex,
    session: Option<Session>,
    reimbursement_account: Option<ReimbursementAccount>,
    sync_progress: BTreeMap<PolicyId, ConnectionSyncProgress>,
    offline: bool,
}

impl Fixture {
    fn new() -> Self {
        Self {
            policies: BTreeMap::new(),
            rooms: RoomIndex::default(),
            session: Some(Session::new(AccountId(100), "me@acme.test")),
            reimbursement_account: None,
            sync_progress: BTreeMap::new(),
            offline: false,
        }
    }

    fn with_policy(mut self, policy: Policy) -> Self {
        self.policies.insert(policy.id.clone(), policy);
        self
    }

    fn rows(&self) -> Vec<super::WorkspaceRow> {
        project_workspace_rows(&RowProjectionInputs {
            policies: &self.policies,
            rooms: &self.rooms,
            session: self.session.as_ref(),
            reimbursement_account: self.reimbursement_account.as_ref(),
            sync_progress: &self.sync_progress,
            offline: self.offline,
        })
    }
}

fn admin_policy(id: &str, name: &str) -> Policy {
    Policy::new(
        id,
        name,
        AccountId(100),
        Some(PolicyRole::Admin),
        PolicyType::Team,
    )
}

fn member_policy(id: &str, name: &str) -> Policy {
    Policy::new(
        id,
        name,
        AccountId(900),
        Some(PolicyRole::User),
        PolicyType::Team,
    )
}

#[test]
fn only_visible_policies_become_rows() {
    let mut personal = member_policy("P3", "Personal");
    personal.policy_type = PolicyType::Personal;
    let mut no_role = member_policy("P4", "Ghost");
    no_role.role = None;

    let fixture = Fixture::new()
        .with_policy(admin_policy("P1", "Acme"))
        .with_policy(member_policy("P2", "Bolt"))
        .with_policy(personal)
        .with_policy(no_role);

    let rows = fixture.rows();
    let titles: Vec<&str> = rows.iter().map(|row| row.title.as_str()).collect();
    assert_eq!(titles, vec!["Acme", "Bolt"]);
}

#[test]
fn rows_sort_case_and_accent_insensitively_by_title() {
    let fixture = Fixture::new()
        .with_policy(member_policy("P1", "zeta"))
        .with_policy(member_policy("P2", "Éclair"))
        .with_policy(member_policy("P3", "apex"))
        .with_policy(member_policy("P4", "Echo"));

    let titles: Vec<String> = fixture.rows().into_iter().map(|row| row.title).collect();
    assert_eq!(titles, vec!["apex", "Echo", "Éclair", "zeta"]);
}

#[test]
fn rows_with_equal_folded_titles_keep_a_total_order() {
    let fixture = Fixture::new()
        .with_policy(member_policy("P2", "acme"))
        .with_policy(member_policy("P1", "Acme"));

    let rows = fixture.rows();
    assert_eq!(rows[0].title, "Acme");
    assert_eq!(rows[1].title, "acme");
    assert_eq!(locale_compare("Acme", "acme"), Ordering::Less);
    assert_eq!(locale_compare("acme", "acme"), Ordering::Equal);
}

#[test]
fn pending_delete_disables_the_row_while_offline() {
    let mut deleting = member_policy("P1", "Acme");
    deleting.pending_action = Some(PendingAction::Delete);
    let mut updating = member_policy("P2", "Bolt");
    updating.pending_action = Some(PendingAction::Update);

    let mut fixture = Fixture::new().with_policy(deleting).with_policy(updating);
    fixture.offline = true;

    let rows = fixture.rows();
    assert_eq!(rows.len(), 2);
    assert!(rows[0].disabled);
    assert_eq!(rows[0].pending_action, Some(PendingAction::Delete));
    assert!(!rows[1].disabled, "only a pending delete disables a row");
}

#[test]
fn avatar_url_wins_and_default_avatar_derives_from_the_name() {
    let mut with_avatar = member_policy("P1", "Acme");
    with_avatar.avatar_url = Some("https://cdn.test/acme.png".to_string());
    let without_avatar = member_policy("P2", "Bolt");
    let numeric_prefix = member_policy("P3", "42 Club");

    let fixture = Fixture::new()
        .with_policy(with_avatar)
        .with_policy(without_avatar)
        .with_policy(numeric_prefix);

    let rows = fixture.rows();
    assert_eq!(
        rows[0].icon,
        RowIcon::DefaultAvatar {
            asset: "workspace-c".to_string()
        }
    );
    assert_eq!(
        rows[1].icon,
        RowIcon::Avatar {
            url: "https://cdn.test/acme.png".to_string()
        }
    );
    assert_eq!(
        rows[2].icon,
        RowIcon::DefaultAvatar {
            asset: "workspace-b".to_string()
        }
    );
    assert_eq!(default_workspace_avatar("!!"), "workspace-default");
}

#[test]
fn status_marker_is_reserved_for_admins() {
    let mut admin = admin_policy("P1", "Acme");
    admin
        .errors
        .insert("1700000000000".to_string(), "rename failed".to_string());
    let mut member = member_policy("P2", "Bolt");
    member
        .errors
        .insert("1700000000001".to_string(), "rename failed".to_string());

    let fixture = Fixture::new().with_policy(admin).with_policy(member);
    let rows = fixture.rows();

    assert_eq!(rows[0].status, Some(RowStatus::Error));
    assert_eq!(rows[1].status, None);
}

#[test]
fn reimbursement_account_errors_outrank_sync_progress() {
    let mut fixture = Fixture::new().with_policy(admin_policy("P1", "Acme"));
    fixture
        .sync_progress
        .insert(PolicyId::from("P1"), ConnectionSyncProgress {
            stage: "importing".to_string(),
        });

    assert_eq!(fixture.rows()[0].status, Some(RowStatus::Info));

    fixture.reimbursement_account = Some(ReimbursementAccount {
        errors: ErrorBag::from([(
            "1700000000000".to_string(),
            "bank verification failed".to_string(),
        )]),
    });
    assert_eq!(fixture.rows()[0].status, Some(RowStatus::Error));
}

#[test]
fn room_index_wins_over_legacy_policy_room_fields() {
    let mut policy = admin_policy("P1", "Acme");
    policy.admin_room_id = Some(ReportId::from("LEGACY-A"));
    policy.announce_room_id = Some(ReportId::from("LEGACY-N"));

    let reports = vec![
        Report::new("R1")
            .for_policy("P1")
            .with_chat_kind(ChatKind::PolicyAdmins),
    ];
    let mut fixture = Fixture::new().with_policy(policy);
    fixture.rooms = build_room_index(reports.iter());

    let rows = fixture.rows();
    assert_eq!(rows[0].admin_room(), Some(&ReportId::from("R1")));
    // No announce room was indexed, so the legacy field still applies.
    assert_eq!(rows[0].announce_room(), Some(&ReportId::from("LEGACY-N")));
}

#[test]
fn join_request_produces_a_disabled_row_from_requester_details() {
    let mut policy = member_policy("P9", "Hidden Shell");
    policy.role = None;
    policy.join_request = Some(JoinRequest {
        details: BTreeMap::from([(
            PolicyId::from("P9"),
            JoinRequestDetails {
                name: "Orbit Labs".to_string(),
                avatar_url: None,
                owner_account_id: AccountId(500),
                policy_type: PolicyType::Corporate,
            },
        )]),
    });

    let fixture = Fixture::new().with_policy(policy);
    let rows = fixture.rows();

    assert_eq!(rows.len(), 1);
    let row = &rows[0];
    assert!(row.is_join_request());
    assert!(row.disabled);
    assert_eq!(row.title, "Orbit Labs");
    assert_eq!(row.policy_id, PolicyId::from("P9"));
    assert_eq!(row.status, None);
    // Fallback avatar still derives from the policy record's name.
    assert_eq!(
        row.icon,
        RowIcon::DefaultAvatar {
            asset: "workspace-h".to_string()
        }
    );
    assert_eq!(
        row.variant,
        RowVariant::JoinRequest {
            owner_account_id: AccountId(500),
            policy_type: PolicyType::Corporate,
        }
    );
}

#[test]
fn join_request_without_details_falls_back_to_a_member_row() {
    let mut policy = member_policy("P9", "Acme");
    policy.join_request = Some(JoinRequest {
        details: BTreeMap::new(),
    });

    let fixture = Fixture::new().with_policy(policy);
    let rows = fixture.rows();
    assert_eq!(rows.len(), 1);
    assert!(!rows[0].is_join_request());
    assert_eq!(rows[0].title, "Acme");
}

#[test]
fn member_row_exposes_role_and_ownership() {
    let mut owned = admin_policy("P1", "Acme");
    owned.owner_account_id = AccountId(100);

    let fixture = Fixture::new()
        .with_policy(owned)
        .with_policy(member_policy("P2", "Bolt"));
    let rows = fixture.rows();

    assert!(rows[0].is_admin());
    assert!(rows[0].is_owned_by(AccountId(100)));
    assert!(!rows[1].is_admin());
    assert!(!rows[1].is_owned_by(AccountId(100)));
}
