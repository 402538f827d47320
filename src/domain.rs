use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

pub type ErrorBag = BTreeMap<String, String>;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PolicyId(pub String);

impl PolicyId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PolicyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for PolicyId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for PolicyId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ReportId(pub String);

impl ReportId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ReportId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ReportId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for ReportId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AccountId(pub u64);

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyRole {
    Admin,
    Auditor,
    User,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyType {
    Team,
    Corporate,
    Personal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PendingAction {
    Add,
    Update,
    Delete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatKind {
    PolicyAdmins,
    PolicyAnnounce,
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Employee {
    #[serde(default)]
    pub role: Option<PolicyRole>,
    #[serde(default)]
    pub errors: ErrorBag,
}

/// Requester-supplied details attached to a policy the user asked to join but
/// is not yet a member of.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinRequestDetails {
    pub name: String,
    #[serde(default)]
    pub avatar_url: Option<String>,
    pub owner_account_id: AccountId,
    pub policy_type: PolicyType,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinRequest {
    pub details: BTreeMap<PolicyId, JoinRequestDetails>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Policy {
    pub id: PolicyId,
    pub name: String,
    #[serde(default)]
    pub avatar_url: Option<String>,
    pub owner_account_id: AccountId,
    #[serde(default)]
    pub role: Option<PolicyRole>,
    pub policy_type: PolicyType,
    #[serde(default)]
    pub pending_action: Option<PendingAction>,
    #[serde(default)]
    pub errors: ErrorBag,
    #[serde(default)]
    pub employees: BTreeMap<String, Employee>,
    #[serde(default)]
    pub expense_cards_enabled: bool,
    #[serde(default)]
    pub company_cards_enabled: bool,
    #[serde(default)]
    pub workspace_account_id: Option<AccountId>,
    // Legacy room ids written directly on the policy record; the report
    // collection is the preferred source (see application::rows).
    #[serde(default)]
    pub admin_room_id: Option<ReportId>,
    #[serde(default)]
    pub announce_room_id: Option<ReportId>,
    #[serde(default)]
    pub join_request: Option<JoinRequest>,
}

impl Policy {
    pub fn new(
        id: impl Into<PolicyId>,
        name: impl Into<String>,
        owner_account_id: AccountId,
        role: Option<PolicyRole>,
        policy_type: PolicyType,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            avatar_url: None,
            owner_account_id,
            role,
            policy_type,
            pending_action: None,
            errors: ErrorBag::new(),
            employees: BTreeMap::new(),
            expense_cards_enabled: false,
            company_cards_enabled: false,
            workspace_account_id: None,
            admin_room_id: None,
            announce_room_id: None,
            join_request: None,
        }
    }

    pub fn role_for(&self, email: Option<&str>) -> Option<PolicyRole> {
        if self.role.is_some() {
            return self.role;
        }
        let email = email?;
        self.employees.get(email).and_then(|employee| employee.role)
    }

    pub fn is_admin_for(&self, email: Option<&str>) -> bool {
        self.role_for(email) == Some(PolicyRole::Admin)
    }

    pub fn is_join_request_pending(&self) -> bool {
        self.join_request.is_some()
    }

    /// Policy-level or employee-level errors, the union the status indicator
    /// looks at.
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
            || self
                .employees
                .values()
                .any(|employee| !employee.errors.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    pub report_id: ReportId,
    #[serde(default)]
    pub policy_id: Option<PolicyId>,
    #[serde(default)]
    pub parent_report_id: Option<ReportId>,
    #[serde(default)]
    pub chat_kind: Option<ChatKind>,
}

impl Report {
    pub fn new(report_id: impl Into<ReportId>) -> Self {
        Self {
            report_id: report_id.into(),
            policy_id: None,
            parent_report_id: None,
            chat_kind: None,
        }
    }

    pub fn for_policy(mut self, policy_id: impl Into<PolicyId>) -> Self {
        self.policy_id = Some(policy_id.into());
        self
    }

    pub fn with_parent(mut self, parent_report_id: impl Into<ReportId>) -> Self {
        self.parent_report_id = Some(parent_report_id.into());
        self
    }

    pub fn with_chat_kind(mut self, chat_kind: ChatKind) -> Self {
        self.chat_kind = Some(chat_kind);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub account_id: AccountId,
    pub email: String,
    #[serde(default)]
    pub is_support_session: bool,
    #[serde(default)]
    pub is_anonymous: bool,
}

impl Session {
    pub fn new(account_id: AccountId, email: impl Into<String>) -> Self {
        Self {
            account_id,
            email: email.into(),
            is_support_session: false,
            is_anonymous: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ReimbursementAccount {
    #[serde(default)]
    pub errors: ErrorBag,
}

/// Marker that an accounting-connection sync is running for a policy. The
/// stage label is informational; presence of the record is what matters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionSyncProgress {
    pub stage: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CardFeeds {
    #[serde(default)]
    pub feed_names: Vec<String>,
    #[serde(default)]
    pub active_card_ids: Vec<String>,
}

impl CardFeeds {
    pub fn is_empty(&self) -> bool {
        self.feed_names.is_empty() && self.active_card_ids.is_empty()
    }
}

/// Whether a policy earns a row in the hub list. Join requests are always
/// shown; personal policies and policies the user has no role in are not;
/// a policy already pending deletion stays visible only while offline or
/// while it still carries errors the user may need to dismiss.
pub fn should_show_policy(policy: &Policy, offline: bool, email: Option<&str>) -> bool {
    if policy.is_join_request_pending() {
        return true;
    }
    if policy.policy_type == PolicyType::Personal {
        return false;
    }
    if policy.role_for(email).is_none() {
        return false;
    }
    match policy.pending_action {
        Some(PendingAction::Delete) => offline || !policy.errors.is_empty(),
        _ => true,
    }
}
