use std::cmp::Ordering;
use std::collections::BTreeMap;

use serde::Serialize;

use crate::application::rooms::RoomIndex;
use crate::domain::{
    AccountId, ConnectionSyncProgress, ErrorBag, PendingAction, Policy, PolicyId, PolicyRole,
    PolicyType, ReimbursementAccount, ReportId, Session, should_show_policy,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RowIcon {
    Avatar { url: String },
    DefaultAvatar { asset: String },
}

/// Row status marker: `Error` demands attention, `Info` signals background
/// work (an accounting sync in flight).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RowStatus {
    Error,
    Info,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RowVariant {
    Member {
        role: PolicyRole,
        owner_account_id: AccountId,
        policy_type: PolicyType,
        admin_room: Option<ReportId>,
        announce_room: Option<ReportId>,
    },
    JoinRequest {
        owner_account_id: AccountId,
        policy_type: PolicyType,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkspaceRow {
    pub policy_id: PolicyId,
    pub title: String,
    pub icon: RowIcon,
    pub disabled: bool,
    pub status: Option<RowStatus>,
    pub pending_action: Option<PendingAction>,
    pub errors: ErrorBag,
    pub variant: RowVariant,
}

impl WorkspaceRow {
    pub fn is_join_request(&self) -> bool {
        matches!(self.variant, RowVariant::JoinRequest { .. })
    }

    pub fn is_admin(&self) -> bool {
        matches!(
            self.variant,
            RowVariant::Member {
                role: PolicyRole::Admin,
                ..
            }
        )
    }

    pub fn is_owned_by(&self, account_id: AccountId) -> bool {
        match &self.variant {
            RowVariant::Member {
                owner_account_id, ..
            } => *owner_account_id == account_id,
            RowVariant::JoinRequest { .. } => false,
        }
    }

    pub fn admin_room(&self) -> Option<&ReportId> {
        match &self.variant {
            RowVariant::Member { admin_room, .. } => admin_room.as_ref(),
            RowVariant::JoinRequest { .. } => None,
        }
    }

    pub fn announce_room(&self) -> Option<&ReportId> {
        match &self.variant {
            RowVariant::Member { announce_room, .. } => announce_room.as_ref(),
            RowVariant::JoinRequest { .. } => None,
        }
    }
}

#[derive(Debug)]
pub struct RowProjectionInputs<'a> {
    pub policies: &'a BTreeMap<PolicyId, Policy>,
    pub rooms: &'a RoomIndex,
    pub session: Option<&'a Session>,
    pub reimbursement_account: Option<&'a ReimbursementAccount>,
    pub sync_progress: &'a BTreeMap<PolicyId, ConnectionSyncProgress>,
    pub offline: bool,
}

/// Projects the policy collection into the ordered list of hub rows.
pub fn project_workspace_rows(inputs: &RowProjectionInputs<'_>) -> Vec<WorkspaceRow> {
    let email = inputs.session.map(|session| session.email.as_str());

    let mut rows: Vec<WorkspaceRow> = inputs
        .policies
        .values()
        .filter(|policy| should_show_policy(policy, inputs.offline, email))
        .map(|policy| row_for_policy(policy, inputs, email))
        .collect();

    rows.sort_by(|a, b| {
        locale_compare(&a.title, &b.title).then_with(|| a.policy_id.cmp(&b.policy_id))
    });
    rows
}

/// Preferred source is the room index; policies created before rooms were
/// indexed still carry the room id on the policy record itself.
pub fn admin_room_for<'a>(policy: &'a Policy, rooms: &'a RoomIndex) -> Option<&'a ReportId> {
    rooms
        .admin_room(&policy.id)
        .or(policy.admin_room_id.as_ref())
}

pub fn announce_room_for<'a>(policy: &'a Policy, rooms: &'a RoomIndex) -> Option<&'a ReportId> {
    rooms
        .announce_room(&policy.id)
        .or(policy.announce_room_id.as_ref())
}

pub fn default_workspace_avatar(name: &str) -> String {
    name.chars()
        .find(char::is_ascii_alphabetic)
        .map(|letter| format!("workspace-{}", letter.to_ascii_lowercase()))
        .unwrap_or_else(|| "workspace-default".to_string())
}

fn row_for_policy(
    policy: &Policy,
    inputs: &RowProjectionInputs<'_>,
    email: Option<&str>,
) -> WorkspaceRow {
    if let Some(request) = policy.join_request.as_ref()
        && let Some((request_policy_id, details)) = request.details.first_key_value()
    {
        return WorkspaceRow {
            policy_id: request_policy_id.clone(),
            title: details.name.clone(),
            icon: icon_for(details.avatar_url.as_deref(), &policy.name),
            disabled: true,
            status: None,
            pending_action: None,
            errors: ErrorBag::new(),
            variant: RowVariant::JoinRequest {
                owner_account_id: details.owner_account_id,
                policy_type: details.policy_type,
            },
        };
    }

    WorkspaceRow {
        policy_id: policy.id.clone(),
        title: policy.name.clone(),
        icon: icon_for(policy.avatar_url.as_deref(), &policy.name),
        disabled: policy.pending_action == Some(PendingAction::Delete),
        status: row_status(policy, inputs, email),
        pending_action: policy.pending_action,
        errors: policy.errors.clone(),
        variant: RowVariant::Member {
            role: policy.role_for(email).unwrap_or(PolicyRole::User),
            owner_account_id: policy.owner_account_id,
            policy_type: policy.policy_type,
            admin_room: admin_room_for(policy, inputs.rooms).cloned(),
            announce_room: announce_room_for(policy, inputs.rooms).cloned(),
        },
    }
}

// Status markers are an admin concern; members never see one.
fn row_status(
    policy: &Policy,
    inputs: &RowProjectionInputs<'_>,
    email: Option<&str>,
) -> Option<RowStatus> {
    if !policy.is_admin_for(email) {
        return None;
    }
    let reimbursement_broken = inputs
        .reimbursement_account
        .is_some_and(|account| !account.errors.is_empty());
    if reimbursement_broken || policy.has_errors() {
        return Some(RowStatus::Error);
    }
    if inputs.sync_progress.contains_key(&policy.id) {
        return Some(RowStatus::Info);
    }
    None
}

fn icon_for(avatar_url: Option<&str>, fallback_name: &str) -> RowIcon {
    match avatar_url {
        Some(url) if !url.is_empty() => RowIcon::Avatar {
            url: url.to_string(),
        },
        _ => RowIcon::DefaultAvatar {
            asset: default_workspace_avatar(fallback_name),
        },
    }
}

/// Case- and accent-insensitive title ordering. Equal folded titles fall back
/// to the raw titles so the order stays total.
pub fn locale_compare(a: &str, b: &str) -> Ordering {
    fold_for_compare(a)
        .cmp(&fold_for_compare(b))
        .then_with(|| a.cmp(b))
}

fn fold_for_compare(value: &str) -> String {
    value
        .chars()
        .flat_map(|ch| fold_accent(ch).to_lowercase())
        .collect()
}

// Covers the Latin-1 accent range; anything else compares by code point.
fn fold_accent(ch: char) -> char {
    match ch {
        'á' | 'à' | 'â' | 'ä' | 'ã' | 'å' | 'Á' | 'À' | 'Â' | 'Ä' | 'Ã' | 'Å' => 'a',
        'ç' | 'Ç' => 'c',
        'é' | 'è' | 'ê' | 'ë' | 'É' | 'È' | 'Ê' | 'Ë' => 'e',
        'í' | 'ì' | 'î' | 'ï' | 'Í' | 'Ì' | 'Î' | 'Ï' => 'i',
        'ñ' | 'Ñ' => 'n',
        'ó' | 'ò' | 'ô' | 'ö' | 'õ' | 'Ó' | 'Ò' | 'Ô' | 'Ö' | 'Õ' => 'o',
        'ú' | 'ù' | 'û' | 'ü' | 'Ú' | 'Ù' | 'Û' | 'Ü' => 'u',
        'ý' | 'ÿ' | 'Ý' => 'y',
        _ => ch,
    }
}

#[cfg(test)]
mod tests;
