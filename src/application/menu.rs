use serde::Serialize;

use crate::application::rows::{RowVariant, WorkspaceRow};
use crate::domain::{PolicyId, PolicyRole, ReportId, Session};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MenuIcon {
    Building,
    Trashcan,
    Exit,
    Hashtag,
    Star,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MenuAction {
    GoToWorkspace {
        policy_id: PolicyId,
    },
    RequestDelete {
        policy_id: PolicyId,
        policy_name: String,
    },
    LeaveWorkspace {
        policy_id: PolicyId,
    },
    GoToAdminRoom {
        report_id: ReportId,
    },
    GoToAnnounceRoom {
        report_id: ReportId,
    },
    SetAsDefault {
        policy_id: PolicyId,
        previous_default: Option<PolicyId>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MenuEntry {
    pub label: String,
    pub icon: MenuIcon,
    pub action: MenuAction,
    /// Keeps the hosting menu modal mounted after selection. Only the delete
    /// entry sets this, and only while a billing recalculation must run first.
    pub keeps_parent_modal_open: bool,
    /// Runs the action after the modal finishes closing instead of
    /// immediately. Mutually exclusive with `keeps_parent_modal_open`.
    pub runs_after_modal_close: bool,
    pub shows_spinner: bool,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MenuContext<'a> {
    pub session: Option<&'a Session>,
    pub default_policy_id: Option<&'a PolicyId>,
    pub billing_recalc_required: bool,
    pub row_spinner_active: bool,
}

/// Builds the three-dot menu for one row. Entry order is fixed; context only
/// decides which entries appear. Join-request rows get the navigation entry
/// alone since there is no membership to act on yet.
pub fn build_row_menu(row: &WorkspaceRow, ctx: &MenuContext<'_>) -> Vec<MenuEntry> {
    let mut entries = vec![plain_entry(
        "Go to workspace",
        MenuIcon::Building,
        MenuAction::GoToWorkspace {
            policy_id: row.policy_id.clone(),
        },
    )];

    let RowVariant::Member {
        role,
        owner_account_id,
        admin_room,
        announce_room,
        ..
    } = &row.variant
    else {
        return entries;
    };

    let account_id = ctx.session.map(|session| session.account_id);
    let is_admin = *role == PolicyRole::Admin;
    let is_owner = account_id == Some(*owner_account_id);

    if is_owner {
        entries.push(MenuEntry {
            label: "Delete".to_string(),
            icon: MenuIcon::Trashcan,
            action: MenuAction::RequestDelete {
                policy_id: row.policy_id.clone(),
                policy_name: row.title.clone(),
            },
            keeps_parent_modal_open: ctx.billing_recalc_required,
            runs_after_modal_close: !ctx.billing_recalc_required,
            shows_spinner: ctx.row_spinner_active,
        });
    } else if !is_admin {
        entries.push(plain_entry(
            "Leave",
            MenuIcon::Exit,
            MenuAction::LeaveWorkspace {
                policy_id: row.policy_id.clone(),
            },
        ));
    }

    if is_admin && let Some(report_id) = admin_room {
        entries.push(plain_entry(
            "Go to #admins room",
            MenuIcon::Hashtag,
            MenuAction::GoToAdminRoom {
                report_id: report_id.clone(),
            },
        ));
    }

    if let Some(report_id) = announce_room {
        entries.push(plain_entry(
            "Go to #announce room",
            MenuIcon::Hashtag,
            MenuAction::GoToAnnounceRoom {
                report_id: report_id.clone(),
            },
        ));
    }

    let is_default = ctx.default_policy_id == Some(&row.policy_id);
    if !is_default {
        entries.push(plain_entry(
            "Set as default workspace",
            MenuIcon::Star,
            MenuAction::SetAsDefault {
                policy_id: row.policy_id.clone(),
                previous_default: ctx.default_policy_id.cloned(),
            },
        ));
    }

    entries
}

fn plain_entry(label: &str, icon: MenuIcon, action: MenuAction) -> MenuEntry {
    MenuEntry {
        label: label.to_string(),
        icon,
        action,
        keeps_parent_modal_open: false,
        runs_after_modal_close: false,
        shows_spinner: false,
    }
}
