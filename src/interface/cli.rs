use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;

use crate::application::menu::{MenuAction, MenuEntry, MenuIcon};
use crate::application::page::{LayoutWidth, RowRenderModel, WorkspaceHubPage};
use crate::application::rooms::build_room_index;
use crate::application::rows::{RowStatus, RowVariant, WorkspaceRow};
use crate::domain::{PendingAction, PolicyRole};
use crate::infrastructure::config;
use crate::infrastructure::event_log::NullEventLogger;
use crate::infrastructure::snapshot::{demo_snapshot, load_from_path, store_from_snapshot};
use crate::infrastructure::store::Store;
use crate::interface::cli_contract::{CommandEnvelope, ErrorDetail, NextAction};
use crate::interface::cli_errors::{CliErrorCode, classify_error_message};
use crate::interface::next_actions::{
    NextActionsBuilder, after_workspace_menu, after_workspace_rooms, after_workspaces_list,
};
use crate::interface::root_command_tree::{RootCommandTree, root_command_tree};
use crate::ui::tui::{TuiOptions, run_tui};

const LOG_DIR: &str = ".tally";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
struct TuiArgs {
    snapshot_path: Option<PathBuf>,
    demo: bool,
    narrow: bool,
    event_log_path: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
struct WorkspacesListArgs {
    snapshot_path: Option<PathBuf>,
    demo: bool,
    layout: Option<LayoutWidth>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
struct WorkspacesRoomsArgs {
    snapshot_path: Option<PathBuf>,
    demo: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
struct WorkspacesMenuArgs {
    snapshot_path: Option<PathBuf>,
    demo: bool,
    policy: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
struct WorkspacesListResult {
    source: String,
    rows: Vec<RowView>,
    show_column_header: bool,
    show_empty_state: bool,
    show_loading: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
struct RowView {
    policy_id: String,
    title: String,
    kind: String,
    role: Option<String>,
    disabled: bool,
    status: Option<String>,
    pending_action: Option<String>,
    error_count: usize,
    menu: Vec<String>,
    spinner_active: bool,
}

impl RowView {
    fn from_render(model: &RowRenderModel) -> Self {
        let row = &model.row;
        Self {
            policy_id: row.policy_id.as_str().to_string(),
            title: row.title.clone(),
            kind: row_kind_label(row).to_string(),
            role: row_role(row).map(|role| role_label(role).to_string()),
            disabled: row.disabled,
            status: row.status.map(|status| status_label(status).to_string()),
            pending_action: row
                .pending_action
                .map(|action| pending_action_label(action).to_string()),
            error_count: row.errors.len(),
            menu: model.menu.iter().map(|entry| entry.label.clone()).collect(),
            spinner_active: model.spinner_active,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
struct WorkspaceRoomsResult {
    source: String,
    rooms: Vec<PolicyRoomsView>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
struct PolicyRoomsView {
    policy_id: String,
    admin_room_id: Option<String>,
    announce_room_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
struct WorkspaceMenuResult {
    source: String,
    policy_id: String,
    entries: Vec<MenuEntryView>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
struct MenuEntryView {
    label: String,
    icon: String,
    action: String,
    keeps_parent_modal_open: bool,
    runs_after_modal_close: bool,
    shows_spinner: bool,
}

impl MenuEntryView {
    fn from_entry(entry: &MenuEntry) -> Self {
        Self {
            label: entry.label.clone(),
            icon: menu_icon_label(entry.icon).to_string(),
            action: menu_action_label(&entry.action).to_string(),
            keeps_parent_modal_open: entry.keeps_parent_modal_open,
            runs_after_modal_close: entry.runs_after_modal_close,
            shows_spinner: entry.shows_spinner,
        }
    }
}

fn parse_tui_args(args: impl IntoIterator<Item = String>) -> std::io::Result<TuiArgs> {
    let mut parsed = TuiArgs::default();
    let mut args = args.into_iter();

    while let Some(argument) = args.next() {
        match argument.as_str() {
            "--snapshot" => {
                let Some(path) = args.next() else {
                    return Err(std::io::Error::new(
                        std::io::ErrorKind::InvalidInput,
                        "--snapshot requires a file path",
                    ));
                };
                parsed.snapshot_path = Some(PathBuf::from(path));
            }
            "--demo" => {
                parsed.demo = true;
            }
            "--narrow" => {
                parsed.narrow = true;
            }
            "--event-log" => {
                let Some(path) = args.next() else {
                    return Err(std::io::Error::new(
                        std::io::ErrorKind::InvalidInput,
                        "--event-log requires a file path",
                    ));
                };
                parsed.event_log_path = Some(PathBuf::from(path));
            }
            _ => {
                return Err(std::io::Error::new(
                    std::io::ErrorKind::InvalidInput,
                    format!("unknown argument for 'tui': {argument}"),
                ));
            }
        }
    }

    Ok(parsed)
}

fn parse_workspaces_list_args(
    args: impl IntoIterator<Item = String>,
) -> std::io::Result<WorkspacesListArgs> {
    let mut parsed = WorkspacesListArgs::default();
    let mut args = args.into_iter();

    while let Some(argument) = args.next() {
        match argument.as_str() {
            "--snapshot" => {
                let Some(path) = args.next() else {
                    return Err(std::io::Error::new(
                        std::io::ErrorKind::InvalidInput,
                        "--snapshot requires a file path",
                    ));
                };
                parsed.snapshot_path = Some(PathBuf::from(path));
            }
            "--demo" => {
                parsed.demo = true;
            }
            "--layout" => {
                let Some(value) = args.next() else {
                    return Err(std::io::Error::new(
                        std::io::ErrorKind::InvalidInput,
                        "--layout requires a value",
                    ));
                };
                parsed.layout = Some(parse_layout(&value)?);
            }
            _ => {
                return Err(std::io::Error::new(
                    std::io::ErrorKind::InvalidInput,
                    format!("unknown argument for 'workspaces list': {argument}"),
                ));
            }
        }
    }

    Ok(parsed)
}

fn parse_workspaces_rooms_args(
    args: impl IntoIterator<Item = String>,
) -> std::io::Result<WorkspacesRoomsArgs> {
    let mut parsed = WorkspacesRoomsArgs::default();
    let mut args = args.into_iter();

    while let Some(argument) = args.next() {
        match argument.as_str() {
            "--snapshot" => {
                let Some(path) = args.next() else {
                    return Err(std::io::Error::new(
                        std::io::ErrorKind::InvalidInput,
                        "--snapshot requires a file path",
                    ));
                };
                parsed.snapshot_path = Some(PathBuf::from(path));
            }
            "--demo" => {
                parsed.demo = true;
            }
            _ => {
                return Err(std::io::Error::new(
                    std::io::ErrorKind::InvalidInput,
                    format!("unknown argument for 'workspaces rooms': {argument}"),
                ));
            }
        }
    }

    Ok(parsed)
}

fn parse_workspaces_menu_args(
    args: impl IntoIterator<Item = String>,
) -> std::io::Result<WorkspacesMenuArgs> {
    let mut parsed = WorkspacesMenuArgs::default();
    let mut args = args.into_iter();

    while let Some(argument) = args.next() {
        match argument.as_str() {
            "--snapshot" => {
                let Some(path) = args.next() else {
                    return Err(std::io::Error::new(
                        std::io::ErrorKind::InvalidInput,
                        "--snapshot requires a file path",
                    ));
                };
                parsed.snapshot_path = Some(PathBuf::from(path));
            }
            "--demo" => {
                parsed.demo = true;
            }
            "--policy" => {
                let Some(policy) = args.next() else {
                    return Err(std::io::Error::new(
                        std::io::ErrorKind::InvalidInput,
                        "--policy requires a value",
                    ));
                };
                parsed.policy = Some(policy);
            }
            _ => {
                return Err(std::io::Error::new(
                    std::io::ErrorKind::InvalidInput,
                    format!("unknown argument for 'workspaces menu': {argument}"),
                ));
            }
        }
    }

    Ok(parsed)
}

fn parse_layout(value: &str) -> std::io::Result<LayoutWidth> {
    match value.trim().to_ascii_lowercase().as_str() {
        "wide" => Ok(LayoutWidth::Wide),
        "narrow" => Ok(LayoutWidth::Narrow),
        _ => Err(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            "--layout must be one of: wide, narrow",
        )),
    }
}

#[derive(Debug)]
struct ResolvedStore {
    source: String,
    store: Store,
}

/// Store bootstrap shared by every command: an explicit `--snapshot` wins,
/// `--demo` uses the built-in dataset, and otherwise the config's
/// `snapshot_path` is consulted.
fn resolve_store(
    snapshot_path: Option<PathBuf>,
    demo: bool,
) -> Result<ResolvedStore, (CliErrorCode, String)> {
    if let Some(path) = snapshot_path {
        let snapshot = load_from_path(&path)
            .map_err(|message| (classify_error_message(&message), message))?;
        return Ok(ResolvedStore {
            source: path.display().to_string(),
            store: store_from_snapshot(snapshot),
        });
    }

    if demo {
        return Ok(ResolvedStore {
            source: "demo".to_string(),
            store: store_from_snapshot(demo_snapshot()),
        });
    }

    let loaded = config::load().map_err(|message| (classify_error_message(&message), message))?;
    let Some(path) = loaded.config.snapshot_path else {
        return Err((
            CliErrorCode::InvalidArgument,
            "snapshot source is required (--snapshot <path>, --demo, or snapshot_path in config)"
                .to_string(),
        ));
    };
    let snapshot =
        load_from_path(&path).map_err(|message| (classify_error_message(&message), message))?;
    Ok(ResolvedStore {
        source: path.display().to_string(),
        store: store_from_snapshot(snapshot),
    })
}

fn resolve_event_log_path(path: PathBuf) -> PathBuf {
    if path.is_absolute() {
        return path;
    }

    let log_dir = Path::new(LOG_DIR);
    if path.starts_with(log_dir) {
        return path;
    }

    log_dir.join(path)
}

fn ensure_event_log_parent_directory(path: &Path) -> std::io::Result<()> {
    let Some(parent) = path.parent() else {
        return Ok(());
    };
    if parent.as_os_str().is_empty() {
        return Ok(());
    }

    fs::create_dir_all(parent)
}

fn row_kind_label(row: &WorkspaceRow) -> &'static str {
    if row.is_join_request() {
        "join_request"
    } else {
        "member"
    }
}

fn row_role(row: &WorkspaceRow) -> Option<PolicyRole> {
    match &row.variant {
        RowVariant::Member { role, .. } => Some(*role),
        RowVariant::JoinRequest { .. } => None,
    }
}

fn role_label(role: PolicyRole) -> &'static str {
    match role {
        PolicyRole::Admin => "admin",
        PolicyRole::Auditor => "auditor",
        PolicyRole::User => "user",
    }
}

fn status_label(status: RowStatus) -> &'static str {
    match status {
        RowStatus::Error => "error",
        RowStatus::Info => "info",
    }
}

fn pending_action_label(action: PendingAction) -> &'static str {
    match action {
        PendingAction::Add => "add",
        PendingAction::Update => "update",
        PendingAction::Delete => "delete",
    }
}

fn menu_icon_label(icon: MenuIcon) -> &'static str {
    match icon {
        MenuIcon::Building => "building",
        MenuIcon::Trashcan => "trashcan",
        MenuIcon::Exit => "exit",
        MenuIcon::Hashtag => "hashtag",
        MenuIcon::Star => "star",
    }
}

fn menu_action_label(action: &MenuAction) -> &'static str {
    match action {
        MenuAction::GoToWorkspace { .. } => "go_to_workspace",
        MenuAction::RequestDelete { .. } => "request_delete",
        MenuAction::LeaveWorkspace { .. } => "leave_workspace",
        MenuAction::GoToAdminRoom { .. } => "go_to_admin_room",
        MenuAction::GoToAnnounceRoom { .. } => "go_to_announce_room",
        MenuAction::SetAsDefault { .. } => "set_as_default",
    }
}

fn root_next_actions() -> Vec<NextAction> {
    NextActionsBuilder::new()
        .push("tally tui", "Open the workspace hub")
        .push("tally workspaces list", "List hub rows as JSON")
        .push("tally workspaces list --demo", "List the built-in demo hub")
        .build()
}

fn root_command_envelope() -> CommandEnvelope<RootCommandTree> {
    CommandEnvelope::success(
        "tally",
        root_command_tree(),
        Vec::new(),
        root_next_actions(),
    )
}

fn emit_json<T: serde::Serialize>(payload: &T) -> std::io::Result<()> {
    let json =
        serde_json::to_string(payload).map_err(|error| std::io::Error::other(error.to_string()))?;
    println!("{json}");
    Ok(())
}

fn emit_error(
    command: &str,
    code: CliErrorCode,
    message: String,
    fix: &str,
) -> std::io::Result<()> {
    emit_json(&CommandEnvelope::<serde_json::Value>::error(
        command,
        ErrorDetail::from_code(code, message),
        fix.to_string(),
        Vec::new(),
        vec![NextAction::new("tally", "Show root command tree")],
    ))
}

fn run_workspaces_list(parsed: WorkspacesListArgs) -> std::io::Result<()> {
    let command = "tally workspaces list";
    let resolved = match resolve_store(parsed.snapshot_path, parsed.demo) {
        Ok(resolved) => resolved,
        Err((code, message)) => {
            return emit_error(
                command,
                code,
                message,
                "Point --snapshot at a readable snapshot file, or pass --demo",
            );
        }
    };

    let mut page = WorkspaceHubPage::new(Arc::new(NullEventLogger));
    let model = page.render_model(&resolved.store, parsed.layout.unwrap_or_default());
    let first_policy_id = model
        .rows
        .first()
        .map(|row| row.row.policy_id.as_str().to_string());
    let payload = WorkspacesListResult {
        source: resolved.source,
        rows: model.rows.iter().map(RowView::from_render).collect(),
        show_column_header: model.show_column_header,
        show_empty_state: model.show_empty_state,
        show_loading: model.show_loading,
    };
    emit_json(&CommandEnvelope::success(
        command,
        payload,
        Vec::new(),
        after_workspaces_list(first_policy_id.as_deref()),
    ))
}

fn run_workspaces_rooms(parsed: WorkspacesRoomsArgs) -> std::io::Result<()> {
    let command = "tally workspaces rooms";
    let resolved = match resolve_store(parsed.snapshot_path, parsed.demo) {
        Ok(resolved) => resolved,
        Err((code, message)) => {
            return emit_error(
                command,
                code,
                message,
                "Point --snapshot at a readable snapshot file, or pass --demo",
            );
        }
    };

    let index = build_room_index(resolved.store.reports().values());
    let payload = WorkspaceRoomsResult {
        source: resolved.source,
        rooms: index
            .iter()
            .map(|(policy_id, rooms)| PolicyRoomsView {
                policy_id: policy_id.as_str().to_string(),
                admin_room_id: rooms
                    .admin_room
                    .as_ref()
                    .map(|report_id| report_id.as_str().to_string()),
                announce_room_id: rooms
                    .announce_room
                    .as_ref()
                    .map(|report_id| report_id.as_str().to_string()),
            })
            .collect(),
    };
    emit_json(&CommandEnvelope::success(
        command,
        payload,
        Vec::new(),
        after_workspace_rooms(),
    ))
}

fn run_workspaces_menu(parsed: WorkspacesMenuArgs) -> std::io::Result<()> {
    let command = "tally workspaces menu";
    let Some(policy) = parsed.policy else {
        return emit_error(
            command,
            CliErrorCode::InvalidArgument,
            "--policy is required".to_string(),
            "Retry with '--policy <id>'; workspaces list shows the ids",
        );
    };
    let resolved = match resolve_store(parsed.snapshot_path, parsed.demo) {
        Ok(resolved) => resolved,
        Err((code, message)) => {
            return emit_error(
                command,
                code,
                message,
                "Point --snapshot at a readable snapshot file, or pass --demo",
            );
        }
    };

    let mut page = WorkspaceHubPage::new(Arc::new(NullEventLogger));
    let rows = page.rows(&resolved.store).to_vec();
    let Some((row_index, row)) = rows
        .iter()
        .enumerate()
        .find(|(_, row)| row.policy_id.as_str() == policy)
    else {
        return emit_error(
            command,
            CliErrorCode::PolicyNotFound,
            format!("policy not found: {policy}"),
            "Run 'tally workspaces list' and pick an existing policy id",
        );
    };

    let entries = page.menu_for_row(&resolved.store, row, row_index);
    let payload = WorkspaceMenuResult {
        source: resolved.source,
        policy_id: policy.clone(),
        entries: entries.iter().map(MenuEntryView::from_entry).collect(),
    };
    emit_json(&CommandEnvelope::success(
        command,
        payload,
        Vec::new(),
        after_workspace_menu(&policy),
    ))
}

fn run_tui_command(parsed: TuiArgs) -> std::io::Result<()> {
    let command = "tally tui";
    let loaded_config = match config::load() {
        Ok(loaded) => loaded.config,
        Err(message) => {
            return emit_error(
                command,
                classify_error_message(&message),
                message,
                "Fix or remove the config file, then retry",
            );
        }
    };

    let resolved = match resolve_store(parsed.snapshot_path, parsed.demo) {
        Ok(resolved) => resolved,
        Err((code, message)) => {
            return emit_error(
                command,
                code,
                message,
                "Point --snapshot at a readable snapshot file, or pass --demo",
            );
        }
    };

    let event_log_path = parsed
        .event_log_path
        .or(loaded_config.event_log_path)
        .map(resolve_event_log_path);
    if let Some(path) = event_log_path.as_ref() {
        ensure_event_log_parent_directory(path)?;
    }

    run_tui(resolved.store, TuiOptions {
        forced_narrow: parsed.narrow || loaded_config.force_narrow_layout,
        event_log_path,
    })
}

pub fn run(args: impl IntoIterator<Item = String>) -> std::io::Result<()> {
    let args = args.into_iter().collect::<Vec<String>>();
    let Some((first, remaining)) = args.split_first() else {
        return emit_json(&root_command_envelope());
    };

    if first == "tui" {
        return match parse_tui_args(remaining.iter().cloned()) {
            Ok(parsed) => run_tui_command(parsed),
            Err(error) => emit_error(
                "tally tui",
                CliErrorCode::InvalidArgument,
                error.to_string(),
                "Retry with '--snapshot <path>' or '--demo' and optional '--narrow'",
            ),
        };
    }
    if first == "workspaces" {
        let Some((workspaces_command, workspaces_args)) = remaining.split_first() else {
            return emit_error(
                "tally workspaces",
                CliErrorCode::InvalidArgument,
                "workspaces subcommand is required".to_string(),
                "Use 'tally workspaces list', 'rooms', or 'menu'",
            );
        };
        if workspaces_command == "list" {
            return match parse_workspaces_list_args(workspaces_args.iter().cloned()) {
                Ok(parsed) => run_workspaces_list(parsed),
                Err(error) => emit_error(
                    "tally workspaces list",
                    CliErrorCode::InvalidArgument,
                    error.to_string(),
                    "Retry with '--snapshot <path>' or '--demo' and optional '--layout'",
                ),
            };
        }
        if workspaces_command == "rooms" {
            return match parse_workspaces_rooms_args(workspaces_args.iter().cloned()) {
                Ok(parsed) => run_workspaces_rooms(parsed),
                Err(error) => emit_error(
                    "tally workspaces rooms",
                    CliErrorCode::InvalidArgument,
                    error.to_string(),
                    "Retry with '--snapshot <path>' or '--demo'",
                ),
            };
        }
        if workspaces_command == "menu" {
            return match parse_workspaces_menu_args(workspaces_args.iter().cloned()) {
                Ok(parsed) => run_workspaces_menu(parsed),
                Err(error) => emit_error(
                    "tally workspaces menu",
                    CliErrorCode::InvalidArgument,
                    error.to_string(),
                    "Retry with '--policy <id>' plus '--snapshot <path>' or '--demo'",
                ),
            };
        }
    }

    emit_error(
        "tally",
        CliErrorCode::InvalidArgument,
        "unknown command".to_string(),
        "Run 'tally' to view command tree and usage",
    )
}
