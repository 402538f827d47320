use crate::interface::cli_contract::NextAction;

#[derive(Debug, Default)]
pub struct NextActionsBuilder {
    actions: Vec<NextAction>,
}

impl NextActionsBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(mut self, command: impl Into<String>, description: impl Into<String>) -> Self {
        let command = command.into().trim().to_string();
        let description = description.into().trim().to_string();
        if command.is_empty() || description.is_empty() {
            return self;
        }
        self.actions.push(NextAction {
            command,
            description,
        });
        self
    }

    pub fn build(self) -> Vec<NextAction> {
        self.actions
    }
}

/// Follow-ups after a row listing. When the listing produced rows, the first
/// one seeds a concrete menu command.
pub fn after_workspaces_list(first_policy_id: Option<&str>) -> Vec<NextAction> {
    let builder = NextActionsBuilder::new();
    let builder = if let Some(policy_id) = first_policy_id {
        builder.push(
            format!("tally workspaces menu --policy {policy_id}"),
            "Inspect the row menu for a workspace",
        )
    } else {
        builder.push("tally tui --demo", "Open the hub with the built-in demo data")
    };
    builder
        .push("tally workspaces rooms", "Inspect the workspace room index")
        .push("tally tui", "Open the workspace hub")
        .build()
}

pub fn after_workspace_menu(policy_id: &str) -> Vec<NextAction> {
    let policy_id = policy_id.trim();
    NextActionsBuilder::new()
        .push("tally workspaces list", "Inspect hub rows")
        .push(
            "tally workspaces rooms",
            format!("Inspect the rooms behind {policy_id}'s menu entries"),
        )
        .build()
}

pub fn after_workspace_rooms() -> Vec<NextAction> {
    NextActionsBuilder::new()
        .push("tally workspaces list", "Inspect hub rows")
        .push("tally tui", "Open the workspace hub")
        .build()
}
