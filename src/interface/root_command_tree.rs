use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CapabilitySnapshot {
    pub snapshot_bootstrap: bool,
    pub demo_dataset: bool,
    pub interactive_tui: bool,
    pub live_backend: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandDescriptor {
    pub command: String,
    pub description: String,
    pub usage: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RootCommandTree {
    pub command: String,
    pub summary: String,
    pub capabilities: CapabilitySnapshot,
    pub commands: Vec<CommandDescriptor>,
}

pub fn root_command_tree() -> RootCommandTree {
    RootCommandTree {
        command: "tally".to_string(),
        summary: "Workspace hub over snapshot state".to_string(),
        capabilities: CapabilitySnapshot {
            snapshot_bootstrap: true,
            demo_dataset: true,
            interactive_tui: true,
            live_backend: false,
        },
        commands: vec![
            command(
                "tally tui",
                "Open the workspace hub",
                "tally tui [--snapshot <path> | --demo] [--narrow] [--event-log <path>]",
            ),
            command(
                "tally workspaces list",
                "List hub rows as JSON",
                "tally workspaces list [--snapshot <path> | --demo] [--layout <wide|narrow>]",
            ),
            command(
                "tally workspaces rooms",
                "Show the per-workspace room index",
                "tally workspaces rooms [--snapshot <path> | --demo]",
            ),
            command(
                "tally workspaces menu",
                "Show the row menu for one workspace",
                "tally workspaces menu --policy <id> [--snapshot <path> | --demo]",
            ),
        ],
    }
}

fn command(command: &str, description: &str, usage: &str) -> CommandDescriptor {
    CommandDescriptor {
        command: command.to_string(),
        description: description.to_string(),
        usage: usage.to_string(),
    }
}
