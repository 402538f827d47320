pub mod cli;
pub mod cli_contract;
pub mod cli_errors;
pub mod next_actions;
pub mod root_command_tree;
