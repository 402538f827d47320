pub mod actions;
pub mod delete_flow;
pub mod local_actions;
pub mod menu;
pub mod page;
pub mod rooms;
pub mod rows;
