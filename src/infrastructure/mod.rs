pub mod config;
pub mod event_log;
pub mod snapshot;
pub mod store;
