mod model;
mod runner;
mod update;
mod view;

pub use runner::{TuiOptions, run_tui};
