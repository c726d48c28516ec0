// Infrastructure layer: configuration, CSV tables, logging and the run pipeline

pub mod config;
pub mod logging;
pub mod runner;
pub mod tables;

pub use config::{ConfigError, RosterConfig};
pub use logging::init_logging;
pub use runner::{run_check, run_generate, run_solve, RunError};
pub use tables::TableError;
