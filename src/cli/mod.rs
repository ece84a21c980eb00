//! CLI layer - Command-line interface
//!
//! Contains argument parsing, output formatting and the main
//! application runners.

pub mod app;
pub mod args;
pub mod config_cmd;
pub mod presenter;

// Re-export commonly used types
pub use app::{run_devices, run_pitch, EXIT_ERROR, EXIT_SUCCESS, EXIT_USAGE_ERROR};
pub use args::{AnalyzeOptions, Cli, Commands, ConfigAction, DeviceAction, RecordOptions};
pub use presenter::Presenter;
