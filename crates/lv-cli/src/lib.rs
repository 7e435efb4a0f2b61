//! logveil CLI support: run loop, logging setup and exit codes.

pub mod exit_codes;
pub mod logging;
pub mod run;

pub use exit_codes::ExitCode;
pub use run::{run, Mode, RunError, RunOptions, RunStats};
