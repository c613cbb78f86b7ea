//! Command implementations

pub mod config;
pub mod install;
pub mod list;
pub mod print;
pub mod remove;

use std::process::ExitCode;

/// Exit status for a finished batch: failure when anything went wrong.
#[must_use]
pub fn batch_exit_code(has_failures: bool) -> ExitCode {
    if has_failures {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
