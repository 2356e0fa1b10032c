//! CLI module for the realtime tail binary.
//!
//! This module provides command-line interface functionality including:
//! - Argument parsing
//! - Version and usage display
//!
//! # Usage
//!
//! The CLI dispatcher should be called early in main() to handle flags
//! before the runtime and logging are initialized:
//!
//! ```ignore
//! use storefront_realtime::cli::{parse_args, run_cli_command};
//!
//! if run_cli_command(parse_args(std::env::args())) {
//!     return Ok(());
//! }
//! // No CLI command, start tailing
//! ```

pub mod args;
pub mod version;

pub use args::{parse_args, CliCommand};
pub use version::{usage, version_line, BIN_NAME, VERSION};

/// Run a CLI command if applicable.
///
/// Returns `true` when the command was handled and the process should
/// exit, `false` for [`CliCommand::Tail`].
pub fn run_cli_command(command: CliCommand) -> bool {
    match command {
        CliCommand::Version => {
            println!("{}", version_line());
            true
        }
        CliCommand::Help => {
            println!("{}", usage());
            true
        }
        CliCommand::Tail => false,
    }
}
