//! Command-line argument parsing for the realtime tail binary.
//!
//! This module handles parsing command-line arguments and determining
//! which CLI command to execute.

/// Parsed CLI command to execute.
#[derive(Debug, Clone, PartialEq)]
pub enum CliCommand {
    /// Show version information
    Version,
    /// Show usage
    Help,
    /// Connect and print incoming messages (default)
    Tail,
}

/// Parse command-line arguments and return the appropriate command.
///
/// The first item is the program name and is skipped. Unknown flags are
/// ignored so wrappers can pass extra arguments through.
///
/// # Examples
///
/// ```
/// use storefront_realtime::cli::args::{parse_args, CliCommand};
///
/// let args = vec!["storefront-realtime".to_string(), "--version".to_string()];
/// assert_eq!(parse_args(args.into_iter()), CliCommand::Version);
/// ```
pub fn parse_args<I>(args: I) -> CliCommand
where
    I: Iterator<Item = String>,
{
    for arg in args.skip(1) {
        match arg.as_str() {
            "--version" | "-V" => return CliCommand::Version,
            "--help" | "-h" => return CliCommand::Help,
            _ => {}
        }
    }
    CliCommand::Tail
}
