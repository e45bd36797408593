//! Core library for the `testloom` CLI: records a user's interaction with a
//! target page and synthesizes automated-test artifacts from the recording.

pub mod adapters;
pub mod capture;
pub mod cli;
pub mod commands;
pub mod context;
pub mod model;
pub mod ports;
pub mod render;
pub mod session;
pub mod synth;

use clap::Parser;

/// Run the CLI with the provided arguments.
///
/// # Errors
///
/// Returns an error string when argument parsing fails or command execution fails.
pub fn run<I, T>(args: I) -> Result<(), String>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let cli = match cli::Cli::try_parse_from(args) {
        Ok(cli) => cli,
        // Help and version go to stdout with a zero exit.
        Err(err) if !err.use_stderr() => {
            print!("{err}");
            return Ok(());
        }
        Err(err) => return Err(err.to_string()),
    };
    commands::dispatch(&cli.command)
}
