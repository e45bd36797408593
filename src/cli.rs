//! CLI argument definitions.

use clap::{Parser, Subcommand};

use crate::model::TestFormat;

/// Top-level CLI parser for `testloom`.
#[derive(Debug, Parser)]
#[command(name = "testloom", version, about = "Record page interactions and synthesize test artifacts")]
pub struct Cli {
    /// The command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported top-level subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Record a session on a target URL, then synthesize artifacts.
    Record {
        /// URL to open in the capture surface.
        url: String,
        /// Owning user id.
        #[arg(long)]
        user: String,
        /// Artifact format: pytest, selenium_bdd, or gherkin.
        #[arg(long, default_value = "gherkin")]
        format: TestFormat,
        /// Maximum recording duration in seconds.
        #[arg(long, default_value_t = 60)]
        duration: u64,
    },
    /// Synthesize artifacts from a previously recorded session.
    Generate {
        /// Session id to synthesize from.
        #[arg(long)]
        session: String,
        /// Owning user id.
        #[arg(long)]
        user: String,
        /// Artifact format: pytest, selenium_bdd, or gherkin.
        #[arg(long, default_value = "gherkin")]
        format: TestFormat,
        /// Extra requirements passed through to generation.
        #[arg(long)]
        spec: Option<String>,
    },
    /// List recorded sessions for a user.
    Sessions {
        /// Owning user id.
        #[arg(long)]
        user: String,
    },
}
