use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::cli::{ActivityCommands, ParticipantCommands, PlanCommands, PrefCommands};

/// Command-line interface for Rally, a group activity planner
///
/// Rally gathers preferences from everyone taking part in an activity,
/// combines them into one group profile and drafts a timed plan that the
/// group can revise, approve and finalize. It can also run as an MCP
/// (Model Context Protocol) server so AI assistants can drive the same
/// workflow.
#[derive(Parser)]
#[command(version, about, name = "rally")]
pub struct Args {
    /// Path to the SQLite database file. Defaults to
    /// $XDG_DATA_HOME/rally/rally.db
    #[arg(long, global = true)]
    pub database_file: Option<PathBuf>,

    /// Disable colored output and use plain text
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Questionnaire version to serve. Defaults to the latest
    #[arg(long, global = true)]
    pub question_bank_version: Option<u32>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands for the Rally CLI
///
/// - `activity`: create and manage activities
/// - `participant`: invite participants and collect questionnaire answers
/// - `pref`: record and inspect individual preferences
/// - `plan`: generate, revise, approve and finalize plans
/// - `serve`: start the MCP server
#[derive(Subcommand)]
pub enum Commands {
    /// Manage activities
    #[command(alias = "a")]
    Activity {
        #[command(subcommand)]
        command: ActivityCommands,
    },
    /// Manage participants and their questionnaires
    #[command(alias = "pa")]
    Participant {
        #[command(subcommand)]
        command: ParticipantCommands,
    },
    /// Record and inspect preferences
    Pref {
        #[command(subcommand)]
        command: PrefCommands,
    },
    /// Generate and manage plans
    #[command(alias = "p")]
    Plan {
        #[command(subcommand)]
        command: PlanCommands,
    },
    /// Start the MCP server
    Serve,
}
