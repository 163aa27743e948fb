//! Rally command-line interface.
//!
//! Runs planner operations from the terminal, or serves them over MCP on
//! stdio with `rally serve`. Logging goes to stderr and is configured with
//! `RUST_LOG`.

mod args;
mod cli;
mod mcp;
mod renderer;

use anyhow::{Context, Result};
use args::{Args, Commands};
use clap::Parser;
use cli::Cli;
use log::info;
use mcp::{run_stdio_server, RallyMcpServer};
use rally_core::{params::ListActivities, PlannerBuilder};
use renderer::TerminalRenderer;
use Commands::*;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let Args {
        database_file,
        no_color,
        question_bank_version,
        command,
    } = Args::parse();

    let planner = PlannerBuilder::new()
        .with_database_path(database_file)
        .with_question_bank_version(question_bank_version)
        .build()
        .await
        .context("Failed to initialize planner")?;

    info!("Rally started");

    let renderer = TerminalRenderer::new(!no_color);

    match command {
        Some(Activity { command }) => {
            Cli::new(planner, renderer)
                .handle_activity_command(command)
                .await
        }
        Some(Participant { command }) => {
            Cli::new(planner, renderer)
                .handle_participant_command(command)
                .await
        }
        Some(Pref { command }) => Cli::new(planner, renderer).handle_pref_command(command).await,
        Some(Plan { command }) => Cli::new(planner, renderer).handle_plan_command(command).await,
        Some(Serve) => {
            info!("Starting Rally MCP server");
            run_stdio_server(RallyMcpServer::new(planner))
                .await
                .context("MCP server failed")
        }
        None => {
            Cli::new(planner, renderer)
                .list_activities(&ListActivities::default())
                .await
        }
    }
}
