//! Chime CLI Application
//!
//! Command-line interface for activating, snoozing and retiring alarm stacks.

mod args;
mod cli;
mod renderer;

use anyhow::{Context, Result};
use args::{Args, Commands};
use chime_core::SchedulerBuilder;
use clap::Parser;
use cli::Cli;
use jiff::tz::TimeZone;
use log::info;
use renderer::TerminalRenderer;
use Commands::*;

fn resolve_time_zone(name: &str) -> Result<TimeZone> {
    if name.eq_ignore_ascii_case("UTC") {
        return Ok(TimeZone::UTC);
    }
    TimeZone::get(name).with_context(|| format!("Unknown time zone '{name}'"))
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let Args {
        database_file,
        time_zone,
        no_color,
        command,
    } = Args::parse();

    let mut builder = SchedulerBuilder::new().with_database_path(database_file);
    if let Some(name) = time_zone {
        builder = builder.with_time_zone(resolve_time_zone(&name)?);
    }
    let scheduler = builder
        .build()
        .await
        .context("Failed to initialize scheduler")?;

    let cli = Cli::new(scheduler, TerminalRenderer::new(!no_color));

    info!("Chime started");

    match command {
        Some(Stack { command }) => cli.handle_stack_command(command).await,
        Some(Step { command }) => cli.handle_step_command(command).await,
        Some(Next(args)) => cli.next_fire(args),
        None => cli.list_stacks().await,
    }
}
