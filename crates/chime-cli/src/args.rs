use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::cli::{NextFireArgs, StackCommands, StepCommands};

/// Chained alarm stacks with snooze propagation
///
/// A stack is an ordered chain of alarm steps. Snoozing a step pushes it and
/// every later step back; snoozing the first step moves the whole chain.
/// Fixed-time steps always keep their wall-clock time.
#[derive(Parser)]
#[command(version, about, name = "chime")]
pub struct Args {
    /// Path to the SQLite database file. Defaults to
    /// $XDG_DATA_HOME/chime/chime.db
    #[arg(long, global = true)]
    pub database_file: Option<PathBuf>,

    /// IANA time zone fixed-time steps are evaluated in. Defaults to the
    /// system zone
    #[arg(long, global = true)]
    pub time_zone: Option<String>,

    /// Disable colored output and use plain text
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands. Without one, active stacks are listed.
#[derive(Subcommand)]
pub enum Commands {
    /// Manage alarm stacks
    #[command(alias = "k")]
    Stack {
        #[command(subcommand)]
        command: StackCommands,
    },
    /// Snooze or edit individual steps
    #[command(alias = "s")]
    Step {
        #[command(subcommand)]
        command: StepCommands,
    },
    /// Compute when a step kind would next fire
    #[command(alias = "n")]
    Next(NextFireArgs),
}
