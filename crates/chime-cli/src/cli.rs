//! Command definitions and handlers.
//!
//! Argument structs carry the clap derives and convert into the
//! interface-agnostic parameter types of `chime_core::params`:
//!
//! ```text
//! User Input → CLI Args (clap) → Core Params → Scheduler
//! ```

use std::{fs, path::PathBuf};

use anyhow::{Context, Result};
use chime_core::{
    display::{
        CreateResult, OperationStatus, RetireResult, Schedule, SnoozeResult, StackIds,
        UpdateResult,
    },
    params::{ActivateStack, Id, NextFire, Snooze, UpdateStep},
    LocalDateTime, Scheduler, StepKind,
};
use clap::{Args, Subcommand};
use jiff::Timestamp;
use log::debug;

use crate::renderer::TerminalRenderer;

/// Activate a stack from a JSON definition file
#[derive(Args)]
pub struct ActivateStackArgs {
    #[arg(help = "Path to a JSON stack definition")]
    pub file: PathBuf,
    #[arg(
        long,
        help = "Base instant of the first step (RFC 3339); overrides the file, defaults to now"
    )]
    pub start: Option<Timestamp>,
}

/// Show the steps and upcoming fire times of a stack
#[derive(Args)]
pub struct ShowStackArgs {
    #[arg(help = "Id of the stack to show")]
    pub id: String,
}

impl From<ShowStackArgs> for Id {
    fn from(val: ShowStackArgs) -> Self {
        Id { id: val.id }
    }
}

/// Retire a stack, releasing all of its scheduled steps
#[derive(Args)]
pub struct RetireStackArgs {
    #[arg(help = "Id of the stack to retire")]
    pub id: String,
}

impl From<RetireStackArgs> for Id {
    fn from(val: RetireStackArgs) -> Self {
        Id { id: val.id }
    }
}

#[derive(Subcommand)]
pub enum StackCommands {
    /// Activate a stack from a JSON definition file
    #[command(alias = "a")]
    Activate(ActivateStackArgs),
    /// List active stacks
    #[command(alias = "l")]
    List,
    /// Show a stack and its upcoming fire times
    #[command(alias = "s")]
    Show(ShowStackArgs),
    /// Retire a stack
    #[command(alias = "r")]
    Retire(RetireStackArgs),
}

/// Snooze a step, shifting every later step of its stack
#[derive(Args)]
pub struct SnoozeArgs {
    #[arg(help = "Original or current id of the step")]
    pub id: String,
    #[arg(short, long, default_value_t = 9, help = "Minutes to snooze by")]
    pub minutes: u32,
}

impl From<SnoozeArgs> for Snooze {
    fn from(val: SnoozeArgs) -> Self {
        Snooze {
            step_id: val.id,
            minutes: val.minutes,
        }
    }
}

/// Edit a step's snooze flag or display fields
#[derive(Args)]
pub struct UpdateStepArgs {
    #[arg(help = "Original or current id of the step")]
    pub id: String,
    #[arg(long, help = "Whether the step may be snoozed")]
    pub allow_snooze: Option<bool>,
    #[arg(short, long, help = "New title")]
    pub title: Option<String>,
    #[arg(long, conflicts_with = "clear_sound", help = "Sound to play")]
    pub sound: Option<String>,
    #[arg(long, help = "Remove the sound")]
    pub clear_sound: bool,
    #[arg(long, conflicts_with = "clear_accent", help = "Accent color, e.g. #FFAA00")]
    pub accent: Option<String>,
    #[arg(long, help = "Remove the accent color")]
    pub clear_accent: bool,
}

/// `Some(None)` clears a field, `Some(Some(_))` sets it.
fn optional_field(value: Option<String>, clear: bool) -> Option<Option<String>> {
    if clear {
        Some(None)
    } else {
        value.map(Some)
    }
}

impl From<UpdateStepArgs> for UpdateStep {
    fn from(val: UpdateStepArgs) -> Self {
        UpdateStep {
            id: val.id,
            allow_snooze: val.allow_snooze,
            title: val.title,
            sound_name: optional_field(val.sound, val.clear_sound),
            accent_hex: optional_field(val.accent, val.clear_accent),
        }
    }
}

#[derive(Subcommand)]
pub enum StepCommands {
    /// Snooze a step
    #[command(alias = "z")]
    Snooze(SnoozeArgs),
    /// Edit a step
    #[command(alias = "u")]
    Update(UpdateStepArgs),
}

/// Compute when a step kind would next fire
#[derive(Args)]
pub struct NextFireArgs {
    #[arg(help = "Step kind: timer:<secs>[/<n>d], relative:<secs> or fixed:HH:MM[@1,..,7]")]
    pub kind: StepKind,
    #[arg(long, help = "Base instant (RFC 3339); defaults to now")]
    pub base: Option<Timestamp>,
}

impl From<NextFireArgs> for NextFire {
    fn from(val: NextFireArgs) -> Self {
        NextFire {
            kind: val.kind,
            base: val.base,
        }
    }
}

/// Runs commands against a scheduler and renders their results.
pub struct Cli {
    scheduler: Scheduler,
    renderer: TerminalRenderer,
}

impl Cli {
    pub fn new(scheduler: Scheduler, renderer: TerminalRenderer) -> Self {
        Self {
            scheduler,
            renderer,
        }
    }

    pub async fn handle_stack_command(&self, command: StackCommands) -> Result<()> {
        match command {
            StackCommands::Activate(args) => self.activate_stack(args).await,
            StackCommands::List => self.list_stacks().await,
            StackCommands::Show(args) => self.show_stack(&args.into()).await,
            StackCommands::Retire(args) => self.retire_stack(&args.into()).await,
        }
    }

    pub async fn handle_step_command(&self, command: StepCommands) -> Result<()> {
        match command {
            StepCommands::Snooze(args) => self.snooze(&args.into()).await,
            StepCommands::Update(args) => self.update_step(args.into()).await,
        }
    }

    pub async fn list_stacks(&self) -> Result<()> {
        let stacks = self
            .scheduler
            .list_stacks()
            .await
            .context("Failed to list stacks")?;
        self.renderer.render(&StackIds(stacks).to_string())
    }

    async fn activate_stack(&self, args: ActivateStackArgs) -> Result<()> {
        let raw = fs::read_to_string(&args.file)
            .with_context(|| format!("Failed to read {}", args.file.display()))?;
        let mut params: ActivateStack = serde_json::from_str(&raw)
            .with_context(|| format!("Invalid stack definition in {}", args.file.display()))?;
        if args.start.is_some() {
            params.start = args.start;
        }
        debug!("Activating '{}' from {}", params.stack_id, args.file.display());

        let chain = self
            .scheduler
            .activate_stack(&params)
            .await
            .context("Failed to activate stack")?;
        let now = params.start.unwrap_or_else(Timestamp::now);
        let schedule = chain.schedule(now, self.scheduler.time_zone())?;

        self.renderer.render(&CreateResult::new(chain).to_string())?;
        self.renderer
            .render(&Schedule::new(&schedule, self.scheduler.time_zone()).to_string())
    }

    async fn show_stack(&self, params: &Id) -> Result<()> {
        let Some(chain) = self.scheduler.show_stack(params).await? else {
            return self
                .renderer
                .render(&OperationStatus::not_found("stack", &params.id).to_string());
        };
        let schedule = chain.schedule(Timestamp::now(), self.scheduler.time_zone())?;

        self.renderer.render(&chain.to_string())?;
        self.renderer.render("## Upcoming\n\n")?;
        self.renderer
            .render(&Schedule::new(&schedule, self.scheduler.time_zone()).to_string())
    }

    async fn retire_stack(&self, params: &Id) -> Result<()> {
        let output = match self.scheduler.retire_stack(params).await? {
            Some(removed_ids) => RetireResult {
                stack_id: params.id.clone(),
                removed_ids,
            }
            .to_string(),
            None => OperationStatus::not_found("stack", &params.id).to_string(),
        };
        self.renderer.render(&output)
    }

    async fn snooze(&self, params: &Snooze) -> Result<()> {
        let output = match self
            .scheduler
            .snooze(params)
            .await
            .context("Failed to snooze step")?
        {
            Some(applied) => SnoozeResult::new(&applied, self.scheduler.time_zone()).to_string(),
            None => OperationStatus::not_found("step", &params.step_id).to_string(),
        };
        self.renderer.render(&output)
    }

    async fn update_step(&self, params: UpdateStep) -> Result<()> {
        let mut changes = Vec::new();
        if let Some(allow) = params.allow_snooze {
            changes.push(format!("Snooze {}", if allow { "allowed" } else { "disabled" }));
        }
        if params.title.is_some() {
            changes.push("Updated title".to_string());
        }
        if let Some(sound) = &params.sound_name {
            let change = if sound.is_some() { "Updated sound" } else { "Removed sound" };
            changes.push(change.to_string());
        }
        if let Some(accent) = &params.accent_hex {
            let change = if accent.is_some() { "Updated accent" } else { "Removed accent" };
            changes.push(change.to_string());
        }

        let output = match self
            .scheduler
            .update_step(&params)
            .await
            .context("Failed to update step")?
        {
            Some(step) => UpdateResult::with_changes(step, changes).to_string(),
            None => OperationStatus::not_found("step", &params.id).to_string(),
        };
        self.renderer.render(&output)
    }

    pub fn next_fire(&self, args: NextFireArgs) -> Result<()> {
        let params = NextFire::from(args);
        let kind = params.kind.clone();
        let fire = self.scheduler.next_fire(&params)?;
        self.renderer.render(&format!(
            "- `{kind}` fires at {}\n",
            LocalDateTime::new(&fire, self.scheduler.time_zone())
        ))
    }
}
