//! Core library for the Chime alarm stack scheduler.
//!
//! A *stack* is an ordered chain of alarm steps. Snoozing one step pushes it
//! and every later step back by the snooze duration; snoozing the leading
//! step moves the whole chain. Fixed-time steps keep their wall-clock time.
//!
//! # Layers
//!
//! - [`schedule`]: pure next-fire-date computation per [`models::StepKind`]
//! - [`store`]: typed flat key-value storage (in-memory or SQLite)
//! - [`repository`]: chain ⇄ key encoding over a store, using [`keys`]
//! - [`engine`]: snooze planning/application and stack lifecycle
//! - [`scheduler`]: async facade used by applications
//! - [`display`]: markdown rendering of models and results
//!
//! # Quick Start
//!
//! ```rust
//! use chime_core::{SchedulerBuilder, params::Id};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let scheduler = SchedulerBuilder::new()
//!     .with_database_path(Some("chime.db"))
//!     .build()
//!     .await?;
//!
//! for stack_id in scheduler.list_stacks().await? {
//!     if let Some(chain) = scheduler.show_stack(&Id { id: stack_id }).await? {
//!         println!("{chain}");
//!     }
//! }
//! # Ok(())
//! # }
//! ```

pub mod display;
pub mod engine;
pub mod error;
pub mod keys;
pub mod models;
pub mod params;
pub mod repository;
pub mod schedule;
pub mod scheduler;
pub mod store;

pub use display::{
    CreateResult, LocalDateTime, OperationStatus, RetireResult, Schedule, SnoozeResult, StackIds,
    UpdateResult,
};
pub use engine::{AppliedSnooze, ChainShiftEngine, SnoozePlan};
pub use error::{ChimeError, Result};
pub use models::{Chain, ScheduledStep, Step, StepKind, StepMetadata};
pub use params::{ActivateStack, Id, NextFire, Snooze, StepDefinition, UpdateStep};
pub use repository::{ChainRepository, KvChainRepository};
pub use schedule::next_fire_date;
pub use scheduler::{Scheduler, SchedulerBuilder};
pub use store::{KeyValueStore, MemoryStore, SqliteStore};
