//! High-level async API over the chain shift engine.
//!
//! [`Scheduler`] is what applications hold. Each operation opens the SQLite
//! store on a blocking thread, runs one engine call against it and returns
//! plain values for the caller to render or arm.
//!
//! ```text
//! ┌─────────────────┐    ┌─────────────────┐    ┌─────────────────┐
//! │   Scheduler     │    │ ChainShiftEngine│    │  SqliteStore    │
//! │ (async, guards) │───▶│ (plan, apply)   │───▶│  (kv table)     │
//! └─────────────────┘    └─────────────────┘    └─────────────────┘
//! ```
//!
//! Snoozes on the same stack are serialized through a per-stack async mutex,
//! so two rapid taps cannot plan from the same stale chain. Activations also
//! share one scheduler-wide mutex, since step ids are unique across stacks.
//!
//! ```rust
//! use chime_core::{SchedulerBuilder, params::{ActivateStack, Snooze}};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let scheduler = SchedulerBuilder::new()
//!     .with_database_path(Some("/tmp/chime-example.db"))
//!     .build()
//!     .await?;
//!
//! let stack: ActivateStack = serde_json::from_str(r#"{
//!     "stack_id": "morning",
//!     "steps": [
//!         { "id": "wake", "kind": { "type": "timer", "duration_seconds": 0 }, "title": "Wake up" },
//!         { "id": "coffee", "kind": { "type": "relative_to_prev", "offset_seconds": 600 }, "title": "Coffee" }
//!     ]
//! }"#)?;
//! scheduler.activate_stack(&stack).await?;
//!
//! let applied = scheduler
//!     .snooze(&Snooze { step_id: "wake".to_string(), minutes: 5 })
//!     .await?;
//! # Ok(())
//! # }
//! ```

use std::{collections::HashMap, path::PathBuf, sync::Arc};

use jiff::tz::TimeZone;
use tokio::{sync::Mutex, task};

use crate::{
    engine::{ChainShiftEngine, UuidIdGenerator},
    error::{ChimeError, Result},
    repository::KvChainRepository,
    store::SqliteStore,
};

pub mod builder;
pub mod stack_ops;
pub mod step_ops;

#[cfg(test)]
mod tests;

pub use builder::SchedulerBuilder;

type StoreEngine = ChainShiftEngine<KvChainRepository<SqliteStore>, UuidIdGenerator>;

/// Main entry point for activating, snoozing and retiring stacks.
pub struct Scheduler {
    pub(crate) db_path: PathBuf,
    pub(crate) time_zone: TimeZone,
    guards: Mutex<HashMap<String, Arc<Mutex<()>>>>,
    activation: Mutex<()>,
}

impl Scheduler {
    pub(crate) fn new(db_path: PathBuf, time_zone: TimeZone) -> Self {
        Self {
            db_path,
            time_zone,
            guards: Mutex::new(HashMap::new()),
            activation: Mutex::new(()),
        }
    }

    /// Zone fixed-time steps are evaluated in.
    pub fn time_zone(&self) -> &TimeZone {
        &self.time_zone
    }

    pub fn database_path(&self) -> &PathBuf {
        &self.db_path
    }

    /// Runs `operation` against a freshly opened store on the blocking pool.
    pub(crate) async fn run<T, F>(&self, operation: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut StoreEngine) -> Result<T> + Send + 'static,
    {
        let db_path = self.db_path.clone();
        let time_zone = self.time_zone.clone();

        task::spawn_blocking(move || {
            let store = SqliteStore::open(&db_path)?;
            let mut engine =
                ChainShiftEngine::new(KvChainRepository::new(store), UuidIdGenerator, time_zone);
            operation(&mut engine)
        })
        .await
        .map_err(|e| ChimeError::Configuration {
            message: format!("Task join error: {e}"),
        })?
    }

    /// Mutex serializing read-modify-write cycles on one stack.
    pub(crate) async fn stack_guard(&self, stack_id: &str) -> Arc<Mutex<()>> {
        let mut guards = self.guards.lock().await;
        guards
            .entry(stack_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Drops the guard of `stack_id` unless another operation still holds it.
    pub(crate) async fn release_guard(&self, stack_id: &str) {
        let mut guards = self.guards.lock().await;
        if guards
            .get(stack_id)
            .is_some_and(|guard| Arc::strong_count(guard) == 1)
        {
            guards.remove(stack_id);
        }
    }
}
