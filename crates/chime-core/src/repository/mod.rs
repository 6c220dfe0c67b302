//! Structured access to stacks persisted in a flat key-value store.
//!
//! The engine never touches store keys directly: it loads a [`Chain`], works
//! on the value, and hands the result back through [`ChainRepository`]. The
//! flat-key encoding lives in [`kv::KvChainRepository`].

use crate::{error::Result, models::Chain};

pub mod kv;

pub use kv::KvChainRepository;

/// Where a step id currently lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepLocation {
    pub stack_id: String,
    /// Id currently scheduled for the logical step
    pub current_id: String,
}

/// Load/save boundary for alarm chains.
pub trait ChainRepository {
    /// Resolves `step_id` through the snooze mapping and returns the owning
    /// stack together with the id currently scheduled for that step.
    fn locate_step(&self, step_id: &str) -> Result<Option<StepLocation>>;

    fn load_chain(&self, stack_id: &str) -> Result<Option<Chain>>;

    /// Persists `chain` and deletes every key of `retired_ids`.
    fn save_chain(&mut self, chain: &Chain, retired_ids: &[String]) -> Result<()>;

    /// Removes the chain, its steps and their snooze mappings.
    fn delete_chain(&mut self, stack_id: &str) -> Result<Option<Chain>>;

    fn list_stacks(&self) -> Result<Vec<String>>;
}
