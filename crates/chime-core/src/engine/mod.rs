//! Chain shift engine: snooze planning and application.
//!
//! A snooze is a two-phase operation. [`ChainShiftEngine::build_plan_for_snooze`]
//! reads the current chain and decides which steps move; [`ChainShiftEngine::apply`]
//! mints replacement ids for those steps and persists the shifted chain.
//!
//! ```text
//!  snooze(S2, 3m)        plan                      apply
//!  ─────────────▶  resolve S2 via mapping  ─▶  S2 → S2'  S3 → S3'
//!                  shift set {S2, S3}          offsets +180s
//!                  S1 and fixed steps stay     snoozeMap[S2] = S2'
//! ```
//!
//! The read-modify-write is not transactional across the two phases. Callers
//! must run at most one snooze per stack at a time; [`crate::Scheduler`]
//! does this with a per-stack guard.

use jiff::{tz::TimeZone, Timestamp};
use serde::{Deserialize, Serialize};

use crate::{models::ScheduledStep, repository::ChainRepository};

mod apply;
pub mod ids;
mod lifecycle;
mod plan;


pub use ids::{IdGenerator, SequentialIdGenerator, UuidIdGenerator};

/// A computed, not-yet-applied description of a snooze.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SnoozePlan {
    pub stack_id: String,

    /// Id the snooze was requested for
    pub base_id: String,

    /// Id currently scheduled for that logical step
    pub resolved_id: String,

    /// Whether the resolved step anchors the chain, moving every step
    pub is_first_step: bool,

    pub delta_seconds: i64,

    /// Ids replaced by this plan, in chain order
    pub replace_ids: Vec<String>,

    /// Anchor after the shift; only set when `is_first_step`
    pub new_first_target: Option<Timestamp>,

    /// Fire instant of the resolved step after the shift
    pub resolved_fire_at: Timestamp,

    /// Instant the plan was built at
    pub now: Timestamp,
}

/// What changed when a plan was applied.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AppliedSnooze {
    pub stack_id: String,

    /// Ids the caller should disarm
    pub removed_ids: Vec<String>,

    /// Newly minted ids with their fire instants, for the caller to arm
    pub added: Vec<ScheduledStep>,

    /// Id now scheduled for the snoozed step
    pub current_id: String,

    pub first_target: Timestamp,
}

/// Orchestrates snoozes and stack lifecycle over a [`ChainRepository`].
pub struct ChainShiftEngine<R, G> {
    repository: R,
    ids: G,
    time_zone: TimeZone,
}

impl<R: ChainRepository, G: IdGenerator> ChainShiftEngine<R, G> {
    pub fn new(repository: R, ids: G, time_zone: TimeZone) -> Self {
        Self {
            repository,
            ids,
            time_zone,
        }
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    pub fn time_zone(&self) -> &TimeZone {
        &self.time_zone
    }

    pub fn into_repository(self) -> R {
        self.repository
    }
}
