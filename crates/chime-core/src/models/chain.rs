//! Chain (stack) value object.

use jiff::{tz::TimeZone, SignedDuration, Timestamp};
use serde::{Deserialize, Serialize};

use super::Step;
use crate::{
    error::{ChimeError, Result, ScheduleResultExt},
    schedule::next_fire_date,
};

/// An ordered chain of steps sharing one anchor instant.
///
/// A non-fixed step fires at `first_target + (offset_from_first -
/// anchor_offset)`. Fixed-time steps ignore the anchor and fire at their own
/// wall-clock time, or at `snoozed_until` while that snooze is pending.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Chain {
    pub stack_id: String,

    /// Fire instant of the lead non-fixed step
    pub first_target: Timestamp,

    /// Offset value `first_target` corresponds to
    pub anchor_offset: i64,

    /// Active steps in chain order
    pub steps: Vec<Step>,
}

/// A step together with its computed next fire instant.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScheduledStep {
    pub id: String,
    pub base_id: String,
    pub title: String,
    pub fire_at: Timestamp,
}

impl Chain {
    pub fn step(&self, id: &str) -> Option<&Step> {
        self.steps.iter().find(|step| step.id == id)
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.steps.iter().position(|step| step.id == id)
    }

    pub fn active_ids(&self) -> Vec<String> {
        self.steps.iter().map(|step| step.id.clone()).collect()
    }

    /// Smallest offset among non-fixed steps.
    pub fn lead_offset(&self) -> Option<i64> {
        self.steps.iter().filter_map(Step::chain_offset).min()
    }

    /// Instant at which a non-fixed step with `offset` fires.
    pub fn anchored_fire_time(&self, offset: i64) -> Result<Timestamp> {
        self.first_target
            .checked_add(SignedDuration::from_secs(offset - self.anchor_offset))
            .schedule_context("Failed to offset anchor")
    }

    /// Next fire instant of `step`, evaluating fixed-time steps against `now`.
    pub fn fire_time(&self, step: &Step, now: Timestamp, time_zone: &TimeZone) -> Result<Timestamp> {
        if let Some(until) = step.pending_snooze(now) {
            return Ok(until);
        }
        if step.is_fixed() {
            return next_fire_date(&step.kind, now, time_zone);
        }
        let offset = step.offset_from_first.ok_or_else(|| {
            ChimeError::scheduling(format!("Step '{}' has no chain offset", step.id))
        })?;
        self.anchored_fire_time(offset)
    }

    /// Every active step with its next fire instant, in chain order.
    pub fn schedule(&self, now: Timestamp, time_zone: &TimeZone) -> Result<Vec<ScheduledStep>> {
        self.steps
            .iter()
            .map(|step| {
                Ok(ScheduledStep {
                    id: step.id.clone(),
                    base_id: step.base_id.clone(),
                    title: step.metadata.title.clone(),
                    fire_at: self.fire_time(step, now, time_zone)?,
                })
            })
            .collect()
    }

    /// Checks that non-fixed offsets never decrease along the chain.
    pub fn validate_order(&self) -> Result<()> {
        let mut previous: Option<i64> = None;
        for step in &self.steps {
            let Some(offset) = step.chain_offset() else {
                continue;
            };
            if let Some(prev) = previous {
                if offset < prev {
                    return Err(ChimeError::invalid_input("steps").with_reason(format!(
                        "Step '{}' fires before the step preceding it in the chain",
                        step.id
                    )));
                }
            }
            previous = Some(offset);
        }
        Ok(())
    }
}
