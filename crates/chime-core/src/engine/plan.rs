//! Snooze planning.

use jiff::{SignedDuration, Timestamp};
use log::debug;

use super::{ChainShiftEngine, IdGenerator, SnoozePlan};
use crate::{
    error::{ChimeError, Result, ScheduleResultExt},
    repository::ChainRepository,
};

impl<R: ChainRepository, G: IdGenerator> ChainShiftEngine<R, G> {
    /// Builds the shift plan for snoozing `base_id` by `snooze_minutes`.
    ///
    /// `now` is read once by the caller and used for every comparison made
    /// while building this plan.
    ///
    /// Returns `Ok(None)` when `base_id` does not resolve to an active step
    /// (unknown id, already replaced and forgotten, or retired stack).
    ///
    /// # Errors
    ///
    /// Returns [`ChimeError::InvalidInput`] for a zero snooze, or a store /
    /// scheduling error while reading the chain.
    pub fn build_plan_for_snooze(
        &self,
        base_id: &str,
        snooze_minutes: u32,
        now: Timestamp,
    ) -> Result<Option<SnoozePlan>> {
        if snooze_minutes == 0 {
            return Err(ChimeError::invalid_input("snooze_minutes")
                .with_reason("Snooze duration must be positive"));
        }

        let Some(location) = self.repository.locate_step(base_id)? else {
            debug!("Snooze target '{base_id}' is not scheduled");
            return Ok(None);
        };
        let Some(chain) = self.repository.load_chain(&location.stack_id)? else {
            debug!("Stack '{}' is retired", location.stack_id);
            return Ok(None);
        };
        let (Some(resolved_position), Some(resolved)) = (
            chain.position(&location.current_id),
            chain.step(&location.current_id),
        ) else {
            debug!("Step '{}' is no longer active", location.current_id);
            return Ok(None);
        };

        let delta_seconds = i64::from(snooze_minutes) * 60;
        let delta = SignedDuration::from_secs(delta_seconds);

        let resolved_offset = resolved.chain_offset();
        let is_first_step = match (resolved_offset, chain.lead_offset()) {
            (Some(offset), Some(lead)) => offset == lead,
            _ => false,
        };

        let replace_ids = chain
            .steps
            .iter()
            .enumerate()
            .filter(|(position, step)| {
                if step.id == resolved.id {
                    return true;
                }
                let Some(offset) = step.chain_offset() else {
                    return false;
                };
                match resolved_offset {
                    _ if is_first_step => true,
                    // Equal offsets after the resolved step move with it so
                    // the chain stays ordered.
                    Some(resolved_offset) => {
                        offset > resolved_offset
                            || (offset == resolved_offset && *position > resolved_position)
                    }
                    None => *position > resolved_position,
                }
            })
            .map(|(_, step)| step.id.clone())
            .collect();

        // A fixed step moves from its own next occurrence, not from `now`.
        let resolved_fire_at = chain
            .fire_time(resolved, now, &self.time_zone)?
            .checked_add(delta)
            .schedule_context("Snoozed fire time out of range")?;

        let new_first_target = if is_first_step {
            Some(
                chain
                    .first_target
                    .checked_add(delta)
                    .schedule_context("Snoozed anchor out of range")?,
            )
        } else {
            None
        };

        let plan = SnoozePlan {
            stack_id: chain.stack_id.clone(),
            base_id: base_id.to_string(),
            resolved_id: resolved.id.clone(),
            is_first_step,
            delta_seconds,
            replace_ids,
            new_first_target,
            resolved_fire_at,
            now,
        };
        debug!(
            "Planned snooze of '{}' in '{}': first={} replace={:?}",
            plan.resolved_id, plan.stack_id, plan.is_first_step, plan.replace_ids
        );
        Ok(Some(plan))
    }
}
