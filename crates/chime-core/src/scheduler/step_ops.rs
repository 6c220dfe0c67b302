//! Step operations for the Scheduler.

use jiff::Timestamp;
use log::{info, warn};

use super::Scheduler;
use crate::{
    engine::AppliedSnooze,
    error::{ChimeError, Result},
    models::Step,
    params::{NextFire, Snooze, UpdateStep},
    repository::ChainRepository,
    schedule::next_fire_date,
};

impl Scheduler {
    /// Snoozes a step by `params.minutes`, shifting the rest of its chain.
    ///
    /// `params.step_id` may be the step's original id or any id it has been
    /// rescheduled under. Returns `Ok(None)` when the id no longer resolves
    /// to an active step, so a stale notification action is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`ChimeError::InvalidInput`] for a zero-minute snooze and
    /// [`ChimeError::SnoozeNotAllowed`] if the step has snoozing disabled.
    pub async fn snooze(&self, params: &Snooze) -> Result<Option<AppliedSnooze>> {
        self.snooze_at(params, Timestamp::now()).await
    }

    /// Like [`Scheduler::snooze`], planned at `now`.
    pub async fn snooze_at(
        &self,
        params: &Snooze,
        now: Timestamp,
    ) -> Result<Option<AppliedSnooze>> {
        if params.minutes == 0 {
            return Err(ChimeError::invalid_input("minutes")
                .with_reason("Snooze duration must be positive"));
        }

        let step_id = params.step_id.clone();
        let lookup_id = step_id.clone();
        let Some(location) = self
            .run(move |engine| engine.repository().locate_step(&lookup_id))
            .await?
        else {
            warn!("Ignoring snooze for inactive step '{step_id}'");
            return Ok(None);
        };

        let guard = self.stack_guard(&location.stack_id).await;
        let _held = guard.lock().await;

        let minutes = params.minutes;
        let applied = self
            .run(move |engine| {
                let Some(plan) = engine.build_plan_for_snooze(&step_id, minutes, now)? else {
                    return Ok(None);
                };
                let allowed = engine
                    .load_chain(&plan.stack_id)?
                    .and_then(|chain| chain.step(&plan.resolved_id).map(|s| s.allow_snooze))
                    .unwrap_or(false);
                if !allowed {
                    return Err(ChimeError::SnoozeNotAllowed {
                        id: plan.resolved_id.clone(),
                    });
                }
                engine.apply(&plan).map(Some)
            })
            .await?;

        if let Some(applied) = &applied {
            info!(
                "Snooze of '{}' armed {} replacement(s)",
                params.step_id,
                applied.added.len()
            );
        }
        Ok(applied)
    }

    /// Edits an active step's snooze flag or display fields.
    pub async fn update_step(&self, params: &UpdateStep) -> Result<Option<Step>> {
        let lookup_id = params.id.clone();
        let Some(location) = self
            .run(move |engine| engine.repository().locate_step(&lookup_id))
            .await?
        else {
            return Ok(None);
        };

        let guard = self.stack_guard(&location.stack_id).await;
        let _held = guard.lock().await;

        let params = params.clone();
        self.run(move |engine| engine.update_step(&params)).await
    }

    /// Computes a one-off fire instant without touching any stack.
    pub fn next_fire(&self, params: &NextFire) -> Result<Timestamp> {
        params
            .kind
            .validate()
            .map_err(|reason| ChimeError::invalid_input("kind").with_reason(reason))?;
        let base = params.base.unwrap_or_else(Timestamp::now);
        next_fire_date(&params.kind, base, &self.time_zone)
    }
}
