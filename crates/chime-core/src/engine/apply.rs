//! Snooze application.

use jiff::SignedDuration;
use log::info;

use super::{AppliedSnooze, ChainShiftEngine, IdGenerator, SnoozePlan};
use crate::{
    error::{ChimeError, Result},
    models::ScheduledStep,
    repository::ChainRepository,
};

impl<R: ChainRepository, G: IdGenerator> ChainShiftEngine<R, G> {
    /// Applies `plan`: mints a new id for every replaced step, shifts it, and
    /// persists the chain with the old ids removed.
    ///
    /// Each plan must be applied at most once; building a fresh plan from
    /// current state is the only safe way to snooze again. Applying a plan
    /// whose ids were already replaced fails with
    /// [`ChimeError::StepNotFound`].
    pub fn apply(&mut self, plan: &SnoozePlan) -> Result<AppliedSnooze> {
        let mut chain = self
            .repository
            .load_chain(&plan.stack_id)?
            .ok_or_else(|| ChimeError::StackNotFound {
                id: plan.stack_id.clone(),
            })?;

        if let Some(missing) = plan
            .replace_ids
            .iter()
            .find(|id| chain.step(id).is_none())
        {
            return Err(ChimeError::StepNotFound {
                id: missing.clone(),
            });
        }

        let mut removed_ids = Vec::with_capacity(plan.replace_ids.len());
        let mut minted_ids = Vec::with_capacity(plan.replace_ids.len());
        let mut current_id = plan.resolved_id.clone();
        for step in chain
            .steps
            .iter_mut()
            .filter(|step| plan.replace_ids.contains(&step.id))
        {
            let new_id = self.ids.mint(&step.base_id);
            let old_id = std::mem::replace(&mut step.id, new_id);

            if let Some(offset) = step.chain_offset() {
                step.offset_from_first = Some(offset + plan.delta_seconds);
            }
            if old_id == plan.resolved_id {
                if step.is_fixed() {
                    step.snoozed_until = Some(plan.resolved_fire_at);
                }
                current_id = step.id.clone();
            }
            minted_ids.push(step.id.clone());
            removed_ids.push(old_id);
        }

        if let Some(first_target) = plan.new_first_target {
            chain.first_target = first_target;
            chain.anchor_offset += plan.delta_seconds;
        }
        chain.validate_order()?;

        self.repository.save_chain(&chain, &removed_ids)?;

        let added = chain
            .steps
            .iter()
            .filter(|step| minted_ids.contains(&step.id))
            .map(|step| {
                Ok(ScheduledStep {
                    id: step.id.clone(),
                    base_id: step.base_id.clone(),
                    title: step.metadata.title.clone(),
                    fire_at: chain.fire_time(step, plan.now, &self.time_zone)?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        info!(
            "Snoozed '{}' in stack '{}' by {}: replaced {} step(s)",
            plan.base_id,
            plan.stack_id,
            SignedDuration::from_secs(plan.delta_seconds),
            removed_ids.len()
        );

        Ok(AppliedSnooze {
            stack_id: chain.stack_id.clone(),
            removed_ids,
            added,
            current_id,
            first_target: chain.first_target,
        })
    }
}
