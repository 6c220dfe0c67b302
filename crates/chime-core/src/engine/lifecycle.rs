//! Stack activation, editing and retirement.

use std::collections::HashSet;

use jiff::Timestamp;
use log::info;

use super::{ChainShiftEngine, IdGenerator};
use crate::{
    error::{ChimeError, Result},
    models::{Chain, ScheduledStep, Step},
    params::{StepDefinition, UpdateStep},
    repository::ChainRepository,
    schedule::next_fire_date,
};

impl<R: ChainRepository, G: IdGenerator> ChainShiftEngine<R, G> {
    /// Authors and persists a new stack.
    ///
    /// Fire times are chained: the first step is based on `start`, every
    /// later step on the fire time of the step before it. The anchor is the
    /// fire time of the first non-fixed step (or `start` if every step is
    /// fixed-time) and each non-fixed step's offset is measured from it.
    ///
    /// # Errors
    ///
    /// Returns [`ChimeError::InvalidInput`] for an empty or duplicate id, an
    /// out-of-range kind, a stack that is already active, or a non-fixed step
    /// that would fire before the non-fixed step preceding it.
    pub fn activate(
        &mut self,
        stack_id: &str,
        start: Timestamp,
        definitions: &[StepDefinition],
    ) -> Result<Chain> {
        if stack_id.trim().is_empty() {
            return Err(ChimeError::invalid_input("stack_id").with_reason("Stack id is empty"));
        }
        if definitions.is_empty() {
            return Err(ChimeError::invalid_input("steps").with_reason("A stack needs at least one step"));
        }
        if self.repository.load_chain(stack_id)?.is_some() {
            return Err(ChimeError::invalid_input("stack_id")
                .with_reason(format!("Stack '{stack_id}' is already active")));
        }

        let mut seen = HashSet::new();
        for definition in definitions {
            if definition.id.trim().is_empty() {
                return Err(ChimeError::invalid_input("id").with_reason("Step id is empty"));
            }
            if !seen.insert(definition.id.as_str()) {
                return Err(ChimeError::invalid_input("id")
                    .with_reason(format!("Duplicate step id '{}'", definition.id)));
            }
            definition
                .kind
                .validate()
                .map_err(|reason| ChimeError::invalid_input("kind").with_reason(reason))?;
            if self.repository.locate_step(&definition.id)?.is_some() {
                return Err(ChimeError::invalid_input("id").with_reason(format!(
                    "Step '{}' already belongs to an active stack",
                    definition.id
                )));
            }
        }

        let mut fire_times = Vec::with_capacity(definitions.len());
        let mut base = start;
        for definition in definitions {
            base = next_fire_date(&definition.kind, base, &self.time_zone)?;
            fire_times.push(base);
        }

        let first_target = definitions
            .iter()
            .zip(&fire_times)
            .find(|(definition, _)| !definition.kind.is_fixed())
            .map_or(start, |(_, fire)| *fire);

        let steps = definitions
            .iter()
            .zip(&fire_times)
            .map(|(definition, fire)| Step {
                id: definition.id.clone(),
                base_id: definition.id.clone(),
                kind: definition.kind.clone(),
                offset_from_first: (!definition.kind.is_fixed())
                    .then(|| fire.duration_since(first_target).as_secs()),
                snoozed_until: None,
                allow_snooze: definition.allow_snooze,
                metadata: definition.metadata.clone(),
            })
            .collect();

        let chain = Chain {
            stack_id: stack_id.to_string(),
            first_target,
            anchor_offset: 0,
            steps,
        };
        chain.validate_order()?;

        self.repository.save_chain(&chain, &[])?;
        info!(
            "Activated stack '{stack_id}' with {} step(s), anchored at {first_target}",
            chain.steps.len()
        );
        Ok(chain)
    }

    /// Edits the snooze flag and display fields of an active step.
    ///
    /// Returns the updated step, or `None` if `params.id` does not resolve to
    /// an active step.
    pub fn update_step(&mut self, params: &UpdateStep) -> Result<Option<Step>> {
        let Some(location) = self.repository.locate_step(&params.id)? else {
            return Ok(None);
        };
        let Some(mut chain) = self.repository.load_chain(&location.stack_id)? else {
            return Ok(None);
        };
        let Some(step) = chain
            .steps
            .iter_mut()
            .find(|step| step.id == location.current_id)
        else {
            return Ok(None);
        };

        if let Some(allow_snooze) = params.allow_snooze {
            step.allow_snooze = allow_snooze;
        }
        if let Some(title) = &params.title {
            step.metadata.title = title.clone();
        }
        if let Some(sound_name) = &params.sound_name {
            step.metadata.sound_name = sound_name.clone();
        }
        if let Some(accent_hex) = &params.accent_hex {
            step.metadata.accent_hex = accent_hex.clone();
        }
        let updated = step.clone();

        self.repository.save_chain(&chain, &[])?;
        Ok(Some(updated))
    }

    /// Tears down a stack. Returns the ids the caller should disarm.
    pub fn retire(&mut self, stack_id: &str) -> Result<Option<Vec<String>>> {
        let retired = self.repository.delete_chain(stack_id)?;
        if let Some(chain) = &retired {
            info!("Retired stack '{stack_id}' ({} step(s))", chain.steps.len());
        }
        Ok(retired.map(|chain| chain.active_ids()))
    }

    pub fn load_chain(&self, stack_id: &str) -> Result<Option<Chain>> {
        self.repository.load_chain(stack_id)
    }

    pub fn list_stacks(&self) -> Result<Vec<String>> {
        self.repository.list_stacks()
    }

    /// Next fire instant of every active step of a stack.
    pub fn schedule(&self, stack_id: &str, now: Timestamp) -> Result<Option<Vec<ScheduledStep>>> {
        self.repository
            .load_chain(stack_id)?
            .map(|chain| chain.schedule(now, &self.time_zone))
            .transpose()
    }
}
