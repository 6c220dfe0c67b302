//! Flat-key adapter between [`Chain`] values and a [`KeyValueStore`].

use jiff::Timestamp;
use log::warn;

use super::{ChainRepository, StepLocation};
use crate::{
    error::{ChimeError, Result, ScheduleResultExt},
    keys,
    models::{Chain, Step, StepKind, StepMetadata},
    store::KeyValueStore,
};

/// [`ChainRepository`] backed by any [`KeyValueStore`].
pub struct KvChainRepository<S> {
    store: S,
}

impl<S: KeyValueStore> KvChainRepository<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_inner(self) -> S {
        self.store
    }

    fn load_step(&self, step_id: &str) -> Result<Option<Step>> {
        let Some(raw_kind) = self.store.get_string(&keys::kind(step_id))? else {
            return Ok(None);
        };
        let kind = raw_kind
            .parse::<StepKind>()
            .map_err(|reason| ChimeError::invalid_input("kind").with_reason(reason))?;

        let snoozed_until = self
            .store
            .get_int(&keys::snoozed_until(step_id))?
            .map(Timestamp::from_second)
            .transpose()
            .schedule_context("Stored snooze instant out of range")?;

        Ok(Some(Step {
            id: step_id.to_string(),
            base_id: self
                .store
                .get_string(&keys::base_id(step_id))?
                .unwrap_or_else(|| step_id.to_string()),
            kind,
            offset_from_first: self.store.get_int(&keys::offset_from_first(step_id))?,
            snoozed_until,
            allow_snooze: self
                .store
                .get_bool(&keys::allow_snooze(step_id))?
                .unwrap_or(true),
            metadata: StepMetadata {
                title: self
                    .store
                    .get_string(&keys::title(step_id))?
                    .unwrap_or_default(),
                sound_name: self.store.get_string(&keys::sound_name(step_id))?,
                accent_hex: self.store.get_string(&keys::accent_hex(step_id))?,
            },
        }))
    }

    fn write_step(&mut self, stack_id: &str, step: &Step) -> Result<()> {
        let id = step.id.as_str();
        self.store.set_string(&keys::stack_id(id), stack_id)?;
        self.store.set_string(&keys::base_id(id), &step.base_id)?;
        self.store.set_string(&keys::kind(id), &step.kind.to_string())?;
        self.store.set_bool(&keys::allow_snooze(id), step.allow_snooze)?;
        self.store.set_string(&keys::title(id), &step.metadata.title)?;

        match step.chain_offset() {
            Some(offset) => self.store.set_int(&keys::offset_from_first(id), offset)?,
            None => self.store.remove(&keys::offset_from_first(id))?,
        }
        match step.snoozed_until {
            Some(until) => self.store.set_int(&keys::snoozed_until(id), until.as_second())?,
            None => self.store.remove(&keys::snoozed_until(id))?,
        }
        match &step.metadata.sound_name {
            Some(sound) => self.store.set_string(&keys::sound_name(id), sound)?,
            None => self.store.remove(&keys::sound_name(id))?,
        }
        match &step.metadata.accent_hex {
            Some(accent) => self.store.set_string(&keys::accent_hex(id), accent)?,
            None => self.store.remove(&keys::accent_hex(id))?,
        }

        if step.id != step.base_id {
            self.store.set_string(&keys::snooze_map(&step.base_id), id)?;
        }
        Ok(())
    }

    fn remove_step(&mut self, step_id: &str) -> Result<()> {
        for key in keys::step_keys(step_id) {
            self.store.remove(&key)?;
        }
        Ok(())
    }

    fn write_chain(&mut self, chain: &Chain, retired_ids: &[String]) -> Result<()> {
        for id in retired_ids {
            self.remove_step(id)?;
        }
        for step in &chain.steps {
            self.write_step(&chain.stack_id, step)?;
        }

        let stack_id = chain.stack_id.as_str();
        self.store
            .set_int(&keys::first_target(stack_id), chain.first_target.as_second())?;
        self.store
            .set_int(&keys::anchor_offset(stack_id), chain.anchor_offset)?;
        self.store
            .set_string_array(&keys::active_ids(stack_id), &chain.active_ids())?;

        let mut stacks = self.list_stacks()?;
        if !stacks.iter().any(|id| id == stack_id) {
            stacks.push(stack_id.to_string());
            self.store.set_string_array(&keys::stack_ids(), &stacks)?;
        }
        Ok(())
    }

    fn remove_chain(&mut self, chain: &Chain) -> Result<()> {
        for step in &chain.steps {
            self.remove_step(&step.id)?;
            self.store.remove(&keys::snooze_map(&step.base_id))?;
        }

        let stack_id = chain.stack_id.as_str();
        self.store.remove(&keys::first_target(stack_id))?;
        self.store.remove(&keys::anchor_offset(stack_id))?;
        self.store.remove(&keys::active_ids(stack_id))?;

        let stacks: Vec<String> = self
            .list_stacks()?
            .into_iter()
            .filter(|id| id != stack_id)
            .collect();
        if stacks.is_empty() {
            self.store.remove(&keys::stack_ids())
        } else {
            self.store.set_string_array(&keys::stack_ids(), &stacks)
        }
    }

    /// Runs `write` inside a store batch, rolling back on failure.
    fn batched<F>(&mut self, write: F) -> Result<()>
    where
        F: FnOnce(&mut Self) -> Result<()>,
    {
        self.store.begin_batch()?;
        match write(self) {
            Ok(()) => self.store.commit_batch(),
            Err(e) => {
                if let Err(rollback) = self.store.rollback_batch() {
                    warn!("Failed to roll back store batch: {rollback}");
                }
                Err(e)
            }
        }
    }
}

impl<S: KeyValueStore> ChainRepository for KvChainRepository<S> {
    fn locate_step(&self, step_id: &str) -> Result<Option<StepLocation>> {
        let current_id = self
            .store
            .get_string(&keys::snooze_map(step_id))?
            .unwrap_or_else(|| step_id.to_string());

        Ok(self
            .store
            .get_string(&keys::stack_id(&current_id))?
            .map(|stack_id| StepLocation {
                stack_id,
                current_id,
            }))
    }

    fn load_chain(&self, stack_id: &str) -> Result<Option<Chain>> {
        let Some(first_target) = self.store.get_int(&keys::first_target(stack_id))? else {
            return Ok(None);
        };
        let first_target =
            Timestamp::from_second(first_target).schedule_context("Stored anchor out of range")?;
        let anchor_offset = self
            .store
            .get_int(&keys::anchor_offset(stack_id))?
            .unwrap_or(0);

        let mut steps = Vec::new();
        for id in self
            .store
            .get_string_array(&keys::active_ids(stack_id))?
            .unwrap_or_default()
        {
            match self.load_step(&id)? {
                Some(step) => steps.push(step),
                None => warn!("Active step '{id}' of stack '{stack_id}' has no stored kind"),
            }
        }

        Ok(Some(Chain {
            stack_id: stack_id.to_string(),
            first_target,
            anchor_offset,
            steps,
        }))
    }

    fn save_chain(&mut self, chain: &Chain, retired_ids: &[String]) -> Result<()> {
        self.batched(|repo| repo.write_chain(chain, retired_ids))
    }

    fn delete_chain(&mut self, stack_id: &str) -> Result<Option<Chain>> {
        let Some(chain) = self.load_chain(stack_id)? else {
            return Ok(None);
        };
        self.batched(|repo| repo.remove_chain(&chain))?;
        Ok(Some(chain))
    }

    fn list_stacks(&self) -> Result<Vec<String>> {
        Ok(self
            .store
            .get_string_array(&keys::stack_ids())?
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn sample_chain() -> Chain {
        Chain {
            stack_id: "morning".to_string(),
            first_target: Timestamp::from_second(1_700_000_000).unwrap(),
            anchor_offset: 0,
            steps: vec![
                Step {
                    id: "wake".to_string(),
                    base_id: "wake".to_string(),
                    kind: "timer:0".parse().unwrap(),
                    offset_from_first: Some(0),
                    snoozed_until: None,
                    allow_snooze: true,
                    metadata: StepMetadata {
                        title: "Wake up".to_string(),
                        sound_name: Some("bell".to_string()),
                        accent_hex: Some("#FFAA00".to_string()),
                    },
                },
                Step {
                    id: "leave".to_string(),
                    base_id: "leave".to_string(),
                    kind: "fixed:08:15".parse().unwrap(),
                    offset_from_first: None,
                    snoozed_until: None,
                    allow_snooze: false,
                    metadata: StepMetadata {
                        title: "Leave".to_string(),
                        ..StepMetadata::default()
                    },
                },
            ],
        }
    }

    #[test]
    fn test_save_then_load_chain() {
        let mut repo = KvChainRepository::new(MemoryStore::new());
        let chain = sample_chain();
        repo.save_chain(&chain, &[]).unwrap();

        let loaded = repo.load_chain("morning").unwrap().expect("chain exists");
        assert_eq!(loaded, chain);
        assert_eq!(repo.list_stacks().unwrap(), vec!["morning".to_string()]);
        assert_eq!(
            repo.store()
                .get_string_array(&keys::active_ids("morning"))
                .unwrap(),
            Some(vec!["wake".to_string(), "leave".to_string()])
        );
    }

    #[test]
    fn test_fixed_step_has_no_offset_key() {
        let mut repo = KvChainRepository::new(MemoryStore::new());
        repo.save_chain(&sample_chain(), &[]).unwrap();
        assert_eq!(
            repo.store()
                .get_int(&keys::offset_from_first("leave"))
                .unwrap(),
            None
        );
    }

    #[test]
    fn test_locate_step_follows_snooze_mapping() {
        let mut repo = KvChainRepository::new(MemoryStore::new());
        let mut chain = sample_chain();
        repo.save_chain(&chain, &[]).unwrap();

        chain.steps[0].id = "wake#1".to_string();
        repo.save_chain(&chain, &["wake".to_string()]).unwrap();

        let location = repo.locate_step("wake").unwrap().expect("mapped");
        assert_eq!(location.current_id, "wake#1");
        assert_eq!(location.stack_id, "morning");
        assert_eq!(
            repo.store().get_string(&keys::kind("wake")).unwrap(),
            None
        );
        assert!(repo.locate_step("unknown").unwrap().is_none());
    }

    #[test]
    fn test_delete_chain_removes_every_key() {
        let mut repo = KvChainRepository::new(MemoryStore::new());
        let mut chain = sample_chain();
        repo.save_chain(&chain, &[]).unwrap();
        chain.steps[0].id = "wake#1".to_string();
        repo.save_chain(&chain, &["wake".to_string()]).unwrap();

        let deleted = repo.delete_chain("morning").unwrap();
        assert!(deleted.is_some());
        assert!(repo.store().is_empty(), "left: {:?}", repo.store().keys());
        assert!(repo.delete_chain("morning").unwrap().is_none());
    }

    #[test]
    fn test_unparsable_kind_is_an_error() {
        let mut store = MemoryStore::new();
        store.set_int(&keys::first_target("s"), 0).unwrap();
        store
            .set_string_array(&keys::active_ids("s"), &["x".to_string()])
            .unwrap();
        store.set_string(&keys::kind("x"), "sometimes").unwrap();

        let repo = KvChainRepository::new(store);
        assert!(matches!(
            repo.load_chain("s"),
            Err(ChimeError::InvalidInput { .. })
        ));
    }
}
