//! Stack operations for the Scheduler.

use jiff::Timestamp;

use super::Scheduler;
use crate::{
    error::Result,
    models::{Chain, ScheduledStep},
    params::{ActivateStack, Id},
};

impl Scheduler {
    /// Activates a stack, anchoring its first step at `params.start` (or now).
    pub async fn activate_stack(&self, params: &ActivateStack) -> Result<Chain> {
        let stack_id = params.stack_id.clone();
        let start = params.start.unwrap_or_else(Timestamp::now);
        let steps = params.steps.clone();

        // Step ids are checked against every stack, so activations run one
        // at a time.
        let _activation = self.activation.lock().await;
        let guard = self.stack_guard(&stack_id).await;
        let _held = guard.lock().await;
        self.run(move |engine| engine.activate(&stack_id, start, &steps))
            .await
    }

    /// Retrieves the active chain of a stack.
    pub async fn show_stack(&self, params: &Id) -> Result<Option<Chain>> {
        let stack_id = params.id.clone();
        self.run(move |engine| engine.load_chain(&stack_id)).await
    }

    /// Next fire instant of every active step of a stack, as of now.
    pub async fn schedule(&self, params: &Id) -> Result<Option<Vec<ScheduledStep>>> {
        self.schedule_at(params, Timestamp::now()).await
    }

    /// Like [`Scheduler::schedule`], evaluated at `now`.
    pub async fn schedule_at(
        &self,
        params: &Id,
        now: Timestamp,
    ) -> Result<Option<Vec<ScheduledStep>>> {
        let stack_id = params.id.clone();
        self.run(move |engine| engine.schedule(&stack_id, now)).await
    }

    /// Ids of all active stacks, in activation order.
    pub async fn list_stacks(&self) -> Result<Vec<String>> {
        self.run(|engine| engine.list_stacks()).await
    }

    /// Retires a stack. Returns the step ids that were still scheduled.
    pub async fn retire_stack(&self, params: &Id) -> Result<Option<Vec<String>>> {
        let stack_id = params.id.clone();

        let guard = self.stack_guard(&stack_id).await;
        let held = guard.lock().await;
        let released = {
            let stack_id = stack_id.clone();
            self.run(move |engine| engine.retire(&stack_id)).await
        };
        drop(held);
        drop(guard);

        self.release_guard(&stack_id).await;
        released
    }
}
