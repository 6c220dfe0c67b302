//! Parameter structures for chime operations
//!
//! These structures are shared by every interface (CLI, embedding apps)
//! without framework-specific derives. Interface layers wrap them with their
//! own argument types and convert with `From`.
//!
//! ```text
//! ┌─────────────────┐    ┌─────────────────┐    ┌─────────────────┐
//! │   CLI Args      │    │  Core Params    │    │   Scheduler     │
//! │  (clap derives) │───▶│ (serde derives) │───▶│   operations    │
//! └─────────────────┘    └─────────────────┘    └─────────────────┘
//! ```

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use crate::models::{StepKind, StepMetadata};

fn default_allow_snooze() -> bool {
    true
}

/// Generic parameters for operations requiring just an ID.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Id {
    /// The ID of the stack or step to operate on
    pub id: String,
}

/// One step of a stack being authored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StepDefinition {
    /// Stable id of the step; becomes its logical (base) id
    pub id: String,
    pub kind: StepKind,
    #[serde(default = "default_allow_snooze")]
    pub allow_snooze: bool,
    #[serde(flatten)]
    pub metadata: StepMetadata,
}

/// Parameters for activating a stack.
///
/// This is also the on-disk format of stack definition files:
///
/// ```json
/// {
///   "stack_id": "morning",
///   "steps": [
///     { "id": "wake", "kind": { "type": "fixed_time", "hour": 6, "minute": 30 }, "title": "Wake up" },
///     { "id": "stretch", "kind": { "type": "timer", "duration_seconds": 600 }, "title": "Stretch" }
///   ]
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ActivateStack {
    pub stack_id: String,
    /// Base instant of the first step; defaults to now
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<Timestamp>,
    pub steps: Vec<StepDefinition>,
}

/// Parameters for snoozing a step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snooze {
    /// Original or current id of the step
    pub step_id: String,
    pub minutes: u32,
}

/// Parameters for editing a step while its stack is idle.
///
/// `None` leaves a field unchanged; `Some(None)` on the optional display
/// fields clears them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateStep {
    pub id: String,
    pub allow_snooze: Option<bool>,
    pub title: Option<String>,
    pub sound_name: Option<Option<String>>,
    pub accent_hex: Option<Option<String>>,
}

/// Parameters for a one-off next-fire-date computation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NextFire {
    pub kind: StepKind,
    /// Base instant; defaults to now
    pub base: Option<Timestamp>,
}
