//! Step model definition.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use super::StepKind;

/// User-visible presentation fields carried unchanged across snoozes.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct StepMetadata {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sound_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accent_hex: Option<String>,
}

/// One alarm within a stack.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Step {
    /// Currently scheduled identity of the step
    pub id: String,

    /// Original id of the logical step; equal to `id` until first snoozed
    pub base_id: String,

    pub kind: StepKind,

    /// Seconds from the chain origin. Present for every non-fixed step.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset_from_first: Option<i64>,

    /// Absolute fire instant of a snoozed fixed-time step
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snoozed_until: Option<Timestamp>,

    pub allow_snooze: bool,

    pub metadata: StepMetadata,
}

impl Step {
    pub fn is_fixed(&self) -> bool {
        self.kind.is_fixed()
    }

    /// Offset used for chain ordering; `None` for fixed-time steps.
    pub fn chain_offset(&self) -> Option<i64> {
        if self.is_fixed() {
            None
        } else {
            self.offset_from_first
        }
    }

    /// `snoozed_until`, unless that instant is already behind `now`.
    pub fn pending_snooze(&self, now: Timestamp) -> Option<Timestamp> {
        self.snoozed_until.filter(|until| *until >= now)
    }
}
