//! Canonical store keys for stacks, steps and snooze mappings.
//!
//! Every component that reads or writes alarm state must go through these
//! functions so the flat namespace stays consistent. Values behind the keys
//! are always scalars or string arrays.

const PREFIX: &str = "chime";

/// Registry of every activated stack id.
pub fn stack_ids() -> String {
    format!("{PREFIX}.stacks")
}

/// Epoch second at which the lead non-fixed step of the stack fires.
pub fn first_target(stack_id: &str) -> String {
    format!("{PREFIX}.stack.{stack_id}.firstTarget")
}

/// Offset value that `first_target` corresponds to.
pub fn anchor_offset(stack_id: &str) -> String {
    format!("{PREFIX}.stack.{stack_id}.anchorOffset")
}

/// Ordered list of step ids currently scheduled for the stack.
pub fn active_ids(stack_id: &str) -> String {
    format!("{PREFIX}.stack.{stack_id}.activeIDs")
}

/// Owning stack of a step.
pub fn stack_id(step_id: &str) -> String {
    format!("{PREFIX}.step.{step_id}.stackID")
}

/// Original (user-facing) id of the logical step a step id represents.
pub fn base_id(step_id: &str) -> String {
    format!("{PREFIX}.step.{step_id}.baseID")
}

pub fn offset_from_first(step_id: &str) -> String {
    format!("{PREFIX}.step.{step_id}.offsetFromFirst")
}

pub fn kind(step_id: &str) -> String {
    format!("{PREFIX}.step.{step_id}.kind")
}

pub fn allow_snooze(step_id: &str) -> String {
    format!("{PREFIX}.step.{step_id}.allowSnooze")
}

pub fn title(step_id: &str) -> String {
    format!("{PREFIX}.step.{step_id}.title")
}

pub fn sound_name(step_id: &str) -> String {
    format!("{PREFIX}.step.{step_id}.soundName")
}

pub fn accent_hex(step_id: &str) -> String {
    format!("{PREFIX}.step.{step_id}.accentHex")
}

/// Absolute fire instant of a snoozed fixed-time step's replacement.
pub fn snoozed_until(step_id: &str) -> String {
    format!("{PREFIX}.step.{step_id}.snoozedUntil")
}

/// Pointer from a logical step's original id to its current replacement.
pub fn snooze_map(base_id: &str) -> String {
    format!("{PREFIX}.snoozeMap.{base_id}")
}

/// Every per-step key, used when a step id is retired.
pub fn step_keys(step_id: &str) -> [String; 9] {
    [
        stack_id(step_id),
        base_id(step_id),
        offset_from_first(step_id),
        kind(step_id),
        allow_snooze(step_id),
        title(step_id),
        sound_name(step_id),
        accent_hex(step_id),
        snoozed_until(step_id),
    ]
}
