//! Result wrapper types for displaying operation outcomes.

use std::fmt;

use jiff::{SignedDuration, tz::TimeZone};

use super::{collections::Schedule, datetime::LocalDateTime};
use crate::{
    engine::{AppliedSnooze, SnoozePlan},
    models::{Chain, Step},
};

/// Wrapper type for displaying a freshly activated stack.
///
/// # Examples
///
/// ```rust
/// use chime_core::{display::CreateResult, models::Chain};
///
/// let chain = Chain {
///     stack_id: "morning".to_string(),
///     first_target: "2024-05-01T06:30:00Z".parse().unwrap(),
///     anchor_offset: 0,
///     steps: vec![],
/// };
/// let output = CreateResult::new(chain).to_string();
/// assert!(output.contains("Activated stack 'morning' with 0 step(s)"));
/// ```
pub struct CreateResult<T> {
    pub resource: T,
}

impl<T> CreateResult<T> {
    pub fn new(resource: T) -> Self {
        Self { resource }
    }
}

impl fmt::Display for CreateResult<Chain> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Activated stack '{}' with {} step(s)",
            self.resource.stack_id,
            self.resource.steps.len()
        )?;
        writeln!(f)?;
        write!(f, "{}", self.resource)
    }
}

/// Wrapper type for displaying the result of update operations.
///
/// The wrapper can list the specific changes made during the update.
pub struct UpdateResult<T> {
    pub resource: T,
    pub changes: Vec<String>,
}

impl<T> UpdateResult<T> {
    pub fn new(resource: T) -> Self {
        Self {
            resource,
            changes: Vec::new(),
        }
    }

    pub fn with_changes(resource: T, changes: Vec<String>) -> Self {
        Self { resource, changes }
    }
}

impl fmt::Display for UpdateResult<Step> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Updated step `{}`", self.resource.id)?;

        if !self.changes.is_empty() {
            writeln!(f)?;
            writeln!(f, "Changes made:")?;
            for change in &self.changes {
                writeln!(f, "- {change}")?;
            }
        }

        writeln!(f)?;
        write!(f, "{}", self.resource)
    }
}

/// Wrapper type for displaying a retired stack and the ids it released.
pub struct RetireResult {
    pub stack_id: String,
    pub removed_ids: Vec<String>,
}

impl fmt::Display for RetireResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Retired stack '{}' ({} step(s))",
            self.stack_id,
            self.removed_ids.len()
        )?;
        for id in &self.removed_ids {
            writeln!(f, "- `{id}`")?;
        }
        Ok(())
    }
}

impl fmt::Display for SnoozePlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Snooze `{}` by {} in stack '{}'",
            self.resolved_id,
            SignedDuration::from_secs(self.delta_seconds),
            self.stack_id
        )?;
        writeln!(f)?;
        if self.is_first_step {
            writeln!(f, "- Moves the whole chain")?;
        }
        writeln!(f, "- Replaces: {}", self.replace_ids.join(", "))?;
        writeln!(f, "- Fires at: {}", self.resolved_fire_at)?;
        if let Some(anchor) = &self.new_first_target {
            writeln!(f, "- New anchor: {anchor}")?;
        }
        Ok(())
    }
}

impl fmt::Display for AppliedSnooze {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Snoozed `{}` in stack '{}'",
            self.current_id, self.stack_id
        )?;
        writeln!(f)?;
        writeln!(f, "- Removed: {}", self.removed_ids.join(", "))?;
        for step in &self.added {
            write!(f, "{step}")?;
        }
        Ok(())
    }
}

/// An applied snooze with its rescheduled steps in a local time zone.
pub struct SnoozeResult<'a> {
    pub applied: &'a AppliedSnooze,
    pub time_zone: &'a TimeZone,
}

impl<'a> SnoozeResult<'a> {
    pub fn new(applied: &'a AppliedSnooze, time_zone: &'a TimeZone) -> Self {
        Self { applied, time_zone }
    }
}

impl fmt::Display for SnoozeResult<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Snoozed `{}` in stack '{}'",
            self.applied.current_id, self.applied.stack_id
        )?;
        writeln!(f)?;
        writeln!(
            f,
            "- Anchor: {}",
            LocalDateTime::new(&self.applied.first_target, self.time_zone)
        )?;
        writeln!(f, "- Removed: {}", self.applied.removed_ids.join(", "))?;
        writeln!(f)?;
        write!(f, "{}", Schedule::new(&self.applied.added, self.time_zone))
    }
}
