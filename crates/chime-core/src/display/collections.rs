//! Collection wrapper types for displaying groups of domain objects.

use std::fmt;

use jiff::tz::TimeZone;

use super::datetime::LocalDateTime;
use crate::models::ScheduledStep;

/// Newtype wrapper for displaying the ids of active stacks.
///
/// # Examples
///
/// ```rust
/// use chime_core::display::StackIds;
///
/// let output = StackIds(vec!["morning".to_string()]).to_string();
/// assert!(output.contains("- morning"));
/// assert!(StackIds(vec![]).to_string().contains("No active stacks."));
/// ```
pub struct StackIds(pub Vec<String>);

impl StackIds {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl fmt::Display for StackIds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return writeln!(f, "No active stacks.");
        }
        for id in &self.0 {
            writeln!(f, "- {id}")?;
        }
        Ok(())
    }
}

/// Upcoming fire instants of a stack, rendered in a local time zone.
pub struct Schedule<'a> {
    pub steps: &'a [ScheduledStep],
    pub time_zone: &'a TimeZone,
}

impl<'a> Schedule<'a> {
    pub fn new(steps: &'a [ScheduledStep], time_zone: &'a TimeZone) -> Self {
        Self { steps, time_zone }
    }
}

impl fmt::Display for Schedule<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.steps.is_empty() {
            return writeln!(f, "Nothing scheduled.");
        }
        writeln!(f, "| Step | Id | Fires at |")?;
        writeln!(f, "|------|----|----------|")?;
        for step in self.steps {
            writeln!(
                f,
                "| {} | `{}` | {} |",
                step.title,
                step.id,
                LocalDateTime::new(&step.fire_at, self.time_zone)
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schedule_renders_each_step() {
        let steps = vec![
            ScheduledStep {
                id: "wake".to_string(),
                base_id: "wake".to_string(),
                title: "Wake up".to_string(),
                fire_at: "2024-05-01T06:30:00Z".parse().unwrap(),
            },
            ScheduledStep {
                id: "coffee#1".to_string(),
                base_id: "coffee".to_string(),
                title: "Coffee".to_string(),
                fire_at: "2024-05-01T06:45:00Z".parse().unwrap(),
            },
        ];
        let output = Schedule::new(&steps, &TimeZone::UTC).to_string();

        assert!(output.contains("| Wake up | `wake` | 2024-05-01 06:30:00 UTC |"));
        assert!(output.contains("| Coffee | `coffee#1` | 2024-05-01 06:45:00 UTC |"));
    }

    #[test]
    fn test_empty_schedule() {
        let output = Schedule::new(&[], &TimeZone::UTC).to_string();
        assert_eq!(output, "Nothing scheduled.\n");
    }
}
