//! Display implementations for domain models.
//!
//! Models render as markdown. Instants are shown in UTC here; the wrappers in
//! [`super::collections`] and [`super::results`] render them in a local zone.

use std::fmt;

use crate::models::{Chain, ScheduledStep, Step};

impl Step {
    fn fmt_step(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "### {} (`{}`)", self.metadata.title, self.id)?;
        writeln!(f)?;

        writeln!(f, "- Kind: `{}`", self.kind)?;
        if self.id != self.base_id {
            writeln!(f, "- Snoozed from: `{}`", self.base_id)?;
        }
        match self.chain_offset() {
            Some(offset) => writeln!(f, "- Offset: {offset:+}s")?,
            None => writeln!(f, "- Offset: fixed time")?,
        }
        if let Some(until) = &self.snoozed_until {
            writeln!(f, "- Snoozed until: {until}")?;
        }
        writeln!(
            f,
            "- Snooze: {}",
            if self.allow_snooze { "allowed" } else { "disabled" }
        )?;
        if let Some(sound) = &self.metadata.sound_name {
            writeln!(f, "- Sound: {sound}")?;
        }
        if let Some(accent) = &self.metadata.accent_hex {
            writeln!(f, "- Accent: {accent}")?;
        }
        writeln!(f)
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_step(f)
    }
}

impl fmt::Display for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "# Stack {}", self.stack_id)?;
        writeln!(f)?;
        writeln!(f, "- Anchor: {}", self.first_target)?;
        if self.anchor_offset != 0 {
            writeln!(f, "- Anchor offset: {:+}s", self.anchor_offset)?;
        }

        if self.steps.is_empty() {
            writeln!(f, "\nNo active steps in this stack.")?;
        } else {
            writeln!(f, "\n## Steps")?;
            writeln!(f)?;
            for step in &self.steps {
                write!(f, "{step}")?;
            }
        }
        Ok(())
    }
}

impl fmt::Display for ScheduledStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "- {} `{}` at {}", self.title, self.id, self.fire_at)
    }
}
