//! Data models for alarm stacks and their steps.
//!
//! Display implementations for these models are located in
//! [`crate::display::models`].

pub mod chain;
pub mod kind;
pub mod step;

#[cfg(test)]
mod tests;

pub use chain::{Chain, ScheduledStep};
pub use kind::StepKind;
pub use step::{Step, StepMetadata};
