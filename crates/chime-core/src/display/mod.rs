//! Display formatting functions and result types.
//!
//! Domain models implement `Display` directly and render as markdown. Wrapper
//! types add operation context (what was activated, snoozed, retired) and
//! render instants in a caller-chosen time zone.
//!
//! ```text
//! ┌─────────────────┐    ┌─────────────────┐    ┌─────────────────┐
//! │  Domain Models  │    │ Wrapper Types   │    │   Markdown      │
//! │ (Chain, Step)   │───▶│ (results, zone) │───▶│    Output       │
//! └─────────────────┘    └─────────────────┘    └─────────────────┘
//! ```
//!
//! - [`collections`]: stack id lists and local-time schedules
//! - [`results`]: activation, update, snooze and retirement results
//! - [`status`]: plain status messages
//! - [`datetime`]: time zone aware timestamp formatting
//! - [`models`]: Display implementations for domain models

pub mod collections;
pub mod datetime;
pub mod models;
pub mod results;
pub mod status;

pub use collections::{Schedule, StackIds};
pub use datetime::LocalDateTime;
pub use results::{CreateResult, RetireResult, SnoozeResult, UpdateResult};
pub use status::OperationStatus;
