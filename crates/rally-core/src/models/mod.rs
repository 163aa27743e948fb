//! Data models for activities, participants, preferences and plans.
//!
//! Display implementations for these models live in
//! [`crate::display::models`], keeping data structures apart from
//! presentation.
//!
//! # Examples
//!
//! ```rust
//! use rally_core::models::{ClockTime, ScheduleBlock};
//!
//! let block = ScheduleBlock::at(ClockTime::from_hm(9, 0).unwrap(), "Meet at the location");
//! assert_eq!(block.time, "9:00 AM");
//! ```

pub mod activity;
pub mod participant;
pub mod plan;
pub mod preference;
pub mod schedule;
pub mod stats;
pub mod status;

#[cfg(test)]
mod tests;

pub use activity::Activity;
pub use participant::Participant;
pub use plan::{Plan, PlanApproval, PlanDraft};
pub use preference::{
    Categories, PreferenceSet, PreferenceValue, decode_value, display_value, encode_value, is_truthy,
    vote_strings,
};
pub use schedule::{ClockTime, ScheduleBlock};
pub use stats::ResponseStats;
pub use status::{ActivityStatus, ParticipantStatus, PlanStatus};
