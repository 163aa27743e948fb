//! Core library for Rally, a group activity planner.
//!
//! Rally collects preferences from the participants of an activity through a
//! short questionnaire (or free-text messages), aggregates them into one
//! group profile, and turns that profile into a titled, described plan with
//! a timed schedule. Plans can be revised with feedback, sent out for
//! approval and finalized.
//!
//! - [`engine`]: the pure planning pipeline (aggregation, schedule
//!   synthesis, plan assembly, free-text extraction, question bank, advisor
//!   boundary)
//! - [`planner`]: the async [`Planner`] facade over the SQLite store
//! - [`db`]: the store itself
//! - [`display`]: markdown formatting for models and results
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use std::collections::BTreeMap;
//!
//! use rally_core::{
//!     params::{ActivityId, AddParticipant, CreateActivity, SubmitAnswers},
//!     PlannerBuilder,
//! };
//! use serde_json::json;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let planner = PlannerBuilder::new()
//!     .with_database_path(Some("rally.db"))
//!     .build()
//!     .await?;
//!
//! let activity = planner
//!     .create_activity(&CreateActivity {
//!         title: Some("Team outing".to_string()),
//!         ..Default::default()
//!     })
//!     .await?;
//! let participant = planner
//!     .add_participant(&AddParticipant {
//!         activity_id: activity.id,
//!         phone_number: "555-0100".to_string(),
//!         ..Default::default()
//!     })
//!     .await?;
//!
//! let mut answers = BTreeMap::new();
//! answers.insert("activity_type".to_string(), json!(["Food"]));
//! planner
//!     .submit_answers(&SubmitAnswers { participant_id: participant.id, answers })
//!     .await?;
//!
//! let plan = planner.generate_plan(&ActivityId { activity_id: activity.id }).await?;
//! println!("{plan}");
//! # Ok(())
//! # }
//! ```

pub mod db;
pub mod display;
pub mod engine;
pub mod error;
pub mod models;
pub mod params;
pub mod planner;

// Re-export commonly used types
pub use db::Database;
pub use display::{
    Activities, CreateResult, DeleteResult, LocalDateTime, OperationStatus, Plans, Preferences,
    UpdateResult,
};
pub use engine::{PlanAdvisor, PlanningBrief, QuestionBank, Suggestion};
pub use error::{PlannerError, Result};
pub use models::{
    Activity, ActivityStatus, ClockTime, Participant, ParticipantStatus, Plan, PlanApproval,
    PlanStatus, PreferenceSet, ScheduleBlock,
};
pub use planner::{AnswerSubmission, Planner, PlannerBuilder};
