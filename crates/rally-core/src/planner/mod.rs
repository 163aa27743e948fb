//! High-level planner API for activities, participants, preferences and
//! plans.
//!
//! The [`Planner`] is the coordinator between the interfaces and the
//! database. Every method is async; store work runs on the blocking pool
//! with a fresh connection per call, and the planning engine is called in
//! between.
//!
//! ```text
//! ┌─────────────────┐    ┌─────────────────┐    ┌─────────────────┐
//! │  CLI / MCP      │    │    Planner      │    │    Database     │
//! │  (params::*)    │───▶│ (*_ops, engine) │───▶│   (via db/)     │
//! └─────────────────┘    └─────────────────┘    └─────────────────┘
//! ```
//!
//! ## Submodules
//!
//! - [`builder`]: Factory for [`Planner`] instances
//! - [`activity_ops`]: Activity lifecycle and response statistics
//! - [`participant_ops`]: Invitations and the questionnaire
//! - [`preference_ops`]: Raw preferences and free-text input
//! - [`plan_ops`]: Plan generation, revision and approval
//!
//! # Examples
//!
//! ```rust,no_run
//! use rally_core::{params::{ActivityId, AddParticipant, CreateActivity}, PlannerBuilder};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let planner = PlannerBuilder::new()
//!     .with_database_path(Some("/tmp/rally.db"))
//!     .build()
//!     .await?;
//!
//! let activity = planner
//!     .create_activity(&CreateActivity {
//!         title: Some("Spring hike".to_string()),
//!         ..Default::default()
//!     })
//!     .await?;
//! planner
//!     .add_participant(&AddParticipant {
//!         activity_id: activity.id,
//!         phone_number: "555-0100".to_string(),
//!         ..Default::default()
//!     })
//!     .await?;
//!
//! let plan = planner
//!     .generate_plan(&ActivityId { activity_id: activity.id })
//!     .await?;
//! println!("{}", plan.title);
//! # Ok(())
//! # }
//! ```

use std::{fmt, path::PathBuf, sync::Arc};

use jiff::{civil::Date, Zoned};
use tokio::task;

use crate::{
    db::Database,
    engine::{PlanAdvisor, QuestionBank},
    error::{PlannerError, Result},
};

pub mod activity_ops;
pub mod builder;
pub mod participant_ops;
pub mod plan_ops;
pub mod preference_ops;


pub use builder::PlannerBuilder;
pub use participant_ops::AnswerSubmission;

/// Main planner interface.
pub struct Planner {
    pub(crate) db_path: PathBuf,
    pub(crate) question_bank: &'static QuestionBank,
    pub(crate) advisor: Option<Arc<dyn PlanAdvisor>>,
    pub(crate) fixed_date: Option<Date>,
}

impl fmt::Debug for Planner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Planner")
            .field("db_path", &self.db_path)
            .field("question_bank", &self.question_bank.version)
            .field("advisor", &self.advisor.is_some())
            .field("fixed_date", &self.fixed_date)
            .finish()
    }
}

impl Planner {
    /// The questionnaire this planner asks.
    pub fn question_bank(&self) -> &'static QuestionBank {
        self.question_bank
    }

    /// Date plans are proposed relative to.
    pub(crate) fn today(&self) -> Date {
        self.fixed_date.unwrap_or_else(|| Zoned::now().date())
    }

    /// Runs `f` against a fresh connection on the blocking pool.
    pub(crate) async fn with_db<T, F>(&self, f: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut Database) -> Result<T> + Send + 'static,
    {
        let db_path = self.db_path.clone();

        task::spawn_blocking(move || {
            let mut db = Database::new(&db_path)?;
            f(&mut db)
        })
        .await
        .map_err(PlannerError::join)?
    }
}
