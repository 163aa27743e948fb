//! Builder for creating and configuring Planner instances.

use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use jiff::civil::Date;
use log::debug;
use tokio::task;

use super::Planner;
use crate::{
    db::Database,
    engine::{PlanAdvisor, QuestionBank},
    error::{PlannerError, Result},
};

/// Builder for creating and configuring Planner instances.
#[derive(Clone, Default)]
pub struct PlannerBuilder {
    database_path: Option<PathBuf>,
    question_bank_version: Option<u32>,
    advisor: Option<Arc<dyn PlanAdvisor>>,
    fixed_date: Option<Date>,
}

impl PlannerBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a custom database file path.
    ///
    /// If not specified, uses XDG Base Directory specification:
    /// `$XDG_DATA_HOME/rally/rally.db` or `~/.local/share/rally/rally.db`
    pub fn with_database_path<P: AsRef<Path>>(mut self, path: Option<P>) -> Self {
        if let Some(path) = path {
            self.database_path = Some(path.as_ref().to_path_buf());
        }
        self
    }

    /// Selects the questionnaire version. Defaults to the latest.
    pub fn with_question_bank_version(mut self, version: Option<u32>) -> Self {
        self.question_bank_version = version;
        self
    }

    /// Consults `advisor` when generating and revising plans.
    pub fn with_advisor(mut self, advisor: Arc<dyn PlanAdvisor>) -> Self {
        self.advisor = Some(advisor);
        self
    }

    /// Proposes dates relative to `date` instead of the current day.
    pub fn with_fixed_date(mut self, date: Date) -> Self {
        self.fixed_date = Some(date);
        self
    }

    /// Builds the configured planner instance.
    ///
    /// # Errors
    ///
    /// Returns `PlannerError::Configuration` for an unknown question bank
    /// version.
    /// Returns `PlannerError::FileSystem` if the database path is invalid
    /// Returns `PlannerError::Database` if database initialization fails
    pub async fn build(self) -> Result<Planner> {
        let question_bank = match self.question_bank_version {
            Some(version) => {
                QuestionBank::version(version).ok_or_else(|| PlannerError::Configuration {
                    message: format!("Unknown question bank version: {version}"),
                })?
            }
            None => QuestionBank::current(),
        };

        let db_path = if let Some(path) = self.database_path {
            path
        } else {
            Self::default_database_path()?
        };

        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| PlannerError::FileSystem {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let db_path_clone = db_path.clone();
        task::spawn_blocking(move || {
            let _db = Database::new(&db_path_clone)?;
            Ok::<(), PlannerError>(())
        })
        .await
        .map_err(PlannerError::join)??;

        debug!(
            "Planner ready with database {} and question bank v{}",
            db_path.display(),
            question_bank.version
        );

        Ok(Planner {
            db_path,
            question_bank,
            advisor: self.advisor,
            fixed_date: self.fixed_date,
        })
    }

    /// Returns the default database path following XDG Base Directory
    /// specification.
    fn default_database_path() -> Result<PathBuf> {
        xdg::BaseDirectories::with_prefix("rally")
            .place_data_file("rally.db")
            .map_err(|e| PlannerError::XdgDirectory(e.to_string()))
    }
}
