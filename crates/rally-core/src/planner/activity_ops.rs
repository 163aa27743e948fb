//! Activity operations for the Planner.

use log::info;

use super::Planner;
use crate::{
    db::activity_queries::ActivityFields,
    error::{PlannerError, Result},
    models::{Activity, ActivityStatus, ClockTime, ResponseStats},
    params::{ActivityId, CreateActivity, DeleteActivity, Id, ListActivities, UpdateActivity},
};

/// Parses an organizer-supplied start time and returns it in display form.
fn normalize_start_time(start_time: Option<&str>) -> Result<Option<String>> {
    start_time
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            ClockTime::parse(s)
                .map(|t| t.to_string())
                .map_err(|_| {
                    PlannerError::invalid_parameter(
                        "start_time",
                        format!("'{s}' is not a time such as 10:30 AM or 14:00"),
                    )
                })
        })
        .transpose()
}

impl Planner {
    /// Creates a new activity in the `planning` state.
    ///
    /// A start time is stored in `h:MM AM` form.
    pub async fn create_activity(&self, params: &CreateActivity) -> Result<Activity> {
        let start_time = normalize_start_time(params.start_time.as_deref())?;
        let title = params.title.clone();
        let description = params.description.clone();
        let location_address = params.location_address.clone();

        let activity = self
            .with_db(move |db| {
                db.create_activity(&ActivityFields {
                    title: title.as_deref(),
                    description: description.as_deref(),
                    start_time: start_time.as_deref(),
                    location_address: location_address.as_deref(),
                })
            })
            .await?;
        info!("Created activity {}", activity.id);
        Ok(activity)
    }

    /// Retrieves an activity with its participants.
    pub async fn get_activity(&self, params: &Id) -> Result<Activity> {
        let id = params.id;
        self.with_db(move |db| db.get_activity(id))
            .await?
            .ok_or(PlannerError::ActivityNotFound { id })
    }

    /// Lists activities, newest first.
    pub async fn list_activities(&self, params: &ListActivities) -> Result<Vec<Activity>> {
        let status = params
            .status
            .as_deref()
            .map(str::parse::<ActivityStatus>)
            .transpose()
            .map_err(|reason| PlannerError::invalid_parameter("status", reason))?;

        self.with_db(move |db| db.list_activities(status)).await
    }

    /// Updates the given fields of an activity.
    pub async fn update_activity(&self, params: &UpdateActivity) -> Result<Activity> {
        let id = params.id;
        let start_time = normalize_start_time(params.start_time.as_deref())?;
        let title = params.title.clone();
        let description = params.description.clone();
        let location_address = params.location_address.clone();

        self.with_db(move |db| {
            db.update_activity(
                id,
                &ActivityFields {
                    title: title.as_deref(),
                    description: description.as_deref(),
                    start_time: start_time.as_deref(),
                    location_address: location_address.as_deref(),
                },
            )
        })
        .await?
        .ok_or(PlannerError::ActivityNotFound { id })
    }

    /// Permanently deletes an activity and everything recorded for it.
    ///
    /// # Errors
    ///
    /// Returns `PlannerError::InvalidInput` unless `confirmed` is set.
    pub async fn delete_activity(&self, params: &DeleteActivity) -> Result<()> {
        if !params.confirmed {
            return Err(PlannerError::invalid_input("confirmed")
                .with_reason("deleting an activity removes its participants and plans; confirm to proceed"));
        }

        let id = params.id;
        let deleted = self.with_db(move |db| db.delete_activity(id)).await?;
        if !deleted {
            return Err(PlannerError::ActivityNotFound { id });
        }
        info!("Deleted activity {id}");
        Ok(())
    }

    /// How many participants have started and finished the questionnaire.
    pub async fn response_stats(&self, params: &ActivityId) -> Result<ResponseStats> {
        let id = params.activity_id;
        let participants = self
            .with_db(move |db| {
                if !db.activity_exists(id)? {
                    return Err(PlannerError::ActivityNotFound { id });
                }
                db.get_participants(id)
            })
            .await?;
        Ok(ResponseStats::from_participants(&participants))
    }
}
