//! Activity CRUD operations and queries.

use jiff::Timestamp;
use rusqlite::{params, OptionalExtension, Row};

use super::{id_at, status_at, timestamp_at};
use crate::{
    error::{DatabaseResultExt, Result},
    models::{Activity, ActivityStatus},
};

const INSERT_ACTIVITY_SQL: &str = "INSERT INTO activities (title, description, start_time, location_address, status, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)";
const ACTIVITY_COLUMNS: &str =
    "id, title, description, start_time, location_address, status, created_at, updated_at";
const UPDATE_ACTIVITY_SQL: &str = "UPDATE activities SET title = COALESCE(?1, title), description = COALESCE(?2, description), start_time = COALESCE(?3, start_time), location_address = COALESCE(?4, location_address), updated_at = ?5 WHERE id = ?6";
const UPDATE_ACTIVITY_STATUS_SQL: &str =
    "UPDATE activities SET status = ?1, updated_at = ?2 WHERE id = ?3";
const DELETE_ACTIVITY_SQL: &str = "DELETE FROM activities WHERE id = ?1";

/// Organizer-editable fields of an activity. `None` leaves a field as it is.
#[derive(Debug, Clone, Copy, Default)]
pub struct ActivityFields<'a> {
    pub title: Option<&'a str>,
    pub description: Option<&'a str>,
    pub start_time: Option<&'a str>,
    pub location_address: Option<&'a str>,
}

fn activity_from_row(row: &Row<'_>) -> rusqlite::Result<Activity> {
    Ok(Activity {
        id: id_at(row, 0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        start_time: row.get(3)?,
        location_address: row.get(4)?,
        status: status_at(row, 5)?,
        created_at: timestamp_at(row, 6)?,
        updated_at: timestamp_at(row, 7)?,
        participants: Vec::new(),
    })
}

impl super::Database {
    /// Creates a new activity in the `planning` state.
    pub fn create_activity(&mut self, fields: &ActivityFields<'_>) -> Result<Activity> {
        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;

        let now = Timestamp::now();
        tx.execute(
            INSERT_ACTIVITY_SQL,
            params![
                fields.title,
                fields.description,
                fields.start_time,
                fields.location_address,
                ActivityStatus::Planning.as_str(),
                now.to_string()
            ],
        )
        .db_context("Failed to insert activity")?;
        let id = tx.last_insert_rowid() as u64;

        tx.commit().db_context("Failed to commit transaction")?;

        Ok(Activity {
            id,
            title: fields.title.map(String::from),
            description: fields.description.map(String::from),
            start_time: fields.start_time.map(String::from),
            location_address: fields.location_address.map(String::from),
            status: ActivityStatus::Planning,
            created_at: now,
            updated_at: now,
            participants: Vec::new(),
        })
    }

    /// Retrieves an activity by its ID, with its participants.
    pub fn get_activity(&self, id: u64) -> Result<Option<Activity>> {
        let mut activity = self
            .connection
            .query_row(
                &format!("SELECT {ACTIVITY_COLUMNS} FROM activities WHERE id = ?1"),
                params![id as i64],
                activity_from_row,
            )
            .optional()
            .db_context("Failed to query activity")?;

        if let Some(ref mut activity) = activity {
            activity.participants = self.get_participants(activity.id)?;
        }

        Ok(activity)
    }

    /// Returns true if an activity with this ID exists.
    pub fn activity_exists(&self, id: u64) -> Result<bool> {
        self.connection
            .query_row(
                "SELECT EXISTS(SELECT 1 FROM activities WHERE id = ?1)",
                params![id as i64],
                |row| row.get(0),
            )
            .db_context("Failed to check activity existence")
    }

    /// Lists activities, newest first, optionally restricted to one status.
    pub fn list_activities(&self, status: Option<ActivityStatus>) -> Result<Vec<Activity>> {
        let mut query = format!("SELECT {ACTIVITY_COLUMNS} FROM activities");
        let mut params_vec: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();
        if let Some(status) = status {
            query.push_str(" WHERE status = ?");
            params_vec.push(Box::new(status.as_str()));
        }
        query.push_str(" ORDER BY id DESC");

        let mut stmt = self
            .connection
            .prepare(&query)
            .db_context("Failed to prepare query")?;
        let params_refs: Vec<&dyn rusqlite::ToSql> = params_vec.iter().map(|b| &**b).collect();

        let mut activities = stmt
            .query_map(&params_refs[..], activity_from_row)
            .db_context("Failed to query activities")?
            .collect::<std::result::Result<Vec<_>, _>>()
            .db_context("Failed to fetch activities")?;

        for activity in &mut activities {
            activity.participants = self.get_participants(activity.id)?;
        }

        Ok(activities)
    }

    /// Updates the given fields. Returns `None` if the activity doesn't exist.
    pub fn update_activity(&mut self, id: u64, fields: &ActivityFields<'_>) -> Result<Option<Activity>> {
        let rows = self
            .connection
            .execute(
                UPDATE_ACTIVITY_SQL,
                params![
                    fields.title,
                    fields.description,
                    fields.start_time,
                    fields.location_address,
                    Timestamp::now().to_string(),
                    id as i64
                ],
            )
            .db_context("Failed to update activity")?;

        if rows == 0 {
            return Ok(None);
        }
        self.get_activity(id)
    }

    /// Sets the activity's lifecycle status. Returns false if it doesn't exist.
    pub fn set_activity_status(&mut self, id: u64, status: ActivityStatus) -> Result<bool> {
        let rows = self
            .connection
            .execute(
                UPDATE_ACTIVITY_STATUS_SQL,
                params![status.as_str(), Timestamp::now().to_string(), id as i64],
            )
            .db_context("Failed to update activity status")?;
        Ok(rows > 0)
    }

    /// Permanently deletes an activity with its participants, preferences,
    /// plans and approvals. Returns false if it doesn't exist.
    pub fn delete_activity(&mut self, id: u64) -> Result<bool> {
        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;

        let rows = tx
            .execute(DELETE_ACTIVITY_SQL, params![id as i64])
            .db_context("Failed to delete activity")?;

        tx.commit().db_context("Failed to commit transaction")?;
        Ok(rows > 0)
    }
}
