//! Participant queries.

use jiff::Timestamp;
use rusqlite::{params, OptionalExtension, Row};

use super::{id_at, status_at, timestamp_at};
use crate::{
    error::{DatabaseResultExt, Result},
    models::{Participant, ParticipantStatus},
};

const PARTICIPANT_COLUMNS: &str =
    "id, activity_id, name, phone_number, email, allow_group_text, status, created_at, updated_at";
const INSERT_PARTICIPANT_SQL: &str = "INSERT INTO participants (activity_id, name, phone_number, email, allow_group_text, status, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, 0, ?5, ?6, ?6)";
const FILL_PARTICIPANT_SQL: &str = "UPDATE participants SET name = COALESCE(name, ?1), email = COALESCE(email, ?2), updated_at = ?3 WHERE id = ?4";
const UPDATE_PARTICIPANT_SQL: &str = "UPDATE participants SET name = COALESCE(?1, name), email = COALESCE(?2, email), allow_group_text = COALESCE(?3, allow_group_text), status = COALESCE(?4, status), updated_at = ?5 WHERE id = ?6";

/// Fields that can be changed on a participant. `None` leaves a field as it
/// is.
#[derive(Debug, Clone, Copy, Default)]
pub struct ParticipantFields<'a> {
    pub name: Option<&'a str>,
    pub email: Option<&'a str>,
    pub allow_group_text: Option<bool>,
    pub status: Option<ParticipantStatus>,
}

fn participant_from_row(row: &Row<'_>) -> rusqlite::Result<Participant> {
    Ok(Participant {
        id: id_at(row, 0)?,
        activity_id: id_at(row, 1)?,
        name: row.get(2)?,
        phone_number: row.get(3)?,
        email: row.get(4)?,
        allow_group_text: row.get(5)?,
        status: status_at(row, 6)?,
        created_at: timestamp_at(row, 7)?,
        updated_at: timestamp_at(row, 8)?,
    })
}

impl super::Database {
    /// Adds a participant, or returns the existing one with the same phone
    /// number in this activity.
    ///
    /// An existing participant keeps their name and e-mail; only missing
    /// values are filled in. The flag is true when a new row was created.
    pub fn add_participant(
        &mut self,
        activity_id: u64,
        phone_number: &str,
        email: Option<&str>,
        name: Option<&str>,
    ) -> Result<(Participant, bool)> {
        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;
        let now = Timestamp::now().to_string();

        let existing: Option<i64> = tx
            .query_row(
                "SELECT id FROM participants WHERE activity_id = ?1 AND phone_number = ?2",
                params![activity_id as i64, phone_number],
                |row| row.get(0),
            )
            .optional()
            .db_context("Failed to look up participant")?;

        let (id, created) = match existing {
            Some(id) => {
                tx.execute(FILL_PARTICIPANT_SQL, params![name, email, &now, id])
                    .db_context("Failed to update participant")?;
                (id, false)
            }
            None => {
                tx.execute(
                    INSERT_PARTICIPANT_SQL,
                    params![
                        activity_id as i64,
                        name,
                        phone_number,
                        email,
                        ParticipantStatus::Invited.as_str(),
                        &now
                    ],
                )
                .db_context("Failed to insert participant")?;
                (tx.last_insert_rowid(), true)
            }
        };

        let participant = tx
            .query_row(
                &format!("SELECT {PARTICIPANT_COLUMNS} FROM participants WHERE id = ?1"),
                params![id],
                participant_from_row,
            )
            .db_context("Failed to query participant")?;

        tx.commit().db_context("Failed to commit transaction")?;
        Ok((participant, created))
    }

    /// Retrieves a participant by ID.
    pub fn get_participant(&self, id: u64) -> Result<Option<Participant>> {
        self.connection
            .query_row(
                &format!("SELECT {PARTICIPANT_COLUMNS} FROM participants WHERE id = ?1"),
                params![id as i64],
                participant_from_row,
            )
            .optional()
            .db_context("Failed to query participant")
    }

    /// All participants of an activity, in the order they were added.
    pub fn get_participants(&self, activity_id: u64) -> Result<Vec<Participant>> {
        let mut stmt = self
            .connection
            .prepare(&format!(
                "SELECT {PARTICIPANT_COLUMNS} FROM participants WHERE activity_id = ?1 ORDER BY id"
            ))
            .db_context("Failed to prepare query")?;

        let participants = stmt
            .query_map(params![activity_id as i64], participant_from_row)
            .db_context("Failed to query participants")?
            .collect::<std::result::Result<Vec<_>, _>>()
            .db_context("Failed to fetch participants")?;

        Ok(participants)
    }

    /// Updates the given fields. Returns `None` if the participant doesn't
    /// exist.
    pub fn update_participant(
        &mut self,
        id: u64,
        fields: &ParticipantFields<'_>,
    ) -> Result<Option<Participant>> {
        let rows = self
            .connection
            .execute(
                UPDATE_PARTICIPANT_SQL,
                params![
                    fields.name,
                    fields.email,
                    fields.allow_group_text,
                    fields.status.map(|s| s.as_str()),
                    Timestamp::now().to_string(),
                    id as i64
                ],
            )
            .db_context("Failed to update participant")?;

        if rows == 0 {
            return Ok(None);
        }
        self.get_participant(id)
    }
}
