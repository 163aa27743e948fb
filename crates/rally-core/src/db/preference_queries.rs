//! Preference storage.
//!
//! Values are written as JSON with [`encode_value`] and read back with
//! [`decode_value`], so every value keeps its type. A row whose text is not
//! valid JSON comes back as a plain string.

use jiff::Timestamp;
use rusqlite::{params, Transaction};

use super::optional_id_at;
use crate::{
    error::{DatabaseResultExt, Result},
    models::{decode_value, encode_value, Categories, PreferenceSet, PreferenceValue},
};

const UPDATE_PREFERENCE_SQL: &str = "UPDATE preferences SET value = ?1, updated_at = ?2 WHERE activity_id = ?3 AND participant_id IS ?4 AND category = ?5 AND key = ?6";
const INSERT_PREFERENCE_SQL: &str = "INSERT INTO preferences (activity_id, participant_id, category, key, value, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)";
const SELECT_ACTIVITY_PREFERENCES_SQL: &str = "SELECT participant_id, category, key, value FROM preferences WHERE activity_id = ?1 ORDER BY id";
const SELECT_PARTICIPANT_PREFERENCES_SQL: &str =
    "SELECT category, key, value FROM preferences WHERE participant_id = ?1 ORDER BY id";
const DELETE_PARTICIPANT_PREFERENCES_SQL: &str = "DELETE FROM preferences WHERE participant_id = ?1";

/// One `(category, key, value)` answer.
pub type PreferenceEntry = (String, String, PreferenceValue);

fn upsert(
    tx: &Transaction<'_>,
    activity_id: u64,
    participant_id: Option<u64>,
    category: &str,
    key: &str,
    value: &PreferenceValue,
) -> Result<()> {
    let encoded = encode_value(value);
    let now = Timestamp::now().to_string();
    let participant = participant_id.map(|id| id as i64);

    let rows = tx
        .execute(
            UPDATE_PREFERENCE_SQL,
            params![&encoded, &now, activity_id as i64, participant, category, key],
        )
        .db_context("Failed to update preference")?;
    if rows == 0 {
        tx.execute(
            INSERT_PREFERENCE_SQL,
            params![activity_id as i64, participant, category, key, &encoded, &now],
        )
        .db_context("Failed to insert preference")?;
    }
    Ok(())
}

impl super::Database {
    /// Stores one preference, replacing any earlier value for the same
    /// participant, category and key. `participant_id = None` stores an
    /// activity-level preference.
    pub fn save_preference(
        &mut self,
        activity_id: u64,
        participant_id: Option<u64>,
        category: &str,
        key: &str,
        value: &PreferenceValue,
    ) -> Result<()> {
        self.save_preferences(
            activity_id,
            participant_id,
            &[(category.to_string(), key.to_string(), value.clone())],
        )
    }

    /// Stores several preferences in one transaction.
    pub fn save_preferences(
        &mut self,
        activity_id: u64,
        participant_id: Option<u64>,
        entries: &[PreferenceEntry],
    ) -> Result<()> {
        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;

        for (category, key, value) in entries {
            upsert(&tx, activity_id, participant_id, category, key, value)?;
        }

        tx.commit().db_context("Failed to commit transaction")
    }

    /// A participant's answers grouped by category.
    pub fn get_participant_preferences(&self, participant_id: u64) -> Result<Categories> {
        let mut stmt = self
            .connection
            .prepare(SELECT_PARTICIPANT_PREFERENCES_SQL)
            .db_context("Failed to prepare query")?;

        let rows = stmt
            .query_map(params![participant_id as i64], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                ))
            })
            .db_context("Failed to query preferences")?
            .collect::<std::result::Result<Vec<_>, _>>()
            .db_context("Failed to fetch preferences")?;

        let mut categories = Categories::new();
        for (category, key, raw) in rows {
            categories
                .entry(category)
                .or_default()
                .insert(key, decode_value(&raw));
        }
        Ok(categories)
    }

    /// Every preference recorded for an activity.
    pub fn get_all_preferences(&self, activity_id: u64) -> Result<PreferenceSet> {
        let mut stmt = self
            .connection
            .prepare(SELECT_ACTIVITY_PREFERENCES_SQL)
            .db_context("Failed to prepare query")?;

        let rows = stmt
            .query_map(params![activity_id as i64], |row| {
                Ok((
                    optional_id_at(row, 0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                ))
            })
            .db_context("Failed to query preferences")?
            .collect::<std::result::Result<Vec<_>, _>>()
            .db_context("Failed to fetch preferences")?;

        let mut set = PreferenceSet::new();
        for (participant_id, category, key, raw) in rows {
            set.insert(participant_id, category, key, decode_value(&raw));
        }
        Ok(set)
    }

    /// Removes every answer a participant gave. Returns how many were removed.
    pub fn delete_participant_preferences(&mut self, participant_id: u64) -> Result<usize> {
        self.connection
            .execute(DELETE_PARTICIPANT_PREFERENCES_SQL, params![participant_id as i64])
            .db_context("Failed to delete preferences")
    }
}
