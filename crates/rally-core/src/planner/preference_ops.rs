//! Preference operations for the Planner.

use log::debug;
use serde_json::Value;

use super::Planner;
use crate::{
    db::{preference_queries::PreferenceEntry, Database},
    engine::{extract_parameters, ExtractedParameters},
    error::{PlannerError, Result},
    models::{Categories, PreferenceSet},
    params::{ActivityId, ConversationInput, Id, SavePreference},
};

/// Checks that the activity exists and, when given, that the participant
/// belongs to it.
fn check_owner(db: &Database, activity_id: u64, participant_id: Option<u64>) -> Result<()> {
    if !db.activity_exists(activity_id)? {
        return Err(PlannerError::ActivityNotFound { id: activity_id });
    }
    if let Some(id) = participant_id {
        let participant = db
            .get_participant(id)?
            .ok_or(PlannerError::ParticipantNotFound { id })?;
        if participant.activity_id != activity_id {
            return Err(PlannerError::invalid_parameter(
                "participant_id",
                format!("participant {id} is not part of activity {activity_id}"),
            ));
        }
    }
    Ok(())
}

impl Planner {
    /// Stores one preference, replacing any earlier value under the same
    /// category and key.
    pub async fn save_preference(&self, params: &SavePreference) -> Result<()> {
        let category = params.category.trim().to_string();
        let key = params.key.trim().to_string();
        if category.is_empty() {
            return Err(PlannerError::invalid_input("category").with_reason("must not be empty"));
        }
        if key.is_empty() {
            return Err(PlannerError::invalid_input("key").with_reason("must not be empty"));
        }

        let activity_id = params.activity_id;
        let participant_id = params.participant_id;
        let value = params.value.clone();

        self.with_db(move |db| {
            check_owner(db, activity_id, participant_id)?;
            db.save_preference(activity_id, participant_id, &category, &key, &value)
        })
        .await
    }

    /// A participant's answers grouped by category.
    pub async fn get_participant_preferences(&self, params: &Id) -> Result<Categories> {
        let id = params.id;
        self.with_db(move |db| {
            if db.get_participant(id)?.is_none() {
                return Err(PlannerError::ParticipantNotFound { id });
            }
            db.get_participant_preferences(id)
        })
        .await
    }

    /// Every preference recorded for an activity.
    pub async fn get_all_preferences(&self, params: &ActivityId) -> Result<PreferenceSet> {
        let id = params.activity_id;
        self.with_db(move |db| {
            if !db.activity_exists(id)? {
                return Err(PlannerError::ActivityNotFound { id });
            }
            db.get_all_preferences(id)
        })
        .await
    }

    /// Mines a free-text message for planning parameters and stores what it
    /// finds. The message itself is kept as a direct request.
    pub async fn process_conversation_input(
        &self,
        params: &ConversationInput,
    ) -> Result<ExtractedParameters> {
        let text = params.text.clone();
        if text.trim().is_empty() {
            return Err(PlannerError::invalid_input("text").with_reason("must not be empty"));
        }

        let extracted = extract_parameters(&text);
        let mut entries: Vec<PreferenceEntry> = extracted
            .to_preferences()
            .into_iter()
            .map(|(category, key, value)| (category.to_string(), key.to_string(), value))
            .collect();
        entries.push((
            "requirements".to_string(),
            "direct_input".to_string(),
            Value::String(text),
        ));
        debug!("Extracted {} parameters from conversation input", entries.len() - 1);

        let activity_id = params.activity_id;
        let participant_id = params.participant_id;
        self.with_db(move |db| {
            check_owner(db, activity_id, participant_id)?;
            db.save_preferences(activity_id, participant_id, &entries)
        })
        .await?;

        Ok(extracted)
    }
}
