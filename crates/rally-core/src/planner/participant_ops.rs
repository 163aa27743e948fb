//! Participant and questionnaire operations for the Planner.

use log::{debug, info};
use serde::Serialize;
use serde_json::Value;

use super::Planner;
use crate::{
    db::{participant_queries::ParticipantFields, preference_queries::PreferenceEntry},
    engine::QuestionBatch,
    error::{PlannerError, Result},
    models::{is_truthy, Participant, ParticipantStatus},
    params::{AddParticipant, Id, SubmitAnswers, UpdateParticipant},
};

/// Result of submitting a batch of answers.
#[derive(Debug, Clone, Serialize)]
pub struct AnswerSubmission {
    /// The participant after the answers were applied
    pub participant: Participant,
    /// Questions still to ask; `None` once the questionnaire is complete
    pub next_batch: Option<QuestionBatch>,
}

fn answer_text(value: &Value) -> Option<String> {
    value
        .as_str()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
}

impl Planner {
    /// Adds a participant to an activity.
    ///
    /// A phone number already in the activity returns the existing
    /// participant, with a missing name or e-mail filled in.
    pub async fn add_participant(&self, params: &AddParticipant) -> Result<Participant> {
        let phone_number = params.phone_number.trim().to_string();
        if phone_number.is_empty() {
            return Err(PlannerError::invalid_input("phone_number").with_reason("must not be empty"));
        }

        let activity_id = params.activity_id;
        let email = params.email.clone();
        let name = params.name.clone();

        let (participant, created) = self
            .with_db(move |db| {
                if !db.activity_exists(activity_id)? {
                    return Err(PlannerError::ActivityNotFound { id: activity_id });
                }
                db.add_participant(activity_id, &phone_number, email.as_deref(), name.as_deref())
            })
            .await?;

        if created {
            info!("Added participant {} to activity {activity_id}", participant.id);
        } else {
            debug!("Participant {} already in activity {activity_id}", participant.id);
        }
        Ok(participant)
    }

    /// Retrieves a participant by ID.
    pub async fn get_participant(&self, params: &Id) -> Result<Participant> {
        let id = params.id;
        self.with_db(move |db| db.get_participant(id))
            .await?
            .ok_or(PlannerError::ParticipantNotFound { id })
    }

    /// Updates the given fields of a participant.
    pub async fn update_participant(&self, params: &UpdateParticipant) -> Result<Participant> {
        let id = params.id;
        let name = params.name.clone();
        let email = params.email.clone();
        let allow_group_text = params.allow_group_text;

        self.with_db(move |db| {
            db.update_participant(
                id,
                &ParticipantFields {
                    name: name.as_deref(),
                    email: email.as_deref(),
                    allow_group_text,
                    status: None,
                },
            )
        })
        .await?
        .ok_or(PlannerError::ParticipantNotFound { id })
    }

    /// The next batch of questions for a participant, or `None` when every
    /// batch has been answered.
    pub async fn next_questions(&self, params: &Id) -> Result<Option<QuestionBatch>> {
        let id = params.id;
        let bank = self.question_bank;

        self.with_db(move |db| {
            if db.get_participant(id)?.is_none() {
                return Err(PlannerError::ParticipantNotFound { id });
            }
            let answered = db.get_participant_preferences(id)?;
            Ok(bank.next_batch(&answered).cloned())
        })
        .await
    }

    /// Records answers keyed by question ID.
    ///
    /// Each answer is stored under its question's category. Contact answers
    /// are also copied onto the participant. The participant becomes
    /// `active`, or `complete` when no batch is left.
    pub async fn submit_answers(&self, params: &SubmitAnswers) -> Result<AnswerSubmission> {
        if params.answers.is_empty() {
            return Err(PlannerError::invalid_input("answers").with_reason("no answers given"));
        }

        let id = params.participant_id;
        let bank = self.question_bank;
        let entries: Vec<PreferenceEntry> = params
            .answers
            .iter()
            .map(|(question_id, value)| {
                (
                    bank.category_for(question_id).to_string(),
                    question_id.clone(),
                    value.clone(),
                )
            })
            .collect();
        let name = params.answers.get("name").and_then(answer_text);
        let email = params.answers.get("email").and_then(answer_text);
        let allow_group_text = params.answers.get("allow_group_text").map(is_truthy);

        let submission = self
            .with_db(move |db| {
                let participant = db
                    .get_participant(id)?
                    .ok_or(PlannerError::ParticipantNotFound { id })?;
                db.save_preferences(participant.activity_id, Some(id), &entries)?;

                let answered = db.get_participant_preferences(id)?;
                let next_batch = bank.next_batch(&answered).cloned();
                let status = if next_batch.is_some() {
                    ParticipantStatus::Active
                } else {
                    ParticipantStatus::Complete
                };

                let participant = db
                    .update_participant(
                        id,
                        &ParticipantFields {
                            name: name.as_deref(),
                            email: email.as_deref(),
                            allow_group_text,
                            status: Some(status),
                        },
                    )?
                    .ok_or(PlannerError::ParticipantNotFound { id })?;

                Ok(AnswerSubmission {
                    participant,
                    next_batch,
                })
            })
            .await?;

        debug!(
            "Participant {id} answered {} questions, now {}",
            params.answers.len(),
            submission.participant.status.as_str()
        );
        Ok(submission)
    }

    /// Forgets every answer a participant gave and marks them `invited`
    /// again.
    pub async fn reset_participant(&self, params: &Id) -> Result<Participant> {
        let id = params.id;

        let (participant, removed) = self
            .with_db(move |db| {
                if db.get_participant(id)?.is_none() {
                    return Err(PlannerError::ParticipantNotFound { id });
                }
                let removed = db.delete_participant_preferences(id)?;
                let participant = db
                    .update_participant(
                        id,
                        &ParticipantFields {
                            status: Some(ParticipantStatus::Invited),
                            ..Default::default()
                        },
                    )?
                    .ok_or(PlannerError::ParticipantNotFound { id })?;
                Ok((participant, removed))
            })
            .await?;

        info!("Reset participant {id}, removed {removed} answers");
        Ok(participant)
    }
}
