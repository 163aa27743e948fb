//! Plan operations for the Planner.

use log::{info, warn};
use serde_json::Value;
use tokio::task;

use super::Planner;
use crate::{
    engine::{apply_suggestion, draft_plan, revise_draft, DraftOptions, PlanningBrief, Suggestion},
    error::{PlannerError, Result},
    models::{ActivityStatus, ClockTime, Plan, PlanApproval, PlanStatus},
    params::{ActivityId, Id, RecordApproval, RevisePlan},
};

impl Planner {
    /// Asks the configured advisor, if any, for a suggestion.
    ///
    /// A panicking advisor is reported as a failed suggestion.
    async fn consult(&self, brief: PlanningBrief) -> Option<Suggestion> {
        let advisor = self.advisor.clone()?;
        let suggestion = task::spawn_blocking(move || advisor.suggest(&brief))
            .await
            .unwrap_or_else(|e| Suggestion::Failed(format!("advisor task failed: {e}")));
        Some(suggestion)
    }

    /// Generates a plan from everything the participants have answered and
    /// stores it as a `draft`. The activity moves to `planned`.
    pub async fn generate_plan(&self, params: &ActivityId) -> Result<Plan> {
        let activity_id = params.activity_id;
        let (activity, preferences) = self
            .with_db(move |db| {
                let activity = db
                    .get_activity(activity_id)?
                    .ok_or(PlannerError::ActivityNotFound { id: activity_id })?;
                let preferences = db.get_all_preferences(activity_id)?;
                Ok((activity, preferences))
            })
            .await?;

        let start_time = activity
            .start_time
            .as_deref()
            .and_then(|s| match ClockTime::parse(s) {
                Ok(time) => Some(time),
                Err(e) => {
                    warn!("Ignoring start time of activity {activity_id}: {e}");
                    None
                }
            });
        let options = DraftOptions::new(self.today()).with_start_time(start_time);
        let mut draft = draft_plan(&preferences, &options);

        if let Some(suggestion) = self
            .consult(PlanningBrief::for_generation(activity_id, &preferences))
            .await
        {
            draft = apply_suggestion(draft, suggestion);
        }

        let plan = self
            .with_db(move |db| {
                db.create_plan(
                    activity_id,
                    &draft,
                    PlanStatus::Draft,
                    None,
                    Some(ActivityStatus::Planned),
                )
            })
            .await?;
        info!("Generated plan {} for activity {activity_id}", plan.id);
        Ok(plan)
    }

    /// Retrieves a plan with its approvals.
    pub async fn get_plan(&self, params: &Id) -> Result<Plan> {
        let id = params.id;
        self.with_db(move |db| db.get_plan(id))
            .await?
            .ok_or(PlannerError::PlanNotFound { id })
    }

    /// The activity's most recent plan, or `None` if none was generated yet.
    pub async fn current_plan(&self, params: &ActivityId) -> Result<Option<Plan>> {
        let id = params.activity_id;
        self.with_db(move |db| {
            if !db.activity_exists(id)? {
                return Err(PlannerError::ActivityNotFound { id });
            }
            db.current_plan(id)
        })
        .await
    }

    /// Every plan of an activity, most recent first.
    pub async fn list_plans(&self, params: &ActivityId) -> Result<Vec<Plan>> {
        let id = params.activity_id;
        self.with_db(move |db| {
            if !db.activity_exists(id)? {
                return Err(PlannerError::ActivityNotFound { id });
            }
            db.list_plans(id)
        })
        .await
    }

    /// Revises a plan in light of feedback.
    ///
    /// The revision is stored as a new plan in the `revised` state that
    /// points back at the original; the original is left untouched. Feedback
    /// from a participant is also kept as their `feedback.plan_feedback`
    /// preference.
    pub async fn revise_plan(&self, params: &RevisePlan) -> Result<Plan> {
        let feedback = params.feedback.trim().to_string();
        if feedback.is_empty() {
            return Err(PlannerError::invalid_input("feedback").with_reason("must not be empty"));
        }

        let plan_id = params.plan_id;
        let participant_id = params.participant_id;
        let stored_feedback = feedback.clone();
        let (plan, preferences) = self
            .with_db(move |db| {
                let plan = db
                    .get_plan(plan_id)?
                    .ok_or(PlannerError::PlanNotFound { id: plan_id })?;
                if !plan.status.can_transition_to(PlanStatus::Revised) {
                    return Err(PlannerError::InvalidTransition {
                        from: plan.status.as_str().to_string(),
                        to: PlanStatus::Revised.as_str().to_string(),
                    });
                }

                if let Some(id) = participant_id {
                    let participant = db
                        .get_participant(id)?
                        .ok_or(PlannerError::ParticipantNotFound { id })?;
                    if participant.activity_id != plan.activity_id {
                        return Err(PlannerError::invalid_parameter(
                            "participant_id",
                            format!("participant {id} is not part of activity {}", plan.activity_id),
                        ));
                    }
                    db.save_preference(
                        plan.activity_id,
                        Some(id),
                        "feedback",
                        "plan_feedback",
                        &Value::String(stored_feedback),
                    )?;
                }

                let preferences = db.get_all_preferences(plan.activity_id)?;
                Ok((plan, preferences))
            })
            .await?;

        let suggestion = self
            .consult(PlanningBrief::for_revision(
                plan.activity_id,
                &preferences,
                &plan.description,
                &feedback,
            ))
            .await;
        let draft = revise_draft(
            &plan.title,
            &plan.description,
            &plan.schedule,
            &feedback,
            suggestion,
        );

        let activity_id = plan.activity_id;
        let revised = self
            .with_db(move |db| {
                db.create_plan(activity_id, &draft, PlanStatus::Revised, Some(plan_id), None)
            })
            .await?;
        info!("Revised plan {plan_id} into plan {}", revised.id);
        Ok(revised)
    }

    /// Puts a plan in front of the participants for approval.
    pub async fn request_approval(&self, params: &Id) -> Result<Plan> {
        let id = params.id;
        self.with_db(move |db| db.transition_plan(id, PlanStatus::PendingApproval, None))
            .await
    }

    /// Records a participant's verdict on a plan awaiting approval.
    pub async fn record_approval(&self, params: &RecordApproval) -> Result<PlanApproval> {
        let plan_id = params.plan_id;
        let participant_id = params.participant_id;
        let approved = params.approved;
        let feedback = params
            .feedback
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from);

        self.with_db(move |db| {
            let plan = db
                .get_plan(plan_id)?
                .ok_or(PlannerError::PlanNotFound { id: plan_id })?;
            if plan.status != PlanStatus::PendingApproval {
                return Err(PlannerError::invalid_input("plan_id").with_reason(format!(
                    "plan {plan_id} is {}, not awaiting approval",
                    plan.status.as_str()
                )));
            }

            let participant = db
                .get_participant(participant_id)?
                .ok_or(PlannerError::ParticipantNotFound { id: participant_id })?;
            if participant.activity_id != plan.activity_id {
                return Err(PlannerError::invalid_parameter(
                    "participant_id",
                    format!(
                        "participant {participant_id} is not part of activity {}",
                        plan.activity_id
                    ),
                ));
            }

            db.record_approval(plan_id, participant_id, approved, feedback.as_deref())
        })
        .await
    }

    /// Accepts a plan as final. The activity moves to `finalized`.
    pub async fn finalize_plan(&self, params: &Id) -> Result<Plan> {
        let id = params.id;
        let plan = self
            .with_db(move |db| {
                db.transition_plan(id, PlanStatus::Final, Some(ActivityStatus::Finalized))
            })
            .await?;
        info!("Finalized plan {id} for activity {}", plan.activity_id);
        Ok(plan)
    }
}
