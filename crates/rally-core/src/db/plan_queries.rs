//! Plan history, lifecycle transitions and approvals.

use jiff::Timestamp;
use rusqlite::{params, types::Type, OptionalExtension, Row};

use super::{id_at, optional_id_at, status_at, timestamp_at};
use crate::{
    error::{DatabaseResultExt, PlannerError, Result},
    models::{ActivityStatus, Plan, PlanApproval, PlanDraft, PlanStatus, ScheduleBlock},
};

const PLAN_COLUMNS: &str =
    "id, activity_id, title, description, schedule, status, revised_from, created_at, updated_at";
const INSERT_PLAN_SQL: &str = "INSERT INTO plans (activity_id, title, description, schedule, status, revised_from, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7)";
const UPDATE_PLAN_STATUS_SQL: &str = "UPDATE plans SET status = ?1, updated_at = ?2 WHERE id = ?3";
const UPDATE_ACTIVITY_STATUS_SQL: &str =
    "UPDATE activities SET status = ?1, updated_at = ?2 WHERE id = ?3";
const UPSERT_APPROVAL_SQL: &str = "INSERT INTO plan_approvals (plan_id, participant_id, approved, feedback, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?5) ON CONFLICT (plan_id, participant_id) DO UPDATE SET approved = excluded.approved, feedback = excluded.feedback, updated_at = excluded.updated_at";
const SELECT_APPROVALS_SQL: &str = "SELECT plan_id, participant_id, approved, feedback, updated_at FROM plan_approvals WHERE plan_id = ?1 ORDER BY participant_id";

fn plan_from_row(row: &Row<'_>) -> rusqlite::Result<Plan> {
    let schedule_json: String = row.get(4)?;
    let schedule = serde_json::from_str::<Vec<ScheduleBlock>>(&schedule_json)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(4, Type::Text, Box::new(e)))?;

    Ok(Plan {
        id: id_at(row, 0)?,
        activity_id: id_at(row, 1)?,
        title: row.get(2)?,
        description: row.get(3)?,
        schedule,
        status: status_at(row, 5)?,
        revised_from: optional_id_at(row, 6)?,
        created_at: timestamp_at(row, 7)?,
        updated_at: timestamp_at(row, 8)?,
        approvals: Vec::new(),
    })
}

fn approval_from_row(row: &Row<'_>) -> rusqlite::Result<PlanApproval> {
    Ok(PlanApproval {
        plan_id: id_at(row, 0)?,
        participant_id: id_at(row, 1)?,
        approved: row.get(2)?,
        feedback: row.get(3)?,
        updated_at: timestamp_at(row, 4)?,
    })
}

impl super::Database {
    /// Stores a new plan record.
    ///
    /// When `activity_status` is given, the owning activity moves to it in
    /// the same transaction.
    pub fn create_plan(
        &mut self,
        activity_id: u64,
        draft: &PlanDraft,
        status: PlanStatus,
        revised_from: Option<u64>,
        activity_status: Option<ActivityStatus>,
    ) -> Result<Plan> {
        let schedule_json = serde_json::to_string(&draft.schedule)?;
        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;

        let now = Timestamp::now();
        let now_str = now.to_string();
        tx.execute(
            INSERT_PLAN_SQL,
            params![
                activity_id as i64,
                &draft.title,
                &draft.description,
                &schedule_json,
                status.as_str(),
                revised_from.map(|id| id as i64),
                &now_str
            ],
        )
        .db_context("Failed to insert plan")?;
        let id = tx.last_insert_rowid() as u64;

        if let Some(activity_status) = activity_status {
            tx.execute(
                UPDATE_ACTIVITY_STATUS_SQL,
                params![activity_status.as_str(), &now_str, activity_id as i64],
            )
            .db_context("Failed to update activity status")?;
        }

        tx.commit().db_context("Failed to commit transaction")?;

        Ok(Plan {
            id,
            activity_id,
            title: draft.title.clone(),
            description: draft.description.clone(),
            schedule: draft.schedule.clone(),
            status,
            revised_from,
            created_at: now,
            updated_at: now,
            approvals: Vec::new(),
        })
    }

    /// Retrieves a plan by its ID, with its approvals.
    pub fn get_plan(&self, id: u64) -> Result<Option<Plan>> {
        let mut plan = self
            .connection
            .query_row(
                &format!("SELECT {PLAN_COLUMNS} FROM plans WHERE id = ?1"),
                params![id as i64],
                plan_from_row,
            )
            .optional()
            .db_context("Failed to query plan")?;

        if let Some(ref mut plan) = plan {
            plan.approvals = self.get_approvals(plan.id)?;
        }
        Ok(plan)
    }

    /// Plans of an activity, most recent first.
    pub fn list_plans(&self, activity_id: u64) -> Result<Vec<Plan>> {
        let mut stmt = self
            .connection
            .prepare(&format!(
                "SELECT {PLAN_COLUMNS} FROM plans WHERE activity_id = ?1 ORDER BY id DESC"
            ))
            .db_context("Failed to prepare query")?;

        let mut plans = stmt
            .query_map(params![activity_id as i64], plan_from_row)
            .db_context("Failed to query plans")?
            .collect::<std::result::Result<Vec<_>, _>>()
            .db_context("Failed to fetch plans")?;

        for plan in &mut plans {
            plan.approvals = self.get_approvals(plan.id)?;
        }
        Ok(plans)
    }

    /// The activity's most recently created plan.
    pub fn current_plan(&self, activity_id: u64) -> Result<Option<Plan>> {
        let mut plan = self
            .connection
            .query_row(
                &format!(
                    "SELECT {PLAN_COLUMNS} FROM plans WHERE activity_id = ?1 ORDER BY id DESC LIMIT 1"
                ),
                params![activity_id as i64],
                plan_from_row,
            )
            .optional()
            .db_context("Failed to query current plan")?;

        if let Some(ref mut plan) = plan {
            plan.approvals = self.get_approvals(plan.id)?;
        }
        Ok(plan)
    }

    /// Moves a plan to `status`, validating the transition.
    ///
    /// When `activity_status` is given, the owning activity moves to it in
    /// the same transaction.
    pub fn transition_plan(
        &mut self,
        id: u64,
        status: PlanStatus,
        activity_status: Option<ActivityStatus>,
    ) -> Result<Plan> {
        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;

        let current = tx
            .query_row(
                "SELECT activity_id, status FROM plans WHERE id = ?1",
                params![id as i64],
                |row| Ok((id_at(row, 0)?, status_at::<PlanStatus>(row, 1)?)),
            )
            .optional()
            .db_context("Failed to query plan")?;
        let Some((activity_id, from)) = current else {
            return Err(PlannerError::PlanNotFound { id });
        };

        if !from.can_transition_to(status) {
            return Err(PlannerError::InvalidTransition {
                from: from.as_str().to_string(),
                to: status.as_str().to_string(),
            });
        }

        let now = Timestamp::now().to_string();
        tx.execute(UPDATE_PLAN_STATUS_SQL, params![status.as_str(), &now, id as i64])
            .db_context("Failed to update plan status")?;
        if let Some(activity_status) = activity_status {
            tx.execute(
                UPDATE_ACTIVITY_STATUS_SQL,
                params![activity_status.as_str(), &now, activity_id as i64],
            )
            .db_context("Failed to update activity status")?;
        }

        tx.commit().db_context("Failed to commit transaction")?;

        self.get_plan(id)?.ok_or(PlannerError::PlanNotFound { id })
    }

    /// Records a participant's verdict, replacing any earlier one.
    pub fn record_approval(
        &mut self,
        plan_id: u64,
        participant_id: u64,
        approved: bool,
        feedback: Option<&str>,
    ) -> Result<PlanApproval> {
        let now = Timestamp::now();
        self.connection
            .execute(
                UPSERT_APPROVAL_SQL,
                params![
                    plan_id as i64,
                    participant_id as i64,
                    approved,
                    feedback,
                    now.to_string()
                ],
            )
            .db_context("Failed to record approval")?;

        Ok(PlanApproval {
            plan_id,
            participant_id,
            approved,
            feedback: feedback.map(String::from),
            updated_at: now,
        })
    }

    /// Approvals recorded for a plan, ordered by participant.
    pub fn get_approvals(&self, plan_id: u64) -> Result<Vec<PlanApproval>> {
        let mut stmt = self
            .connection
            .prepare(SELECT_APPROVALS_SQL)
            .db_context("Failed to prepare query")?;

        let approvals = stmt
            .query_map(params![plan_id as i64], approval_from_row)
            .db_context("Failed to query approvals")?
            .collect::<std::result::Result<Vec<_>, _>>()
            .db_context("Failed to fetch approvals")?;

        Ok(approvals)
    }
}
