//! Plan model definition and related functionality.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use super::{PlanStatus, ScheduleBlock};

/// A synthesized, human-presentable plan for an activity.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Plan {
    /// Unique identifier for the plan
    pub id: u64,

    /// Activity the plan belongs to
    pub activity_id: u64,

    /// Title of the plan
    pub title: String,

    /// Multi-paragraph description, including the schedule text
    pub description: String,

    /// Structured tentative schedule
    #[serde(default)]
    pub schedule: Vec<ScheduleBlock>,

    /// Lifecycle status
    #[serde(default)]
    pub status: PlanStatus,

    /// Plan this one was revised from, if any
    pub revised_from: Option<u64>,

    /// Timestamp when the plan was created (UTC)
    pub created_at: Timestamp,

    /// Timestamp when the plan was last modified (UTC)
    pub updated_at: Timestamp,

    /// Participant approvals (eagerly loaded)
    #[serde(default)]
    pub approvals: Vec<PlanApproval>,
}

/// A participant's verdict on a plan sent out for approval.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlanApproval {
    /// Plan being approved
    pub plan_id: u64,

    /// Participant giving the verdict
    pub participant_id: u64,

    /// Whether the participant approved
    pub approved: bool,

    /// Optional comment, usually given with a rejection
    pub feedback: Option<String>,

    /// Timestamp of the latest verdict (UTC)
    pub updated_at: Timestamp,
}

/// A plan produced by the engine, before it is stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanDraft {
    /// Title of the plan
    pub title: String,
    /// Full description
    pub description: String,
    /// Tentative schedule
    pub schedule: Vec<ScheduleBlock>,
}
