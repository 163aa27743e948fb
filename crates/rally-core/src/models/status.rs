//! Status enumerations for activities, participants and plans.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Lifecycle of an activity planning session.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ActivityStatus {
    /// Collecting participants and preferences
    #[default]
    Planning,

    /// At least one plan has been generated
    Planned,

    /// A plan has been finalized
    Finalized,
}

impl FromStr for ActivityStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "planning" => Ok(ActivityStatus::Planning),
            "planned" => Ok(ActivityStatus::Planned),
            "finalized" => Ok(ActivityStatus::Finalized),
            _ => Err(format!("Invalid activity status: {s}")),
        }
    }
}

impl ActivityStatus {
    /// Convert to database string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityStatus::Planning => "planning",
            ActivityStatus::Planned => "planned",
            ActivityStatus::Finalized => "finalized",
        }
    }
}

/// Progress of a participant through the questionnaire.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ParticipantStatus {
    /// Invited but has not answered anything yet
    #[default]
    Invited,

    /// Has submitted at least one batch of answers
    Active,

    /// Has answered every question batch
    Complete,
}

impl FromStr for ParticipantStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "invited" => Ok(ParticipantStatus::Invited),
            "active" => Ok(ParticipantStatus::Active),
            "complete" => Ok(ParticipantStatus::Complete),
            _ => Err(format!("Invalid participant status: {s}")),
        }
    }
}

impl ParticipantStatus {
    /// Convert to database string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            ParticipantStatus::Invited => "invited",
            ParticipantStatus::Active => "active",
            ParticipantStatus::Complete => "complete",
        }
    }
}

/// Type-safe enumeration of plan statuses.
///
/// Plans move `draft → revised* → pending_approval → final`. A revision is
/// always stored as a new plan, so `revised` describes the new record.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum PlanStatus {
    /// Freshly generated
    #[default]
    Draft,

    /// Produced from feedback on an earlier plan
    Revised,

    /// Waiting for participants to approve
    PendingApproval,

    /// Accepted; no further changes
    Final,
}

impl FromStr for PlanStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "draft" => Ok(PlanStatus::Draft),
            "revised" => Ok(PlanStatus::Revised),
            "pending_approval" | "pendingapproval" => Ok(PlanStatus::PendingApproval),
            "final" => Ok(PlanStatus::Final),
            _ => Err(format!("Invalid plan status: {s}")),
        }
    }
}

impl PlanStatus {
    /// Convert to database string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            PlanStatus::Draft => "draft",
            PlanStatus::Revised => "revised",
            PlanStatus::PendingApproval => "pending_approval",
            PlanStatus::Final => "final",
        }
    }

    /// Whether a plan in this status may move to `next`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use rally_core::models::PlanStatus;
    ///
    /// assert!(PlanStatus::Draft.can_transition_to(PlanStatus::PendingApproval));
    /// assert!(!PlanStatus::Final.can_transition_to(PlanStatus::Revised));
    /// ```
    pub fn can_transition_to(&self, next: PlanStatus) -> bool {
        use PlanStatus::*;
        matches!(
            (self, next),
            (Draft | Revised | PendingApproval, Revised)
                | (Draft | Revised, PendingApproval)
                | (Draft | Revised | PendingApproval, Final)
        )
    }

    /// Get status with a marker for display.
    pub fn with_icon(&self) -> &'static str {
        match self {
            PlanStatus::Draft => "○ Draft",
            PlanStatus::Revised => "↻ Revised",
            PlanStatus::PendingApproval => "➤ Pending approval",
            PlanStatus::Final => "✓ Final",
        }
    }
}
