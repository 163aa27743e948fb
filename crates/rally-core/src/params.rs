//! Parameter structures for Rally operations.
//!
//! These structures are shared by every interface (CLI, MCP, library
//! callers). They carry only `serde` derives; JSON schema generation is
//! enabled through the `schema` feature for the MCP server.
//!
//! Interface layers either build these directly or wrap them:
//!
//! ```ignore
//! // In the CLI
//! #[derive(Args)]
//! pub struct AddParticipantArgs { /* clap attributes */ }
//!
//! impl From<AddParticipantArgs> for AddParticipant { /* ... */ }
//! ```

use std::collections::BTreeMap;

#[cfg(feature = "schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Generic parameters for operations requiring just an ID.
///
/// Used for showing a participant or plan, and for plan lifecycle steps
/// such as requesting approval or finalizing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct Id {
    /// The ID of the resource to operate on
    pub id: u64,
}

/// Parameters for operations scoped to one activity.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct ActivityId {
    /// ID of the activity
    pub activity_id: u64,
}

/// Parameters for creating a new activity.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct CreateActivity {
    /// Title of the activity
    pub title: Option<String>,
    /// Optional longer description
    pub description: Option<String>,
    /// Optional start time such as "10:30 AM" or "14:00"
    pub start_time: Option<String>,
    /// Optional meeting address
    pub location_address: Option<String>,
}

/// Parameters for listing activities.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct ListActivities {
    /// Only list activities in this status (planning, planned, finalized)
    pub status: Option<String>,
}

/// Parameters for updating an activity. Omitted fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct UpdateActivity {
    /// ID of the activity to update
    pub id: u64,
    /// New title
    pub title: Option<String>,
    /// New description
    pub description: Option<String>,
    /// New start time such as "10:30 AM" or "14:00"
    pub start_time: Option<String>,
    /// New meeting address
    pub location_address: Option<String>,
}

/// Parameters for deleting an activity.
///
/// Deletion removes participants, preferences, plans and approvals, so it
/// must be confirmed explicitly.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct DeleteActivity {
    /// ID of the activity to delete
    pub id: u64,
    /// Must be true for the deletion to proceed
    #[serde(default)]
    pub confirmed: bool,
}

/// Parameters for adding a participant to an activity.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct AddParticipant {
    /// ID of the activity to join
    pub activity_id: u64,
    /// Phone number; unique within the activity
    pub phone_number: String,
    /// Optional e-mail address
    pub email: Option<String>,
    /// Optional display name
    pub name: Option<String>,
}

/// Parameters for updating a participant. Omitted fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct UpdateParticipant {
    /// ID of the participant to update
    pub id: u64,
    /// New display name
    pub name: Option<String>,
    /// New e-mail address
    pub email: Option<String>,
    /// Whether the participant agrees to group text messages
    pub allow_group_text: Option<bool>,
}

/// Answers to questionnaire questions, keyed by question ID.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct SubmitAnswers {
    /// ID of the answering participant
    pub participant_id: u64,
    /// Question ID to answer; lists are allowed for multi-choice questions
    pub answers: BTreeMap<String, Value>,
}

/// Parameters for storing a single preference.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct SavePreference {
    /// ID of the activity
    pub activity_id: u64,
    /// Participant the preference belongs to; omit for a group preference
    pub participant_id: Option<u64>,
    /// Preference category, e.g. "activity"
    pub category: String,
    /// Preference key, e.g. "activity_type"
    pub key: String,
    /// Preference value; any JSON value
    pub value: Value,
}

/// A free-text message to mine for planning parameters.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct ConversationInput {
    /// ID of the activity
    pub activity_id: u64,
    /// Participant who wrote the message; omit for the organizer
    pub participant_id: Option<u64>,
    /// The message text
    pub text: String,
}

/// Parameters for revising a plan with feedback.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct RevisePlan {
    /// ID of the plan to revise
    pub plan_id: u64,
    /// What should change
    pub feedback: String,
    /// Participant giving the feedback, if any
    pub participant_id: Option<u64>,
}

/// A participant's verdict on a plan awaiting approval.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct RecordApproval {
    /// ID of the plan
    pub plan_id: u64,
    /// ID of the participant
    pub participant_id: u64,
    /// Whether the participant approves
    pub approved: bool,
    /// Optional comment
    pub feedback: Option<String>,
}
