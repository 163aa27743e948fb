//! Participant model definition.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use super::ParticipantStatus;

/// An invitee, identified by phone number within an activity.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Participant {
    /// Unique identifier for the participant
    pub id: u64,

    /// Activity the participant was invited to
    pub activity_id: u64,

    /// Display name, once known
    pub name: Option<String>,

    /// Phone number the invitation went to
    pub phone_number: String,

    /// E-mail address, once known
    pub email: Option<String>,

    /// Whether the participant opted into group texts
    #[serde(default)]
    pub allow_group_text: bool,

    /// Questionnaire progress
    #[serde(default)]
    pub status: ParticipantStatus,

    /// Timestamp when the participant was added (UTC)
    pub created_at: Timestamp,

    /// Timestamp when the participant was last modified (UTC)
    pub updated_at: Timestamp,
}

impl Participant {
    /// Name if known, otherwise the phone number.
    pub fn label(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.phone_number)
    }
}
