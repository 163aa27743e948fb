//! Activity model definition.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use super::{ActivityStatus, Participant};

/// One planning session for a group outing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Activity {
    /// Unique identifier for the activity
    pub id: u64,

    /// Optional organizer-supplied title
    pub title: Option<String>,

    /// Optional organizer-supplied description
    pub description: Option<String>,

    /// Organizer override for the start time, e.g. `14:30` or `9:00 AM`
    pub start_time: Option<String>,

    /// Where the group meets
    pub location_address: Option<String>,

    /// Lifecycle status
    #[serde(default)]
    pub status: ActivityStatus,

    /// Timestamp when the activity was created (UTC)
    pub created_at: Timestamp,

    /// Timestamp when the activity was last modified (UTC)
    pub updated_at: Timestamp,

    /// Invited participants, in the order they were added
    #[serde(default)]
    pub participants: Vec<Participant>,
}

impl Activity {
    /// Title to show in lists: the organizer title or a generic label.
    pub fn display_title(&self) -> String {
        self.title
            .clone()
            .unwrap_or_else(|| format!("Activity {}", self.id))
    }
}
