//! Participant response statistics.

use serde::{Deserialize, Serialize};

use super::{Participant, ParticipantStatus};

/// How far the invited participants have got through the questionnaire.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResponseStats {
    /// Number of invited participants
    pub total: u32,
    /// Participants who answered at least one batch
    pub responded: u32,
    /// Participants who finished the questionnaire
    pub completed: u32,
    /// `responded / total` as a percentage
    pub response_rate: f64,
    /// `completed / total` as a percentage
    pub completion_rate: f64,
}

impl ResponseStats {
    /// Computes statistics for a list of participants.
    pub fn from_participants(participants: &[Participant]) -> Self {
        let total = participants.len() as u32;
        let responded = participants
            .iter()
            .filter(|p| p.status != ParticipantStatus::Invited)
            .count() as u32;
        let completed = participants
            .iter()
            .filter(|p| p.status == ParticipantStatus::Complete)
            .count() as u32;
        let rate = |n: u32| {
            if total == 0 {
                0.0
            } else {
                f64::from(n) / f64::from(total) * 100.0
            }
        };

        Self {
            total,
            responded,
            completed,
            response_rate: rate(responded),
            completion_rate: rate(completed),
        }
    }
}
