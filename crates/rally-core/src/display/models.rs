//! Display implementations for domain models.
//!
//! All output is markdown, rendered by the CLI and returned verbatim by the
//! MCP server.

use std::fmt;

use super::datetime::LocalDateTime;
use crate::{
    engine::{ExtractedParameters, QuestionBatch, QuestionKind},
    models::{
        Activity, ActivityStatus, Participant, ParticipantStatus, Plan, PlanApproval, PlanStatus,
        ResponseStats,
    },
    planner::AnswerSubmission,
};

impl fmt::Display for ActivityStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl fmt::Display for ParticipantStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl fmt::Display for PlanStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl fmt::Display for Activity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "# {}. {}", self.id, self.display_title())?;
        writeln!(f)?;

        writeln!(f, "- Status: {}", self.status)?;
        if let Some(start) = &self.start_time {
            writeln!(f, "- Start time: {start}")?;
        }
        if let Some(address) = &self.location_address {
            writeln!(f, "- Location: {address}")?;
        }
        writeln!(f, "- Created: {}", LocalDateTime(&self.created_at))?;
        writeln!(f, "- Updated: {}", LocalDateTime(&self.updated_at))?;

        if let Some(desc) = &self.description {
            writeln!(f)?;
            writeln!(f, "{desc}")?;
        }

        if self.participants.is_empty() {
            writeln!(f, "\nNo participants yet.")?;
        } else {
            writeln!(f, "\n## Participants")?;
            writeln!(f)?;
            for participant in &self.participants {
                writeln!(
                    f,
                    "- {} (ID: {}, {})",
                    participant.label(),
                    participant.id,
                    participant.status
                )?;
            }
        }

        Ok(())
    }
}

impl fmt::Display for Participant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "## {} (ID: {})", self.label(), self.id)?;
        writeln!(f)?;
        writeln!(f, "- Activity: {}", self.activity_id)?;
        writeln!(f, "- Phone: {}", self.phone_number)?;
        if let Some(email) = &self.email {
            writeln!(f, "- Email: {email}")?;
        }
        writeln!(
            f,
            "- Group text: {}",
            if self.allow_group_text { "yes" } else { "no" }
        )?;
        writeln!(f, "- Status: {}", self.status)?;
        Ok(())
    }
}

impl fmt::Display for Plan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "# {}. {}", self.id, self.title)?;
        writeln!(f)?;

        writeln!(f, "- Status: {}", self.status.with_icon())?;
        writeln!(f, "- Activity: {}", self.activity_id)?;
        if let Some(original) = self.revised_from {
            writeln!(f, "- Revised from: plan {original}")?;
        }
        writeln!(f, "- Created: {}", LocalDateTime(&self.created_at))?;

        writeln!(f)?;
        writeln!(f, "{}", self.description.trim_end())?;

        if !self.approvals.is_empty() {
            writeln!(f, "\n## Approvals")?;
            writeln!(f)?;
            for approval in &self.approvals {
                write!(f, "{approval}")?;
            }
        }

        Ok(())
    }
}

impl fmt::Display for PlanApproval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verdict = if self.approved { "approved" } else { "declined" };
        write!(f, "- Participant {}: {verdict}", self.participant_id)?;
        if let Some(feedback) = &self.feedback {
            write!(f, " ({feedback})")?;
        }
        writeln!(f)
    }
}

impl fmt::Display for ResponseStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "- Participants: {}", self.total)?;
        writeln!(
            f,
            "- Responded: {} ({:.1}%)",
            self.responded, self.response_rate
        )?;
        writeln!(
            f,
            "- Completed: {} ({:.1}%)",
            self.completed, self.completion_rate
        )
    }
}

impl fmt::Display for QuestionBatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "## Questions: {}", self.category)?;
        writeln!(f)?;
        for question in &self.questions {
            let marker = if question.required { " *" } else { "" };
            writeln!(f, "- **{}**{marker}: {}", question.id, question.prompt)?;
            match question.kind {
                QuestionKind::Select | QuestionKind::Multiselect => {
                    let hint = if question.kind == QuestionKind::Multiselect {
                        "choose any"
                    } else {
                        "choose one"
                    };
                    writeln!(f, "  - {hint}: {}", question.options.join(", "))?;
                }
                QuestionKind::Boolean => writeln!(f, "  - yes or no")?,
                _ => {}
            }
        }
        Ok(())
    }
}

impl fmt::Display for AnswerSubmission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Saved answers for {} (status: {})",
            self.participant.label(),
            self.participant.status
        )?;
        writeln!(f)?;
        match &self.next_batch {
            Some(batch) => write!(f, "{batch}"),
            None => writeln!(f, "All questions answered."),
        }
    }
}

impl fmt::Display for ExtractedParameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return writeln!(f, "No planning details recognized.");
        }
        if let Some(size) = self.group_size {
            writeln!(f, "- Group size: {size}")?;
        }
        if let Some(level) = self.activity_level {
            writeln!(f, "- Physical exertion: {}", level.exertion_bucket())?;
        }
        if let Some(budget) = &self.budget {
            writeln!(f, "- Budget: {budget}")?;
        }
        if let Some(kind) = &self.activity_type {
            writeln!(f, "- Activity type: {kind}")?;
        }
        if let Some(location) = &self.location {
            writeln!(f, "- Location: {location}")?;
        }
        if let Some(day) = self.preferred_day() {
            writeln!(f, "- Preferred day: {day}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;

    use super::*;
    use crate::{
        engine::{extract_parameters, QuestionBank},
        models::Categories,
    };

    fn participant() -> Participant {
        Participant {
            id: 4,
            activity_id: 1,
            name: Some("Robin".to_string()),
            phone_number: "555-0100".to_string(),
            email: None,
            allow_group_text: true,
            status: ParticipantStatus::Active,
            created_at: Timestamp::now(),
            updated_at: Timestamp::now(),
        }
    }

    #[test]
    fn test_activity_lists_participants() {
        let activity = Activity {
            id: 1,
            title: None,
            description: None,
            start_time: Some("9:00 AM".to_string()),
            location_address: None,
            status: ActivityStatus::Planning,
            created_at: Timestamp::now(),
            updated_at: Timestamp::now(),
            participants: vec![participant()],
        };
        let text = activity.to_string();
        assert!(text.starts_with("# 1. Activity 1\n"));
        assert!(text.contains("- Start time: 9:00 AM"));
        assert!(text.contains("- Robin (ID: 4, active)"));
    }

    #[test]
    fn test_plan_shows_revision_and_approvals() {
        let plan = Plan {
            id: 2,
            activity_id: 1,
            title: "Picnic".to_string(),
            description: "Bring blankets.\n".to_string(),
            schedule: Vec::new(),
            status: PlanStatus::PendingApproval,
            revised_from: Some(1),
            created_at: Timestamp::now(),
            updated_at: Timestamp::now(),
            approvals: vec![PlanApproval {
                plan_id: 2,
                participant_id: 4,
                approved: false,
                feedback: Some("Too early".to_string()),
                updated_at: Timestamp::now(),
            }],
        };
        let text = plan.to_string();
        assert!(text.contains("- Revised from: plan 1"));
        assert!(text.contains("Pending approval"));
        assert!(text.contains("- Participant 4: declined (Too early)"));
    }

    #[test]
    fn test_question_batch_shows_options() {
        let batch = QuestionBank::current()
            .next_batch(&Categories::new())
            .unwrap();
        let text = batch.to_string();
        assert!(text.starts_with("## Questions: contact"));
        assert!(text.contains("- **allow_group_text** *"));
        assert!(text.contains("yes or no"));
    }

    #[test]
    fn test_extracted_parameters() {
        assert_eq!(
            extract_parameters("hello there").to_string(),
            "No planning details recognized.\n"
        );
        let text = extract_parameters("4 people, $30").to_string();
        assert!(text.contains("- Group size: 4"));
        assert!(text.contains("- Budget: $30"));
    }
}
