//! The planning engine: pure, synchronous functions from preferences to a
//! draft plan.
//!
//! ```text
//! PreferenceSet ─▶ aggregate() ─▶ AggregatedPreferences ─┐
//!                                                        ├─▶ assemble() ─▶ PlanDraft
//! start, hours, meals ─▶ synthesize() ─▶ schedule ───────┘
//! ```
//!
//! Nothing here touches storage or the network. [`draft_plan`] runs the
//! whole pipeline; [`apply_suggestion`] and [`revise_draft`] fold an
//! optional [`Suggestion`] from a [`PlanAdvisor`] into the result.
//!
//! # Examples
//!
//! ```rust
//! use jiff::civil::date;
//! use rally_core::engine::{draft_plan, DraftOptions};
//! use rally_core::models::PreferenceSet;
//! use serde_json::json;
//!
//! let mut prefs = PreferenceSet::new();
//! prefs.insert(Some(1), "activity", "activity_type", json!("Food"));
//! prefs.insert(Some(1), "timing", "preferred_day", json!("Weekend afternoon"));
//! prefs.insert(Some(2), "activity", "activity_type", json!("Food"));
//!
//! let draft = draft_plan(&prefs, &DraftOptions::new(date(2024, 6, 3)));
//! assert!(draft.title.starts_with("Food Tour - Weekend Afternoon Activity"));
//! ```

pub mod advisor;
pub mod aggregate;
pub mod assemble;
pub mod catalog;
pub mod extract;
pub mod questions;
pub mod schedule;

use jiff::civil::Date;
use log::{debug, warn};

pub use advisor::{PlanAdvisor, PlanSuggestion, PlanningBrief, Suggestion};
pub use aggregate::{aggregate, AggregatedPreferences};
pub use assemble::{append_feedback, assemble, render_schedule};
pub use catalog::{activity_name, duration_hours, DayPart, DayType, Meal, MealSet};
pub use extract::{extract_parameters, ActivityLevel, ExtractedParameters};
pub use questions::{Question, QuestionBank, QuestionBatch, QuestionKind};
pub use schedule::synthesize;

use crate::models::{ClockTime, PlanDraft, PreferenceSet, ScheduleBlock};

/// Inputs to [`draft_plan`] that do not come from preferences.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DraftOptions {
    /// Organizer-chosen start; the preferred day part decides otherwise
    pub start_time: Option<ClockTime>,
    /// Anchor for the proposed date
    pub today: Date,
}

impl DraftOptions {
    pub fn new(today: Date) -> Self {
        Self {
            start_time: None,
            today,
        }
    }

    pub fn with_start_time(mut self, start_time: Option<ClockTime>) -> Self {
        self.start_time = start_time;
        self
    }
}

/// Aggregates, synthesizes and assembles a deterministic plan.
pub fn draft_plan(preferences: &PreferenceSet, options: &DraftOptions) -> PlanDraft {
    let aggregated = aggregate(preferences);
    let (_, day_part) = catalog::split_preferred_day(&aggregated.preferred_day);
    let start = options
        .start_time
        .unwrap_or_else(|| day_part.default_start());
    let hours = duration_hours(&aggregated.duration);
    debug!(
        "Drafting {} plan starting {start} for {hours} hours",
        aggregated.activity_type
    );

    let schedule = synthesize(start, hours, &aggregated.meals);
    assemble(&aggregated, schedule, options.today)
}

/// Chooses between an advisor's suggestion and the deterministic draft.
///
/// A structured suggestion with a schedule replaces the draft. Free text is
/// appended to the draft as planner notes; anything else is dropped.
pub fn apply_suggestion(deterministic: PlanDraft, suggestion: Suggestion) -> PlanDraft {
    match suggestion {
        Suggestion::Structured(plan) if !plan.schedule.is_empty() => {
            plan.into_draft(&deterministic.title)
        }
        Suggestion::Structured(_) => {
            warn!("Advisor plan has no schedule, using the generated plan");
            deterministic
        }
        Suggestion::Unstructured(text) => with_notes(deterministic, &text),
        Suggestion::Failed(reason) => {
            warn!("Advisor failed, using the generated plan: {reason}");
            deterministic
        }
    }
}

/// Produces the revised draft of an existing plan.
///
/// Without a usable structured suggestion the original description is kept
/// verbatim with the feedback appended.
pub fn revise_draft(
    title: &str,
    description: &str,
    schedule: &[ScheduleBlock],
    feedback: &str,
    suggestion: Option<Suggestion>,
) -> PlanDraft {
    let fallback = PlanDraft {
        title: title.to_string(),
        description: append_feedback(description, feedback),
        schedule: schedule.to_vec(),
    };
    match suggestion {
        Some(suggestion) => apply_suggestion(fallback, suggestion),
        None => fallback,
    }
}

fn with_notes(mut draft: PlanDraft, notes: &str) -> PlanDraft {
    let notes = notes.trim();
    if !notes.is_empty() {
        draft.description = format!("{}\n\nPlanner notes:\n{notes}", draft.description.trim_end());
    }
    draft
}

#[cfg(test)]
mod tests {
    use jiff::civil::date;
    use serde_json::json;

    use super::*;

    fn options() -> DraftOptions {
        DraftOptions::new(date(2024, 6, 3))
    }

    #[test]
    fn test_default_draft() {
        let draft = draft_plan(&PreferenceSet::new(), &options());
        assert_eq!(draft.title, "Park Visit - Weekend Morning Activity");
        assert_eq!(draft.schedule.first().unwrap().time, "9:00 AM");
        assert_eq!(draft.schedule.last().unwrap().time, "12:00 PM");
        assert!(draft.description.contains("Tentative Schedule:\n9:00 AM - Meet at the location\n"));
    }

    #[test]
    fn test_end_to_end_scenario() {
        let mut prefs = PreferenceSet::new();
        prefs.insert(Some(1), "activity", "activity_type", json!("Food"));
        prefs.insert(Some(1), "activity", "budget_range", json!("$25"));
        prefs.insert(Some(1), "timing", "preferred_day", json!("Weekend afternoon"));
        prefs.insert(Some(1), "timing", "duration", json!("2-4 hours"));
        prefs.insert(Some(2), "activity", "activity_type", json!("Food"));

        let draft = draft_plan(&prefs, &options());
        assert!(draft.title.starts_with("Food Tour - Weekend Afternoon Activity"));
        assert_eq!(draft.schedule.first().unwrap().time, "12:00 PM");
        assert_eq!(draft.schedule.last().unwrap().time, "3:00 PM");
    }

    #[test]
    fn test_start_time_override() {
        let start = ClockTime::parse("2:30 PM").unwrap();
        let draft = draft_plan(&PreferenceSet::new(), &options().with_start_time(Some(start)));
        assert_eq!(draft.schedule[0].time, "2:30 PM");
    }

    #[test]
    fn test_structured_suggestion_replaces_draft() {
        let deterministic = draft_plan(&PreferenceSet::new(), &options());
        let suggestion = Suggestion::from_response_text(
            r#"{"title":"Kayak Morning","description":"Paddle.","schedule":[{"time":"8:00 AM","activity":"Launch"}]}"#,
        );
        let draft = apply_suggestion(deterministic, suggestion);
        assert_eq!(draft.title, "Kayak Morning");
        assert_eq!(draft.schedule.len(), 1);
    }

    #[test]
    fn test_unusable_suggestions_fall_back() {
        let deterministic = draft_plan(&PreferenceSet::new(), &options());

        let empty = Suggestion::Structured(PlanSuggestion {
            title: "Nothing".to_string(),
            ..PlanSuggestion::default()
        });
        assert_eq!(apply_suggestion(deterministic.clone(), empty), deterministic);

        let failed = Suggestion::Failed("timeout".to_string());
        assert_eq!(apply_suggestion(deterministic.clone(), failed), deterministic);

        let notes = Suggestion::Unstructured("Bring sunscreen.".to_string());
        let draft = apply_suggestion(deterministic.clone(), notes);
        assert!(draft.description.starts_with(deterministic.description.trim_end()));
        assert!(draft.description.ends_with("Planner notes:\nBring sunscreen."));
        assert_eq!(draft.schedule, deterministic.schedule);
    }

    #[test]
    fn test_revision_fallback_keeps_original() {
        let original = draft_plan(&PreferenceSet::new(), &options());
        let revised = revise_draft(
            &original.title,
            &original.description,
            &original.schedule,
            "Start later please",
            None,
        );
        assert!(revised.description.starts_with(&original.description));
        assert!(revised
            .description
            .ends_with("\n\nRevisions based on feedback:\nStart later please"));
        assert_eq!(revised.title, original.title);
    }
}
