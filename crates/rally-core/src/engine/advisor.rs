//! Boundary to an external plan advisor, such as a hosted language model.
//!
//! The planner never depends on an advisor: whatever comes back is folded
//! into a [`Suggestion`] and the deterministic plan is used whenever the
//! suggestion is not a usable structured plan.

use std::fmt::Write as _;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::assemble::render_schedule;
use crate::models::{PlanDraft, PreferenceSet, ScheduleBlock};

const GENERATION_INSTRUCTION: &str = "You are an activity planner that generates detailed \
activity plans from participants' preferences. Accommodate group composition, activity and \
exertion preferences, location, budget, timing, meals and accessibility needs. Respond with \
JSON: {\"title\": string, \"description\": string, \"schedule\": [{\"time\": \"9:00 AM\", \
\"activity\": string}], \"considerations\": [string], \"alternatives\": [string]}.";

const REVISION_INSTRUCTION: &str = "You are an activity planner revising an existing plan. \
Keep what the group liked, address the feedback, and respond with the same JSON shape as the \
original plan: title, description, schedule, considerations, alternatives.";

/// Produces plan suggestions from a planning brief.
///
/// Implementations live in the host application; a closure works too:
///
/// ```rust
/// use rally_core::engine::{PlanAdvisor, PlanningBrief, Suggestion};
///
/// let advisor = |_brief: &PlanningBrief| Suggestion::Unstructured("Pack umbrellas".into());
/// let brief = PlanningBrief::for_generation(1, &Default::default());
/// assert!(matches!(advisor.suggest(&brief), Suggestion::Unstructured(_)));
/// ```
pub trait PlanAdvisor: Send + Sync {
    /// Suggests a plan for the brief. Must not panic; report problems as
    /// [`Suggestion::Failed`].
    fn suggest(&self, brief: &PlanningBrief) -> Suggestion;
}

impl<F> PlanAdvisor for F
where
    F: Fn(&PlanningBrief) -> Suggestion + Send + Sync,
{
    fn suggest(&self, brief: &PlanningBrief) -> Suggestion {
        self(brief)
    }
}

/// Everything an advisor is told about one planning request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlanningBrief {
    pub activity_id: u64,
    pub instruction: String,
    pub preferences: String,
    pub current_plan: Option<String>,
    pub feedback: Option<String>,
}

impl PlanningBrief {
    /// Brief for a fresh plan.
    pub fn for_generation(activity_id: u64, preferences: &PreferenceSet) -> Self {
        Self {
            activity_id,
            instruction: GENERATION_INSTRUCTION.to_string(),
            preferences: summarize_preferences(preferences),
            current_plan: None,
            feedback: None,
        }
    }

    /// Brief for revising `current_plan` in light of `feedback`.
    pub fn for_revision(
        activity_id: u64,
        preferences: &PreferenceSet,
        current_plan: &str,
        feedback: &str,
    ) -> Self {
        Self {
            activity_id,
            instruction: REVISION_INSTRUCTION.to_string(),
            preferences: summarize_preferences(preferences),
            current_plan: Some(current_plan.to_string()),
            feedback: Some(feedback.to_string()),
        }
    }

    /// The user message an advisor would send alongside the instruction.
    pub fn message(&self) -> String {
        let mut message = format!(
            "Activity {} has these preferences from its participants:\n\n{}",
            self.activity_id, self.preferences
        );
        if let Some(plan) = &self.current_plan {
            let _ = write!(message, "\nCurrent plan:\n{plan}\n");
        }
        if let Some(feedback) = &self.feedback {
            let _ = write!(message, "\nFeedback:\n{feedback}\n");
        }
        message
    }
}

/// Renders every participant's answers as an indented outline.
fn summarize_preferences(preferences: &PreferenceSet) -> String {
    let mut out = String::new();
    let sections = std::iter::once(("Group".to_string(), &preferences.group)).chain(
        preferences
            .participants
            .iter()
            .map(|(id, categories)| (format!("Participant {id}"), categories)),
    );
    for (heading, categories) in sections {
        if categories.is_empty() {
            continue;
        }
        let _ = writeln!(out, "{heading}:");
        for (category, answers) in categories {
            let _ = writeln!(out, "- {}:", capitalize(category));
            for (key, value) in answers {
                let shown = match value {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                let _ = writeln!(out, "  - {}: {shown}", capitalize(&key.replace('_', " ")));
            }
        }
        out.push('\n');
    }
    out
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// A structured plan proposed by an advisor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanSuggestion {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub schedule: Vec<ScheduleBlock>,
    #[serde(default, deserialize_with = "string_or_list")]
    pub considerations: Vec<String>,
    #[serde(default, deserialize_with = "string_or_list")]
    pub alternatives: Vec<String>,
}

impl PlanSuggestion {
    /// Converts the suggestion into a draft, using `fallback_title` when the
    /// advisor left the title blank.
    pub fn into_draft(self, fallback_title: &str) -> PlanDraft {
        let title = if self.title.trim().is_empty() {
            fallback_title.to_string()
        } else {
            self.title
        };

        let mut description = self.description.trim().to_string();
        append_list(&mut description, "Considerations", &self.considerations);
        append_list(&mut description, "Alternatives", &self.alternatives);
        if !description.is_empty() {
            description.push_str("\n\n");
        }
        description.push_str(&render_schedule(&self.schedule));

        PlanDraft {
            title,
            description,
            schedule: self.schedule,
        }
    }
}

fn append_list(description: &mut String, heading: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    if !description.is_empty() {
        description.push_str("\n\n");
    }
    description.push_str(heading);
    description.push(':');
    for item in items {
        description.push_str("\n- ");
        description.push_str(item);
    }
}

fn string_or_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) if s.trim().is_empty() => Vec::new(),
        Value::String(s) => vec![s],
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s),
                Value::Null => None,
                other => Some(other.to_string()),
            })
            .collect(),
        _ => Vec::new(),
    })
}

/// What an advisor returned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Suggestion {
    /// A plan in the expected JSON shape
    Structured(PlanSuggestion),
    /// Free-form text that is not a plan
    Unstructured(String),
    /// The advisor could not produce anything
    Failed(String),
}

impl Suggestion {
    /// Interprets raw advisor output.
    ///
    /// Markdown code fences are stripped before parsing. A JSON object
    /// carrying an `error` field is a failure; other JSON objects are parsed
    /// as a plan; anything else is kept as text.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use rally_core::engine::Suggestion;
    ///
    /// let text = "Here you go:\n```json\n{\"title\": \"Picnic\", \"schedule\": []}\n```";
    /// match Suggestion::from_response_text(text) {
    ///     Suggestion::Structured(plan) => assert_eq!(plan.title, "Picnic"),
    ///     other => panic!("unexpected {other:?}"),
    /// }
    /// assert!(matches!(Suggestion::from_response_text("  "), Suggestion::Failed(_)));
    /// ```
    pub fn from_response_text(text: &str) -> Self {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Suggestion::Failed("advisor returned an empty response".to_string());
        }

        let body = strip_code_fence(trimmed);
        match serde_json::from_str::<Value>(body) {
            Ok(Value::Object(map)) => {
                if let Some(error) = map.get("error") {
                    let reason = match error {
                        Value::String(s) => s.clone(),
                        other => other.to_string(),
                    };
                    return Suggestion::Failed(reason);
                }
                match serde_json::from_value(Value::Object(map)) {
                    Ok(plan) => Suggestion::Structured(plan),
                    Err(e) => {
                        log::warn!("Advisor JSON is not a plan: {e}");
                        Suggestion::Unstructured(trimmed.to_string())
                    }
                }
            }
            _ => Suggestion::Unstructured(trimmed.to_string()),
        }
    }
}

/// Body of a ```` ```json ```` (or bare ```` ``` ````) fence, or the whole
/// text when there is none.
fn strip_code_fence(text: &str) -> &str {
    let Some(open) = text.find("```") else {
        return text;
    };
    let after_ticks = &text[open + 3..];
    let tag_len = after_ticks
        .find(|c: char| !c.is_ascii_alphanumeric())
        .unwrap_or(after_ticks.len());
    let body = &after_ticks[tag_len..];
    match body.find("```") {
        Some(close) => body[..close].trim(),
        None => body.trim(),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_structured_from_bare_json() {
        let text = r#"{"title":"Museum Day","description":"Art and lunch.",
            "schedule":[{"time":"10:00 AM","activity":"Meet"}],
            "considerations":"Bring water","alternatives":["Zoo"]}"#;
        let Suggestion::Structured(plan) = Suggestion::from_response_text(text) else {
            panic!("expected a structured suggestion");
        };
        assert_eq!(plan.title, "Museum Day");
        assert_eq!(plan.schedule.len(), 1);
        assert_eq!(plan.considerations, vec!["Bring water"]);
        assert_eq!(plan.alternatives, vec!["Zoo"]);
    }

    #[test]
    fn test_prose_is_unstructured() {
        let suggestion = Suggestion::from_response_text("How about bowling?");
        assert_eq!(suggestion, Suggestion::Unstructured("How about bowling?".to_string()));
    }

    #[test]
    fn test_error_payload_is_failure() {
        let suggestion = Suggestion::from_response_text(r#"{"error": "rate limited"}"#);
        assert_eq!(suggestion, Suggestion::Failed("rate limited".to_string()));
    }

    #[test]
    fn test_wrong_shape_is_unstructured() {
        let suggestion = Suggestion::from_response_text(r#"{"schedule": "whenever"}"#);
        assert!(matches!(suggestion, Suggestion::Unstructured(_)));
    }

    #[test]
    fn test_strip_fence_without_language() {
        assert_eq!(strip_code_fence("```\n{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(strip_code_fence("plain"), "plain");
    }

    #[test]
    fn test_one_line_fence_with_language() {
        assert_eq!(strip_code_fence("```json{\"a\":1}```"), "{\"a\":1}");
        assert_eq!(strip_code_fence("```{\"a\":1}\n```"), "{\"a\":1}");

        let text = r#"```json{"title":"Zoo Trip","description":"Animals.","schedule":[]}```"#;
        let Suggestion::Structured(plan) = Suggestion::from_response_text(text) else {
            panic!("expected a structured suggestion");
        };
        assert_eq!(plan.title, "Zoo Trip");
    }

    #[test]
    fn test_into_draft_sections() {
        let plan = PlanSuggestion {
            title: String::new(),
            description: "A day out.".to_string(),
            schedule: vec![ScheduleBlock {
                time: "9:00 AM".to_string(),
                activity: "Meet".to_string(),
            }],
            considerations: vec!["Shade".to_string()],
            alternatives: vec![],
        };
        let draft = plan.into_draft("Park Visit - Weekend Morning Activity");
        assert_eq!(draft.title, "Park Visit - Weekend Morning Activity");
        assert_eq!(
            draft.description,
            "A day out.\n\nConsiderations:\n- Shade\n\nTentative Schedule:\n9:00 AM - Meet\n"
        );
    }

    #[test]
    fn test_brief_lists_participants() {
        let mut set = PreferenceSet::new();
        set.insert(Some(4), "activity", "budget_range", json!("$25-$50"));
        set.insert(None, "timing", "duration", json!("Half day"));
        let brief = PlanningBrief::for_generation(9, &set);
        assert!(brief.preferences.starts_with("Group:\n- Timing:\n  - Duration: Half day\n"));
        assert!(brief.preferences.contains("Participant 4:\n- Activity:\n  - Budget range: $25-$50\n"));
        assert!(brief.message().starts_with("Activity 9 has these preferences"));
    }
}
