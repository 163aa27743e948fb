//! Turns an aggregate and a schedule into a titled, described plan.

use jiff::civil::{Date, Weekday};
use jiff::ToSpan;

use super::aggregate::AggregatedPreferences;
use super::catalog::{activity_name, exertion_adjective, split_preferred_day, DayType, MealSet};
use crate::models::{PlanDraft, ScheduleBlock};

/// Days between generation and the proposed date.
const LEAD_DAYS: i64 = 3;

/// Heading of the section appended by a feedback revision.
pub const REVISION_HEADING: &str = "Revisions based on feedback:";

/// Builds a draft plan from the aggregate and a schedule.
///
/// The schedule may come from [`super::synthesize`] or from an advisor;
/// it is embedded as-is. `today` anchors the proposed date.
pub fn assemble(
    aggregated: &AggregatedPreferences,
    schedule: Vec<ScheduleBlock>,
    today: Date,
) -> PlanDraft {
    let (day_type, day_part) = split_preferred_day(&aggregated.preferred_day);
    let title = format!(
        "{} - {} {} Activity",
        activity_name(&aggregated.activity_type),
        day_type.as_str(),
        day_part.as_str()
    );

    let adjective = exertion_adjective(&aggregated.physical_exertion);
    let mut sentences = vec![
        format!(
            "{} {adjective} {} {} activity for your group on a {} {}.",
            indefinite_article(adjective),
            aggregated.duration,
            aggregated.activity_type.to_lowercase(),
            day_type.as_str().to_lowercase(),
            day_part.as_str().to_lowercase()
        ),
        format!("The budget is about {} per person.", aggregated.budget),
    ];
    if !aggregated.meals.is_empty() {
        sentences.push(format!("The plan includes {}.", join_meals(&aggregated.meals)));
    }
    if aggregated.has_children {
        sentences.push("This plan includes child-friendly options.".to_string());
    }
    if aggregated.has_seniors {
        sentences.push(
            "The activity is accessible for seniors and those with mobility concerns.".to_string(),
        );
    }

    let mut description = sentences.join(" ");
    if !aggregated.direct_inputs.is_empty() {
        description.push_str("\n\nAdditional participant requests:");
        for request in &aggregated.direct_inputs {
            description.push_str("\n- ");
            description.push_str(request);
        }
    }
    description.push_str("\n\nProposed Date: ");
    description.push_str(&proposed_date(today, day_type).strftime("%A, %B %d, %Y").to_string());
    description.push_str("\n\n");
    description.push_str(&render_schedule(&schedule));

    PlanDraft {
        title,
        description,
        schedule,
    }
}

/// Appends a delimited feedback section, leaving the original text intact.
///
/// # Examples
///
/// ```rust
/// use rally_core::engine::append_feedback;
///
/// let revised = append_feedback("Picnic at noon.", "Start an hour later");
/// assert!(revised.starts_with("Picnic at noon."));
/// assert!(revised.ends_with("Revisions based on feedback:\nStart an hour later"));
/// ```
pub fn append_feedback(description: &str, feedback: &str) -> String {
    format!("{description}\n\n{REVISION_HEADING}\n{feedback}")
}

/// Renders `Tentative Schedule:` followed by one `<time> - <activity>` line
/// per block.
pub fn render_schedule(schedule: &[ScheduleBlock]) -> String {
    let mut text = String::from("Tentative Schedule:\n");
    for block in schedule {
        text.push_str(&format!("{} - {}\n", block.time, block.activity));
    }
    text
}

/// Three days out, pushed to the following Saturday for weekend outings.
pub fn proposed_date(today: Date, day_type: DayType) -> Date {
    let candidate = today.checked_add(LEAD_DAYS.days()).unwrap_or(today);
    let is_weekend = matches!(candidate.weekday(), Weekday::Saturday | Weekday::Sunday);
    if day_type == DayType::Weekend && !is_weekend {
        candidate
            .nth_weekday(1, Weekday::Saturday)
            .unwrap_or(candidate)
    } else {
        candidate
    }
}

/// `Lunch`, `Lunch and Dinner`, `Breakfast, Lunch and Dinner`.
fn join_meals(meals: &MealSet) -> String {
    let names: Vec<&str> = meals.iter().map(|m| m.as_str()).collect();
    match names.split_last() {
        Some((last, rest)) if !rest.is_empty() => format!("{} and {last}", rest.join(", ")),
        Some((last, _)) => (*last).to_string(),
        None => String::new(),
    }
}

fn indefinite_article(word: &str) -> &'static str {
    match word.chars().next() {
        Some('a' | 'e' | 'i' | 'o' | 'u') => "An",
        _ => "A",
    }
}
