//! Majority-vote reduction of a [`PreferenceSet`].

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::catalog::{
    DEFAULT_ACTIVITY_TYPE, DEFAULT_BUDGET, DEFAULT_DURATION, DEFAULT_EXERTION,
    DEFAULT_PREFERRED_DAY, Meal, MealSet,
};
use crate::models::{PreferenceSet, PreferenceValue, is_truthy, vote_strings};

/// Maximum number of direct participant quotes carried into a plan.
pub const MAX_DIRECT_INPUTS: usize = 3;

/// Answers that mean "no meals" rather than naming one.
const NO_MEAL_ANSWERS: &[&str] = &["none", "no meals", "no"];

/// One representative value per preference dimension.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregatedPreferences {
    pub activity_type: String,
    pub duration: String,
    pub preferred_day: String,
    pub budget: String,
    pub physical_exertion: String,
    pub meals: MealSet,
    pub has_children: bool,
    pub has_seniors: bool,
    pub direct_inputs: Vec<String>,
}

impl Default for AggregatedPreferences {
    fn default() -> Self {
        Self {
            activity_type: DEFAULT_ACTIVITY_TYPE.to_string(),
            duration: DEFAULT_DURATION.to_string(),
            preferred_day: DEFAULT_PREFERRED_DAY.to_string(),
            budget: DEFAULT_BUDGET.to_string(),
            physical_exertion: DEFAULT_EXERTION.to_string(),
            meals: MealSet::new(),
            has_children: false,
            has_seniors: false,
            direct_inputs: Vec::new(),
        }
    }
}

/// Reduces every participant's answers into one aggregate.
///
/// Group-level preferences never vote. Ties go to the value encountered
/// first, walking participants in ascending id order.
///
/// # Examples
///
/// ```rust
/// use rally_core::engine::aggregate;
/// use rally_core::models::PreferenceSet;
/// use serde_json::json;
///
/// let mut set = PreferenceSet::new();
/// set.insert(Some(1), "activity", "activity_type", json!(["Outdoor", "Sports"]));
/// set.insert(Some(2), "activity", "activity_type", json!(["Outdoor"]));
/// set.insert(Some(3), "activity", "activity_type", json!(["Indoor"]));
///
/// assert_eq!(aggregate(&set).activity_type, "Outdoor");
/// ```
pub fn aggregate(preferences: &PreferenceSet) -> AggregatedPreferences {
    let defaults = AggregatedPreferences::default();
    let pick = |category: &str, key: &str, default: String| {
        mode(votes(preferences, category, key)).unwrap_or(default)
    };

    AggregatedPreferences {
        activity_type: pick("activity", "activity_type", defaults.activity_type),
        duration: pick("timing", "duration", defaults.duration),
        preferred_day: pick("timing", "preferred_day", defaults.preferred_day),
        budget: pick("activity", "budget_range", defaults.budget),
        physical_exertion: pick("activity", "physical_exertion", defaults.physical_exertion),
        meals: aggregate_meals(preferences),
        has_children: preferences.answers("group", "has_children").any(is_truthy),
        has_seniors: preferences.answers("group", "has_seniors").any(is_truthy),
        direct_inputs: preferences
            .answers("requirements", "direct_input")
            .flat_map(quoted_texts)
            .take(MAX_DIRECT_INPUTS)
            .collect(),
    }
}

/// Direct requests are quoted as written. Blank text is skipped.
fn quoted_texts(value: &PreferenceValue) -> Vec<String> {
    match value {
        Value::String(s) if s.trim().is_empty() => Vec::new(),
        Value::String(s) => vec![s.clone()],
        Value::Array(items) => items.iter().flat_map(quoted_texts).collect(),
        other => vote_strings(other),
    }
}

fn votes(preferences: &PreferenceSet, category: &str, key: &str) -> Vec<String> {
    preferences
        .answers(category, key)
        .flat_map(vote_strings)
        .collect()
}

/// Most frequent value; the earliest one wins a tie.
fn mode(values: Vec<String>) -> Option<String> {
    let mut tally: Vec<(String, usize)> = Vec::new();
    for value in values {
        match tally.iter_mut().find(|(seen, _)| *seen == value) {
            Some((_, count)) => *count += 1,
            None => tally.push((value, 1)),
        }
    }

    let mut best: Option<(String, usize)> = None;
    for (value, count) in tally {
        if best.as_ref().map_or(true, |(_, top)| count > *top) {
            best = Some((value, count));
        }
    }
    best.map(|(value, _)| value)
}

/// Meals chosen by at least half of the participants who answered, or the
/// modal meal when none reaches that bar.
fn aggregate_meals(preferences: &PreferenceSet) -> MealSet {
    let mut respondents = 0usize;
    let mut votes: Vec<Meal> = Vec::new();

    for answer in preferences.answers("meals", "meals_included") {
        let choices = vote_strings(answer);
        if choices.is_empty() {
            continue;
        }
        respondents += 1;

        let mut chosen = MealSet::new();
        for choice in &choices {
            if NO_MEAL_ANSWERS.contains(&choice.to_lowercase().as_str()) {
                continue;
            }
            match choice.parse::<Meal>() {
                Ok(meal) => {
                    chosen.insert(meal);
                }
                Err(e) => log::debug!("Ignoring meal vote: {e}"),
            }
        }
        votes.extend(chosen);
    }

    if votes.is_empty() {
        return MealSet::new();
    }

    let majority: MealSet = votes
        .iter()
        .filter(|meal| {
            let count = votes.iter().filter(|m| m == meal).count();
            count * 2 >= respondents
        })
        .copied()
        .collect();
    if !majority.is_empty() {
        return majority;
    }

    let names = votes.iter().map(|m| m.as_str().to_string()).collect();
    mode(names)
        .and_then(|name| name.parse().ok())
        .into_iter()
        .collect()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn end_to_end_set() -> PreferenceSet {
        let mut set = PreferenceSet::new();
        set.insert(Some(1), "activity", "activity_type", json!("Food"));
        set.insert(Some(1), "activity", "budget_range", json!("$25"));
        set.insert(Some(1), "timing", "preferred_day", json!("Weekend afternoon"));
        set.insert(Some(1), "timing", "duration", json!("2-4 hours"));
        set.insert(Some(2), "activity", "activity_type", json!("Food"));
        set
    }

    #[test]
    fn test_empty_set_yields_defaults() {
        let aggregated = aggregate(&PreferenceSet::new());
        assert_eq!(aggregated, AggregatedPreferences::default());
        assert_eq!(aggregated.activity_type, "Outdoor");
        assert_eq!(aggregated.duration, "2-4 hours");
        assert_eq!(aggregated.preferred_day, "Weekend morning");
        assert_eq!(aggregated.budget, "$25");
        assert_eq!(aggregated.physical_exertion, "2-3 (Casual walking)");
        assert!(aggregated.meals.is_empty());
    }

    #[test]
    fn test_majority_wins_across_list_votes() {
        let mut set = PreferenceSet::new();
        set.insert(Some(1), "activity", "activity_type", json!(["Outdoor", "Sports"]));
        set.insert(Some(2), "activity", "activity_type", json!(["Outdoor"]));
        set.insert(Some(3), "activity", "activity_type", json!(["Indoor"]));
        assert_eq!(aggregate(&set).activity_type, "Outdoor");
    }

    #[test]
    fn test_tie_goes_to_first_encountered() {
        let mut set = PreferenceSet::new();
        set.insert(Some(7), "timing", "duration", json!("Half day"));
        set.insert(Some(3), "timing", "duration", json!("Full day"));
        // participant 3 is walked first
        assert_eq!(aggregate(&set).duration, "Full day");
    }

    #[test]
    fn test_group_preferences_do_not_vote() {
        let mut set = PreferenceSet::new();
        set.insert(None, "activity", "activity_type", json!("Sports"));
        set.insert(None, "group", "has_children", json!(true));
        let aggregated = aggregate(&set);
        assert_eq!(aggregated.activity_type, "Outdoor");
        assert!(!aggregated.has_children);
    }

    #[test]
    fn test_composition_flags_are_ored() {
        let mut set = PreferenceSet::new();
        set.insert(Some(1), "group", "has_children", json!(false));
        set.insert(Some(2), "group", "has_children", json!("Yes"));
        set.insert(Some(2), "group", "has_seniors", json!("no"));
        let aggregated = aggregate(&set);
        assert!(aggregated.has_children);
        assert!(!aggregated.has_seniors);
    }

    #[test]
    fn test_direct_inputs_capped_in_order() {
        let mut set = PreferenceSet::new();
        for (id, text) in [(1, "bring a dog"), (2, ""), (3, "near transit"), (4, "quiet"), (5, "late")] {
            set.insert(Some(id), "requirements", "direct_input", json!(text));
        }
        assert_eq!(
            aggregate(&set).direct_inputs,
            vec!["bring a dog", "near transit", "quiet"]
        );
    }

    #[test]
    fn test_direct_inputs_are_quoted_verbatim() {
        let mut set = PreferenceSet::new();
        set.insert(Some(1), "requirements", "direct_input", json!("  Near the lake, please  "));
        set.insert(Some(2), "requirements", "direct_input", json!("   "));
        set.insert(Some(3), "requirements", "direct_input", json!("null"));
        assert_eq!(
            aggregate(&set).direct_inputs,
            vec!["  Near the lake, please  ", "null"]
        );
    }

    #[test]
    fn test_meals_majority_set() {
        let mut set = PreferenceSet::new();
        set.insert(Some(1), "meals", "meals_included", json!(["Lunch", "Snacks"]));
        set.insert(Some(2), "meals", "meals_included", json!(["Lunch"]));
        set.insert(Some(3), "meals", "meals_included", json!(["Dinner"]));
        set.insert(Some(4), "meals", "meals_included", json!("None"));
        let meals = aggregate(&set).meals;
        assert_eq!(meals.into_iter().collect::<Vec<_>>(), vec![Meal::Lunch]);
    }

    #[test]
    fn test_meals_fall_back_to_mode() {
        let mut set = PreferenceSet::new();
        set.insert(Some(1), "meals", "meals_included", json!(["Lunch"]));
        set.insert(Some(2), "meals", "meals_included", json!(["Dinner"]));
        set.insert(Some(3), "meals", "meals_included", json!(["Breakfast"]));
        set.insert(Some(4), "meals", "meals_included", json!("No meals"));
        set.insert(Some(5), "meals", "meals_included", json!("No meals"));
        let meals = aggregate(&set).meals;
        assert_eq!(meals.into_iter().collect::<Vec<_>>(), vec![Meal::Lunch]);
    }

    #[test]
    fn test_aggregation_is_deterministic() {
        let set = end_to_end_set();
        let first = serde_json::to_string(&aggregate(&set)).unwrap();
        let second = serde_json::to_string(&aggregate(&set)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_end_to_end_scenario_aggregate() {
        let aggregated = aggregate(&end_to_end_set());
        assert_eq!(aggregated.activity_type, "Food");
        assert_eq!(aggregated.preferred_day, "Weekend afternoon");
        assert_eq!(aggregated.budget, "$25");
    }
}
