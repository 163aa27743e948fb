//! Preference values and the per-activity preference set.

use std::collections::BTreeMap;

use log::warn;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A stored preference answer: a string, number, boolean or list of strings.
pub type PreferenceValue = Value;

/// `category -> key -> value` answers of one participant.
pub type Categories = BTreeMap<String, BTreeMap<String, PreferenceValue>>;

/// Every preference recorded for one activity.
///
/// Activity-level answers (no participant) live under `group`; they never
/// take part in voting. Participants iterate in ascending id order, which is
/// the order they joined the activity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PreferenceSet {
    /// Activity-level preferences
    #[serde(default)]
    pub group: Categories,

    /// Preferences keyed by participant id
    #[serde(default)]
    pub participants: BTreeMap<u64, Categories>,
}

impl PreferenceSet {
    /// Creates an empty preference set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a value, replacing any earlier value for the same triple.
    pub fn insert(
        &mut self,
        participant_id: Option<u64>,
        category: impl Into<String>,
        key: impl Into<String>,
        value: PreferenceValue,
    ) {
        let categories = match participant_id {
            Some(id) => self.participants.entry(id).or_default(),
            None => &mut self.group,
        };
        categories
            .entry(category.into())
            .or_default()
            .insert(key.into(), value);
    }

    /// Looks up a participant's answer.
    pub fn get(&self, participant_id: u64, category: &str, key: &str) -> Option<&PreferenceValue> {
        self.participants
            .get(&participant_id)
            .and_then(|c| c.get(category))
            .and_then(|k| k.get(key))
    }

    /// Iterates every participant's answer for `(category, key)`, in
    /// participant order.
    pub fn answers<'a>(
        &'a self,
        category: &'a str,
        key: &'a str,
    ) -> impl Iterator<Item = &'a PreferenceValue> + 'a {
        self.participants
            .values()
            .filter_map(move |c| c.get(category).and_then(|k| k.get(key)))
    }

    /// True when no participant and no group preference is recorded.
    pub fn is_empty(&self) -> bool {
        self.group.is_empty() && self.participants.values().all(BTreeMap::is_empty)
    }
}

/// Encodes a value for storage. Every value is written as JSON, so a string
/// such as `"null"` keeps its type when read back.
pub fn encode_value(value: &PreferenceValue) -> String {
    value.to_string()
}

/// Renders a value for people: strings bare, everything else as JSON.
pub fn display_value(value: &PreferenceValue) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Decodes a stored value. Text that is not valid JSON, such as a row written
/// by hand, is kept as an opaque string.
///
/// # Examples
///
/// ```rust
/// use rally_core::models::decode_value;
/// use serde_json::json;
///
/// assert_eq!(decode_value("[\"Lunch\",\"Dinner\"]"), json!(["Lunch", "Dinner"]));
/// assert_eq!(decode_value("true"), json!(true));
/// assert_eq!(decode_value("Outdoor"), json!("Outdoor"));
/// ```
pub fn decode_value(raw: &str) -> PreferenceValue {
    match serde_json::from_str::<Value>(raw) {
        Ok(value) => value,
        Err(_) => {
            let looks_structured = matches!(raw.trim_start().chars().next(), Some('[' | '{'));
            if looks_structured {
                warn!("Stored preference value is not valid JSON, keeping it as text: {raw}");
            }
            Value::String(raw.to_string())
        }
    }
}

/// Flattens a value into vote strings: one per list element, one for a
/// scalar. Empty strings and nulls do not vote.
pub fn vote_strings(value: &PreferenceValue) -> Vec<String> {
    match value {
        Value::Array(items) => items.iter().filter_map(scalar_text).collect(),
        other => scalar_text(other).into_iter().collect(),
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Loose truthiness used for yes/no questions answered in several forms.
pub fn is_truthy(value: &PreferenceValue) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => matches!(
            s.trim().to_lowercase().as_str(),
            "true" | "yes" | "y" | "1"
        ),
        Value::Array(items) => !items.is_empty(),
        Value::Object(_) | Value::Null => false,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_insert_is_last_write_wins() {
        let mut set = PreferenceSet::new();
        set.insert(Some(1), "activity", "activity_type", json!("Food"));
        set.insert(Some(1), "activity", "activity_type", json!("Sports"));
        assert_eq!(set.get(1, "activity", "activity_type"), Some(&json!("Sports")));
    }

    #[test]
    fn test_group_preferences_are_separate() {
        let mut set = PreferenceSet::new();
        set.insert(None, "activity", "activity_type", json!("Food"));
        assert_eq!(set.answers("activity", "activity_type").count(), 0);
        assert!(!set.is_empty());
    }

    #[test]
    fn test_encode_decode_round_trip() {
        for value in [json!("Outdoor"), json!(["Lunch", "Snacks"]), json!(true), json!(4)] {
            assert_eq!(decode_value(&encode_value(&value)), value);
        }
    }

    #[test]
    fn test_json_looking_strings_stay_strings() {
        for text in ["null", "true", "\"quoted\"", "[\"x\"]"] {
            let value = json!(text);
            assert_eq!(decode_value(&encode_value(&value)), value);
            assert_eq!(display_value(&value), text);
        }
    }

    #[test]
    fn test_malformed_json_degrades_to_text() {
        assert_eq!(decode_value("[\"Lunch\","), json!("[\"Lunch\","));
    }

    #[test]
    fn test_vote_strings() {
        assert_eq!(vote_strings(&json!(["Outdoor", "", "Sports"])), vec!["Outdoor", "Sports"]);
        assert_eq!(vote_strings(&json!(25)), vec!["25"]);
        assert!(vote_strings(&json!(null)).is_empty());
    }

    #[test]
    fn test_truthiness() {
        assert!(is_truthy(&json!(true)));
        assert!(is_truthy(&json!("Yes")));
        assert!(is_truthy(&json!(2)));
        assert!(!is_truthy(&json!("no")));
        assert!(!is_truthy(&json!(false)));
    }
}
