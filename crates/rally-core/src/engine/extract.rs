//! Keyword and pattern heuristics that pull planning parameters out of a
//! single free-text utterance.
//!
//! Misses are expected: anything not recognized stays unset and the
//! aggregator's defaults apply downstream.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::catalog::{DayPart, DayType};

/// How strenuous the speaker wants the outing to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityLevel {
    Low,
    Moderate,
    High,
}

impl ActivityLevel {
    /// Questionnaire exertion bucket with the same meaning.
    pub fn exertion_bucket(&self) -> &'static str {
        match self {
            ActivityLevel::Low => "2-3 (Casual walking)",
            ActivityLevel::Moderate => "4-5 (Moderate)",
            ActivityLevel::High => "6-7 (Active)",
        }
    }
}

const ACTIVITY_LEVELS: &[(&str, ActivityLevel)] = &[
    ("low key", ActivityLevel::Low),
    ("relaxed", ActivityLevel::Low),
    ("relaxing", ActivityLevel::Low),
    ("chill", ActivityLevel::Low),
    ("leisurely", ActivityLevel::Low),
    ("easy", ActivityLevel::Low),
    ("gentle", ActivityLevel::Low),
    ("moderate", ActivityLevel::Moderate),
    ("some walking", ActivityLevel::Moderate),
    ("medium", ActivityLevel::Moderate),
    ("high energy", ActivityLevel::High),
    ("strenuous", ActivityLevel::High),
    ("intense", ActivityLevel::High),
    ("energetic", ActivityLevel::High),
    ("active", ActivityLevel::High),
    ("adventurous", ActivityLevel::High),
];

const ACTIVITY_TYPES: &[(&str, &str)] = &[
    ("food", "Food"),
    ("restaurant", "Food"),
    ("dinner", "Food"),
    ("brunch", "Food"),
    ("tasting", "Food"),
    ("concert", "Music"),
    ("music", "Music"),
    ("painting", "Art"),
    ("gallery", "Art"),
    ("art", "Art"),
    ("spa", "Relaxation"),
    ("massage", "Relaxation"),
    ("zip line", "Adventure"),
    ("zip lining", "Adventure"),
    ("climbing", "Adventure"),
    ("kayaking", "Adventure"),
    ("adventure", "Adventure"),
    ("golf", "Sports"),
    ("bowling", "Sports"),
    ("sports", "Sports"),
    ("game", "Sports"),
    ("festival", "Cultural"),
    ("theater", "Cultural"),
    ("cultural", "Cultural"),
    ("workshop", "Educational"),
    ("class", "Educational"),
    ("learn", "Educational"),
    ("museum", "Indoor"),
    ("movie", "Indoor"),
    ("indoor", "Indoor"),
    ("hike", "Outdoor"),
    ("hiking", "Outdoor"),
    ("picnic", "Outdoor"),
    ("park", "Outdoor"),
    ("beach", "Outdoor"),
    ("outdoor", "Outdoor"),
    ("outside", "Outdoor"),
];

const LOCATIONS: &[(&str, &str)] = &[
    ("downtown", "Downtown"),
    ("city center", "Downtown"),
    ("beach", "Beach"),
    ("lake", "Lake"),
    ("mountains", "Mountains"),
    ("mountain", "Mountains"),
    ("park", "Park"),
    ("nearby", "Nearby"),
    ("close by", "Nearby"),
    ("indoors", "Indoors"),
    ("outdoors", "Outdoors"),
];

const DAY_TYPES: &[(&str, DayType)] = &[
    ("weekend", DayType::Weekend),
    ("saturday", DayType::Weekend),
    ("sunday", DayType::Weekend),
    ("weekday", DayType::Weekday),
    ("monday", DayType::Weekday),
    ("tuesday", DayType::Weekday),
    ("wednesday", DayType::Weekday),
    ("thursday", DayType::Weekday),
    ("friday", DayType::Weekday),
];

const DAY_PARTS: &[(&str, DayPart)] = &[
    ("morning", DayPart::Morning),
    ("afternoon", DayPart::Afternoon),
    ("lunchtime", DayPart::Afternoon),
    ("evening", DayPart::Evening),
    ("tonight", DayPart::Evening),
    ("night", DayPart::Evening),
];

fn group_size_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)(\d+)\s*(people|persons|friends|adults|guests|of us)")
            .expect("group size pattern is valid")
    })
}

fn budget_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\$\s*(\d+(?:\.\d{1,2})?)").expect("budget pattern is valid")
    })
}

/// Best-effort parameters found in one utterance. Unset fields mean no
/// signal was found.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedParameters {
    pub group_size: Option<u32>,
    pub activity_level: Option<ActivityLevel>,
    pub budget: Option<String>,
    pub activity_type: Option<String>,
    pub location: Option<String>,
    pub day_type: Option<DayType>,
    pub day_part: Option<DayPart>,
}

impl ExtractedParameters {
    /// True when nothing was recognized.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// `Weekend evening`, `Weekday`, `Afternoon`, or nothing.
    pub fn preferred_day(&self) -> Option<String> {
        match (self.day_type, self.day_part) {
            (Some(day), Some(part)) => Some(format!(
                "{} {}",
                day.as_str(),
                part.as_str().to_lowercase()
            )),
            (Some(day), None) => Some(day.as_str().to_string()),
            (None, Some(part)) => Some(part.as_str().to_string()),
            (None, None) => None,
        }
    }

    /// `(category, key, value)` preference entries for the recognized
    /// parameters.
    pub fn to_preferences(&self) -> Vec<(&'static str, &'static str, Value)> {
        let mut entries = Vec::new();
        if let Some(size) = self.group_size {
            entries.push(("group", "group_size", json!(size)));
        }
        if let Some(level) = self.activity_level {
            entries.push(("activity", "physical_exertion", json!(level.exertion_bucket())));
        }
        if let Some(budget) = &self.budget {
            entries.push(("activity", "budget_range", json!(budget)));
        }
        if let Some(kind) = &self.activity_type {
            entries.push(("activity", "activity_type", json!(kind)));
        }
        if let Some(location) = &self.location {
            entries.push(("activity", "location_preference", json!(location)));
        }
        if let Some(day) = self.preferred_day() {
            entries.push(("timing", "preferred_day", json!(day)));
        }
        entries
    }
}

/// Scans an utterance for planning parameters.
///
/// Keywords match whole words, case-insensitively; within each vocabulary
/// the first table entry present in the text wins.
///
/// # Examples
///
/// ```rust
/// use rally_core::engine::{extract_parameters, ActivityLevel};
///
/// let params = extract_parameters("6 friends, something relaxed, about $40 each, Saturday evening");
/// assert_eq!(params.group_size, Some(6));
/// assert_eq!(params.activity_level, Some(ActivityLevel::Low));
/// assert_eq!(params.budget.as_deref(), Some("$40"));
/// assert_eq!(params.preferred_day().as_deref(), Some("Weekend evening"));
/// ```
pub fn extract_parameters(utterance: &str) -> ExtractedParameters {
    let words = normalize(utterance);

    ExtractedParameters {
        group_size: group_size_pattern()
            .captures(utterance)
            .and_then(|caps| caps[1].parse().ok()),
        activity_level: first_match(&words, ACTIVITY_LEVELS),
        budget: budget_pattern()
            .captures(utterance)
            .map(|caps| format!("${}", &caps[1])),
        activity_type: first_match(&words, ACTIVITY_TYPES).map(str::to_string),
        location: first_match(&words, LOCATIONS).map(str::to_string),
        day_type: first_match(&words, DAY_TYPES),
        day_part: first_match(&words, DAY_PARTS),
    }
}

/// Lowercased words separated by single spaces, padded at both ends so a
/// keyword ` {kw} ` lookup only hits whole words.
fn normalize(text: &str) -> String {
    let mut normalized = String::from(" ");
    for word in text
        .to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
    {
        normalized.push_str(word);
        normalized.push(' ');
    }
    normalized
}

fn first_match<T: Copy>(words: &str, table: &[(&str, T)]) -> Option<T> {
    table
        .iter()
        .find(|(keyword, _)| words.contains(&format!(" {keyword} ")))
        .map(|(_, value)| *value)
}
