//! Static planning vocabulary: activity names, defaults, meals, day parts.

use std::{collections::BTreeSet, fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::models::ClockTime;

/// First-choice venue or outing for each activity-type category.
const ACTIVITY_NAMES: &[(&str, &str)] = &[
    ("Outdoor", "Park Visit"),
    ("Indoor", "Museum Visit"),
    ("Cultural", "Local Festival"),
    ("Educational", "Science Museum"),
    ("Relaxation", "Spa Day"),
    ("Food", "Food Tour"),
    ("Sports", "Mini Golf"),
    ("Adventure", "Zip Lining"),
    ("Art", "Painting Class"),
    ("Music", "Live Music"),
];

/// Name used when the activity type is not in the table.
pub const FALLBACK_ACTIVITY_NAME: &str = "Group Outing";

/// Aggregate used for a dimension nobody answered.
pub const DEFAULT_ACTIVITY_TYPE: &str = "Outdoor";
pub const DEFAULT_DURATION: &str = "2-4 hours";
pub const DEFAULT_PREFERRED_DAY: &str = "Weekend morning";
pub const DEFAULT_BUDGET: &str = "$25";
pub const DEFAULT_EXERTION: &str = "2-3 (Casual walking)";

/// Hours assumed when a duration answer cannot be interpreted.
pub const DEFAULT_DURATION_HOURS: f64 = 3.0;

/// Longest free-form duration taken at face value.
const MAX_DURATION_HOURS: f64 = 24.0;

/// Looks up the outing name for an activity type, case-insensitively.
///
/// # Examples
///
/// ```rust
/// use rally_core::engine::catalog::activity_name;
///
/// assert_eq!(activity_name("Food"), "Food Tour");
/// assert_eq!(activity_name("outdoor"), "Park Visit");
/// assert_eq!(activity_name("Karaoke"), "Group Outing");
/// ```
pub fn activity_name(activity_type: &str) -> &'static str {
    ACTIVITY_NAMES
        .iter()
        .find(|(kind, _)| kind.eq_ignore_ascii_case(activity_type.trim()))
        .map_or(FALLBACK_ACTIVITY_NAME, |(_, name)| name)
}

/// Converts a duration answer to hours.
///
/// Known buckets map to fixed values. Other text uses its first number,
/// read as minutes or days when the text says so and as hours otherwise.
/// Anything outside `(0, 24]` hours falls back to the default.
pub fn duration_hours(duration: &str) -> f64 {
    let normalized = duration.trim().to_lowercase();
    match normalized.as_str() {
        "1-2 hours" => 1.5,
        "2-4 hours" => 3.0,
        "half day" => 4.0,
        "full day" => 8.0,
        _ => free_form_hours(&normalized).unwrap_or(DEFAULT_DURATION_HOURS),
    }
}

fn free_form_hours(text: &str) -> Option<f64> {
    let number = leading_number(text)?;
    let hours = if text.contains("min") {
        number / 60.0
    } else if text.contains("day") && !text.contains("hour") {
        number * 8.0
    } else {
        number
    };
    (hours > 0.0 && hours <= MAX_DURATION_HOURS).then_some(hours)
}

/// Describes an exertion bucket such as `2-3 (Casual walking)`.
pub fn exertion_adjective(exertion: &str) -> &'static str {
    match leading_number(exertion).map(|n| n as u32) {
        Some(0..=1) => "relaxed",
        Some(2..=3) => "easy-going",
        Some(4..=5) => "moderately active",
        Some(6..=7) => "active",
        Some(_) => "high-energy",
        None => "easy-going",
    }
}

fn leading_number(text: &str) -> Option<f64> {
    let start = text.find(|c: char| c.is_ascii_digit())?;
    let digits: String = text[start..]
        .chars()
        .take_while(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    digits.trim_end_matches('.').parse().ok()
}

/// A meal the group may want included.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Meal {
    Breakfast,
    Lunch,
    Dinner,
    Snacks,
}

/// Meals in canonical order.
pub type MealSet = BTreeSet<Meal>;

impl Meal {
    /// Canonical name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Meal::Breakfast => "Breakfast",
            Meal::Lunch => "Lunch",
            Meal::Dinner => "Dinner",
            Meal::Snacks => "Snacks",
        }
    }
}

impl fmt::Display for Meal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Meal {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "breakfast" | "brunch" => Ok(Meal::Breakfast),
            "lunch" => Ok(Meal::Lunch),
            "dinner" | "supper" => Ok(Meal::Dinner),
            "snack" | "snacks" | "refreshments" => Ok(Meal::Snacks),
            _ => Err(format!("Unknown meal: {s}")),
        }
    }
}

/// Weekday or weekend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DayType {
    Weekday,
    Weekend,
}

impl DayType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DayType::Weekday => "Weekday",
            DayType::Weekend => "Weekend",
        }
    }
}

/// Morning, afternoon or evening.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DayPart {
    Morning,
    Afternoon,
    Evening,
}

impl DayPart {
    pub fn as_str(&self) -> &'static str {
        match self {
            DayPart::Morning => "Morning",
            DayPart::Afternoon => "Afternoon",
            DayPart::Evening => "Evening",
        }
    }

    /// Start time used when the organizer did not set one.
    pub fn default_start(&self) -> ClockTime {
        let minutes = match self {
            DayPart::Morning => 9 * 60,
            DayPart::Afternoon => 12 * 60,
            DayPart::Evening => 17 * 60,
        };
        ClockTime::saturating_from_minutes(minutes)
    }

    /// Segment of the day a clock time falls in.
    pub fn of(time: ClockTime) -> Self {
        match time.hour() {
            0..=10 => DayPart::Morning,
            11..=16 => DayPart::Afternoon,
            _ => DayPart::Evening,
        }
    }
}

/// Splits a preferred-day answer like `Weekend afternoon` into its parts.
///
/// A missing day type reads as weekend and a missing part as morning.
pub fn split_preferred_day(preferred_day: &str) -> (DayType, DayPart) {
    let lower = preferred_day.to_lowercase();
    let day_type = if lower.contains("weekday") {
        DayType::Weekday
    } else {
        DayType::Weekend
    };
    let day_part = if lower.contains("afternoon") {
        DayPart::Afternoon
    } else if lower.contains("evening") || lower.contains("night") {
        DayPart::Evening
    } else {
        DayPart::Morning
    };
    (day_type, day_part)
}
