//! Collection wrapper types for displaying lists of activities, plans and
//! preferences.

use std::{collections::BTreeMap, fmt, ops::Index};

use super::datetime::LocalDateTime;
use crate::models::{display_value, Activity, Categories, Plan, PreferenceSet};

/// Implements the read-only `Vec` accessors shared by the wrappers.
macro_rules! collection_wrapper {
    ($wrapper:ident, $item:ty) => {
        impl $wrapper {
            /// Check if the collection is empty.
            pub fn is_empty(&self) -> bool {
                self.0.is_empty()
            }

            /// Number of items in the collection.
            pub fn len(&self) -> usize {
                self.0.len()
            }

            /// Item at `index`, if any.
            pub fn get(&self, index: usize) -> Option<&$item> {
                self.0.get(index)
            }

            /// Iterator over the items.
            pub fn iter(&self) -> std::slice::Iter<'_, $item> {
                self.0.iter()
            }
        }

        impl Index<usize> for $wrapper {
            type Output = $item;

            fn index(&self, index: usize) -> &Self::Output {
                &self.0[index]
            }
        }

        impl IntoIterator for $wrapper {
            type Item = $item;
            type IntoIter = std::vec::IntoIter<Self::Item>;

            fn into_iter(self) -> Self::IntoIter {
                self.0.into_iter()
            }
        }

        impl<'a> IntoIterator for &'a $wrapper {
            type Item = &'a $item;
            type IntoIter = std::slice::Iter<'a, $item>;

            fn into_iter(self) -> Self::IntoIter {
                self.0.iter()
            }
        }
    };
}

/// Newtype wrapper for displaying a list of activities, one summary each.
///
/// # Examples
///
/// ```rust
/// use rally_core::display::Activities;
///
/// assert_eq!(Activities(Vec::new()).to_string(), "No activities found.\n");
/// ```
pub struct Activities(pub Vec<Activity>);

collection_wrapper!(Activities, Activity);

impl fmt::Display for Activities {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return writeln!(f, "No activities found.");
        }
        for activity in &self.0 {
            writeln!(f, "## {} (ID: {})", activity.display_title(), activity.id)?;
            writeln!(f)?;
            writeln!(f, "- **Status**: {}", activity.status)?;
            writeln!(f, "- **Participants**: {}", activity.participants.len())?;
            if let Some(start) = &activity.start_time {
                writeln!(f, "- **Start time**: {start}")?;
            }
            writeln!(f, "- **Created**: {}", LocalDateTime(&activity.created_at))?;
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Newtype wrapper for displaying the plan history of an activity.
pub struct Plans(pub Vec<Plan>);

collection_wrapper!(Plans, Plan);

impl fmt::Display for Plans {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return writeln!(f, "No plans found.");
        }
        for plan in &self.0 {
            writeln!(f, "## {}. {} ({})", plan.id, plan.title, plan.status.with_icon())?;
            writeln!(f)?;
            if let Some(original) = plan.revised_from {
                writeln!(f, "- **Revised from**: plan {original}")?;
            }
            let approved = plan.approvals.iter().filter(|a| a.approved).count();
            if !plan.approvals.is_empty() {
                writeln!(
                    f,
                    "- **Approvals**: {approved} of {}",
                    plan.approvals.len()
                )?;
            }
            writeln!(f, "- **Created**: {}", LocalDateTime(&plan.created_at))?;
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Newtype wrapper for displaying one participant's answers, grouped by
/// category.
///
/// # Examples
///
/// ```rust
/// use rally_core::{display::Preferences, models::Categories};
///
/// assert_eq!(
///     Preferences(Categories::new()).to_string(),
///     "No preferences recorded.\n"
/// );
/// ```
pub struct Preferences(pub Categories);

impl fmt::Display for Preferences {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.values().all(BTreeMap::is_empty) {
            return writeln!(f, "No preferences recorded.");
        }
        write_categories(f, &self.0)
    }
}

impl fmt::Display for PreferenceSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return writeln!(f, "No preferences recorded.");
        }
        if !self.group.is_empty() {
            writeln!(f, "## Group")?;
            writeln!(f)?;
            write_categories(f, &self.group)?;
            writeln!(f)?;
        }
        for (participant_id, categories) in &self.participants {
            writeln!(f, "## Participant {participant_id}")?;
            writeln!(f)?;
            write_categories(f, categories)?;
            writeln!(f)?;
        }
        Ok(())
    }
}

fn write_categories(f: &mut fmt::Formatter<'_>, categories: &Categories) -> fmt::Result {
    for (category, entries) in categories {
        for (key, value) in entries {
            writeln!(f, "- **{category}.{key}**: {}", display_value(value))?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_empty_collections() {
        assert_eq!(Plans(Vec::new()).to_string(), "No plans found.\n");
        assert_eq!(PreferenceSet::new().to_string(), "No preferences recorded.\n");
    }

    #[test]
    fn test_preference_set_display() {
        let mut set = PreferenceSet::new();
        set.insert(None, "requirements", "direct_input", json!("Near the lake"));
        set.insert(Some(2), "meals", "meals_included", json!(["Lunch", "Snacks"]));

        let output = set.to_string();
        assert!(output.contains("## Group"));
        assert!(output.contains("- **requirements.direct_input**: Near the lake"));
        assert!(output.contains("## Participant 2"));
        assert!(output.contains("- **meals.meals_included**: [\"Lunch\",\"Snacks\"]"));
    }
}
