//! Versioned participant questionnaires.
//!
//! Each bank is built once and shared. Every question names the preference
//! category its answer is stored under, so submissions are routed by looking
//! the question up rather than by hard-coded id lists.

use std::sync::OnceLock;

use serde::Serialize;

use crate::models::Categories;

/// Category for answers to questions no bank knows about.
pub const OTHER_CATEGORY: &str = "other";

/// Latest questionnaire version.
pub const CURRENT_VERSION: u32 = 2;

/// How a question expects to be answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionKind {
    Text,
    Textarea,
    Email,
    Number,
    Boolean,
    Select,
    Multiselect,
}

/// One questionnaire entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Question {
    pub id: &'static str,
    pub kind: QuestionKind,
    pub prompt: &'static str,
    pub options: &'static [&'static str],
    pub required: bool,
    pub category: &'static str,
}

/// Questions asked together; all share one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuestionBatch {
    pub category: &'static str,
    pub questions: Vec<Question>,
}

/// An immutable, versioned questionnaire.
#[derive(Debug, PartialEq, Eq, Serialize)]
pub struct QuestionBank {
    pub version: u32,
    pub batches: Vec<QuestionBatch>,
}

impl QuestionBank {
    /// Returns the bank for `version`, or `None` if there is no such version.
    pub fn version(version: u32) -> Option<&'static QuestionBank> {
        match version {
            1 => Some(v1()),
            2 => Some(v2()),
            _ => None,
        }
    }

    /// The latest bank.
    pub fn current() -> &'static QuestionBank {
        v2()
    }

    /// First batch whose category has no recorded answer, or `None` when
    /// the questionnaire is complete.
    pub fn next_batch(&self, answered: &Categories) -> Option<&QuestionBatch> {
        self.batches.iter().find(|batch| {
            answered
                .get(batch.category)
                .map_or(true, |answers| answers.is_empty())
        })
    }

    /// Looks up a question by id.
    pub fn question(&self, id: &str) -> Option<&Question> {
        self.batches
            .iter()
            .flat_map(|batch| batch.questions.iter())
            .find(|q| q.id == id)
    }

    /// Category an answer to `question_id` is stored under.
    ///
    /// Ids from other versions still resolve so that answers collected
    /// against an older questionnaire keep their category.
    pub fn category_for(&self, question_id: &str) -> &'static str {
        std::iter::once(self)
            .chain([v1(), v2()])
            .find_map(|bank| bank.question(question_id))
            .map_or(OTHER_CATEGORY, |q| q.category)
    }
}

type QuestionSpec = (
    &'static str,
    QuestionKind,
    &'static str,
    &'static [&'static str],
    bool,
);

fn question(
    id: &'static str,
    kind: QuestionKind,
    prompt: &'static str,
    options: &'static [&'static str],
    required: bool,
) -> QuestionSpec {
    (id, kind, prompt, options, required)
}

fn batch(category: &'static str, specs: Vec<QuestionSpec>) -> QuestionBatch {
    QuestionBatch {
        category,
        questions: specs
            .into_iter()
            .map(|(id, kind, prompt, options, required)| Question {
                id,
                kind,
                prompt,
                options,
                required,
                category,
            })
            .collect(),
    }
}

fn contact_batch() -> QuestionBatch {
    use QuestionKind::*;
    batch(
        "contact",
        vec![
            question("email", Email, "What is your email address?", &[], true),
            question("name", Text, "What is your name?", &[], true),
            question(
                "allow_group_text",
                Boolean,
                "Would you like to be included in a group text for this activity?",
                &[],
                true,
            ),
        ],
    )
}

fn v1() -> &'static QuestionBank {
    use QuestionKind::*;
    static BANK: OnceLock<QuestionBank> = OnceLock::new();
    BANK.get_or_init(|| QuestionBank {
        version: 1,
        batches: vec![
            contact_batch(),
            batch(
                "group",
                vec![
                    question("group_size", Number, "How many people will be in your group?", &[], true),
                    question("has_children", Boolean, "Will there be any children in your group?", &[], true),
                    question(
                        "has_seniors",
                        Boolean,
                        "Will there be any seniors or people with mobility concerns in your group?",
                        &[],
                        true,
                    ),
                ],
            ),
            batch(
                "timing",
                vec![
                    question(
                        "preferred_day",
                        Select,
                        "What day would you prefer for this activity?",
                        &["Weekday", "Weekend", "No preference"],
                        true,
                    ),
                    question(
                        "preferred_time",
                        Select,
                        "What time of day do you prefer?",
                        &["Morning", "Afternoon", "Evening", "No preference"],
                        true,
                    ),
                    question(
                        "duration",
                        Select,
                        "How long would you like the activity to be?",
                        &["1-2 hours", "2-4 hours", "Half day", "Full day"],
                        true,
                    ),
                ],
            ),
            batch(
                "activity",
                vec![
                    question(
                        "activity_type",
                        Multiselect,
                        "What types of activities are you interested in?",
                        &["Outdoor", "Indoor", "Cultural", "Educational", "Relaxation", "Food", "Sports"],
                        true,
                    ),
                    question(
                        "walking_preference",
                        Select,
                        "How much walking are you comfortable with?",
                        &["Minimal", "Moderate", "Extensive"],
                        true,
                    ),
                    question(
                        "budget_range",
                        Select,
                        "What is your budget range per person?",
                        &["$0-$25", "$25-$50", "$50-$100", "$100+"],
                        true,
                    ),
                ],
            ),
            requirements_batch(false),
        ],
    })
}

fn v2() -> &'static QuestionBank {
    use QuestionKind::*;
    static BANK: OnceLock<QuestionBank> = OnceLock::new();
    BANK.get_or_init(|| QuestionBank {
        version: 2,
        batches: vec![
            contact_batch(),
            batch(
                "group",
                vec![
                    question("group_size", Number, "How many people will be in your group?", &[], true),
                    question("has_children", Boolean, "Will there be any children in your group?", &[], true),
                    question(
                        "has_seniors",
                        Boolean,
                        "Will there be any seniors or people with mobility concerns in your group?",
                        &[],
                        true,
                    ),
                    question(
                        "social_level",
                        Select,
                        "How social would you like the activity to be?",
                        &["Quiet and low-key", "Some mingling", "Very social"],
                        false,
                    ),
                ],
            ),
            batch(
                "timing",
                vec![
                    question(
                        "preferred_day",
                        Select,
                        "When would you prefer to do this activity?",
                        &[
                            "Weekday morning",
                            "Weekday afternoon",
                            "Weekday evening",
                            "Weekend morning",
                            "Weekend afternoon",
                            "Weekend evening",
                        ],
                        true,
                    ),
                    question(
                        "duration",
                        Select,
                        "How long would you like the activity to be?",
                        &["1-2 hours", "2-4 hours", "Half day", "Full day"],
                        true,
                    ),
                ],
            ),
            batch(
                "activity",
                vec![
                    question(
                        "activity_type",
                        Multiselect,
                        "What types of activities are you interested in?",
                        &[
                            "Outdoor",
                            "Indoor",
                            "Cultural",
                            "Educational",
                            "Relaxation",
                            "Food",
                            "Sports",
                            "Adventure",
                            "Art",
                            "Music",
                        ],
                        true,
                    ),
                    question(
                        "physical_exertion",
                        Select,
                        "How physically demanding can the activity be?",
                        &[
                            "1 (Minimal)",
                            "2-3 (Casual walking)",
                            "4-5 (Moderate)",
                            "6-7 (Active)",
                            "8-10 (Strenuous)",
                        ],
                        true,
                    ),
                    question(
                        "budget_range",
                        Select,
                        "What is your budget range per person?",
                        &["$0-$25", "$25-$50", "$50-$100", "$100+"],
                        true,
                    ),
                    question(
                        "learning_preference",
                        Select,
                        "Would you rather learn something new or enjoy something familiar?",
                        &["Learn something new", "Practice existing skills", "No preference"],
                        false,
                    ),
                ],
            ),
            batch(
                "meals",
                vec![question(
                    "meals_included",
                    Multiselect,
                    "Which meals should the plan include?",
                    &["Breakfast", "Lunch", "Dinner", "Snacks", "None"],
                    true,
                )],
            ),
            requirements_batch(true),
        ],
    })
}

fn requirements_batch(with_direct_input: bool) -> QuestionBatch {
    use QuestionKind::*;
    let mut specs = vec![
        question(
            "dietary_restrictions",
            Text,
            "Are there any dietary restrictions or preferences to consider?",
            &[],
            false,
        ),
        question(
            "accessibility_needs",
            Text,
            "Are there any accessibility requirements to consider?",
            &[],
            false,
        ),
        question(
            "additional_info",
            Textarea,
            "Is there anything else you would like to add?",
            &[],
            false,
        ),
    ];
    if with_direct_input {
        specs.push(question(
            "direct_input",
            Textarea,
            "Describe your ideal outing in your own words.",
            &[],
            false,
        ));
    }
    batch("requirements", specs)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use serde_json::json;

    use super::*;

    fn answered(categories: &[&str]) -> Categories {
        categories
            .iter()
            .map(|c| {
                let mut answers = BTreeMap::new();
                answers.insert("x".to_string(), json!("y"));
                (c.to_string(), answers)
            })
            .collect()
    }

    #[test]
    fn test_next_batch_progression() {
        let bank = QuestionBank::current();
        assert_eq!(bank.next_batch(&Categories::new()).unwrap().category, "contact");
        assert_eq!(bank.next_batch(&answered(&["contact"])).unwrap().category, "group");
        assert_eq!(
            bank.next_batch(&answered(&["contact", "group", "timing"]))
                .unwrap()
                .category,
            "activity"
        );
        // answering out of order still asks the earliest gap
        assert_eq!(
            bank.next_batch(&answered(&["group", "timing"])).unwrap().category,
            "contact"
        );
    }

    #[test]
    fn test_questionnaire_completes() {
        let bank = QuestionBank::current();
        let all: Vec<&str> = bank.batches.iter().map(|b| b.category).collect();
        assert!(bank.next_batch(&answered(&all)).is_none());
    }

    #[test]
    fn test_category_mapping() {
        let bank = QuestionBank::current();
        assert_eq!(bank.category_for("email"), "contact");
        assert_eq!(bank.category_for("social_level"), "group");
        assert_eq!(bank.category_for("duration"), "timing");
        assert_eq!(bank.category_for("learning_preference"), "activity");
        assert_eq!(bank.category_for("meals_included"), "meals");
        assert_eq!(bank.category_for("direct_input"), "requirements");
        // only the first version asks for a separate time of day
        assert_eq!(bank.category_for("preferred_time"), "timing");
        assert_eq!(bank.category_for("favorite_color"), OTHER_CATEGORY);
    }

    #[test]
    fn test_versions() {
        assert_eq!(QuestionBank::version(1).unwrap().batches.len(), 5);
        assert_eq!(QuestionBank::version(2).unwrap().batches.len(), 6);
        assert!(QuestionBank::version(3).is_none());
        assert!(std::ptr::eq(QuestionBank::current(), QuestionBank::version(CURRENT_VERSION).unwrap()));
    }

    #[test]
    fn test_batches_share_their_category() {
        for version in [1, 2] {
            for batch in &QuestionBank::version(version).unwrap().batches {
                assert!(batch.questions.iter().all(|q| q.category == batch.category));
            }
        }
    }
}
