//! Prompt templates offered by the MCP server.

/// Argument of a prompt template
#[derive(Debug, Clone)]
pub struct PromptTemplateArg {
    pub name: &'static str,
    pub description: &'static str,
    pub required: bool,
}

/// A named prompt with `{argument}` placeholders
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    pub name: &'static str,
    pub description: &'static str,
    pub template: &'static str,
    pub arguments: &'static [PromptTemplateArg],
}

impl PromptTemplate {
    /// Fills each placeholder with the value `lookup` returns for it. Fails
    /// with the name of the first missing required argument.
    pub fn apply<'a>(
        &self,
        lookup: impl Fn(&str) -> Option<&'a str>,
    ) -> Result<String, &'static str> {
        let mut text = self.template.to_string();
        for arg in self.arguments {
            let value = match lookup(arg.name) {
                Some(value) => value,
                None if arg.required => return Err(arg.name),
                None => "(not provided)",
            };
            text = text.replace(&format!("{{{}}}", arg.name), value);
        }
        Ok(text)
    }
}

pub static PROMPT_TEMPLATES: &[PromptTemplate] = &[
    PromptTemplate {
        name: "organize",
        description: "Set up an activity and invite its participants using Rally's MCP tools",
        template: r#"You are organizing a group activity with Rally.

# Occasion
{occasion}

# Participants
{participants}

# Steps
1. Use `create_activity` with a short title, a description of the occasion and, if known, a start time such as "10:30 AM" and a meeting address.
2. Add every participant with `add_participant`. Phone numbers identify participants; adding the same number twice returns the existing participant.
3. For each participant call `next_questions` and relay the questions. Submit what they answer with `submit_answers`, using question IDs as keys and lists for multi-choice questions.
4. Messages that do not fit a question can be passed to `process_conversation_input`.
5. Check progress with `response_stats`. Once enough people have answered, call `generate_plan` and share the result with `show_plan`.
"#,
        arguments: &[
            PromptTemplateArg {
                name: "occasion",
                description: "What the activity is for, e.g. a birthday or a team outing",
                required: true,
            },
            PromptTemplateArg {
                name: "participants",
                description: "Names and phone numbers of the people taking part",
                required: false,
            },
        ],
    },
    PromptTemplate {
        name: "settle",
        description: "Drive a plan through revision and approval to a final version",
        template: r#"Bring the current plan of activity {activity_id} to a final version.

1. Read it with `current_plan`.
2. Collect feedback. For each concrete change request call `revise_plan` with the plan ID, the feedback and the participant who asked. Each revision is a new plan; keep working on the newest one.
3. When nobody has further changes, call `request_approval`.
4. Record every participant's verdict with `record_approval`. A decline should carry the reason as feedback.
5. If the group agrees, call `finalize_plan`. Otherwise revise again using the decline reasons.
"#,
        arguments: &[PromptTemplateArg {
            name: "activity_id",
            description: "ID of the activity whose plan should be settled",
            required: true,
        }],
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    fn template(name: &str) -> &'static PromptTemplate {
        PROMPT_TEMPLATES
            .iter()
            .find(|t| t.name == name)
            .expect("template exists")
    }

    #[test]
    fn test_apply_substitutes_arguments() {
        let text = template("settle")
            .apply(|name| (name == "activity_id").then_some("12"))
            .expect("all required arguments given");
        assert!(text.contains("activity 12"));
        assert!(!text.contains("{activity_id}"));
    }

    #[test]
    fn test_apply_reports_missing_required_argument() {
        assert_eq!(template("organize").apply(|_| None), Err("occasion"));
    }

    #[test]
    fn test_optional_argument_has_placeholder_text() {
        let text = template("organize")
            .apply(|name| (name == "occasion").then_some("Team outing"))
            .expect("required argument given");
        assert!(text.contains("Team outing"));
        assert!(text.contains("(not provided)"));
    }
}
