//! Clap argument wrappers for the core parameter types.
//!
//! Each `*Args` struct owns the command-line concerns (positional arguments,
//! flags, help text) and converts into the matching `rally_core::params`
//! type, so the core crate stays free of clap.

use std::{collections::BTreeMap, fmt};

use clap::{Args, ValueEnum};
use rally_core::{
    models::decode_value,
    params::{
        AddParticipant, ConversationInput, CreateActivity, DeleteActivity, ListActivities,
        RecordApproval, RevisePlan, SavePreference, SubmitAnswers, UpdateActivity,
        UpdateParticipant,
    },
};
use serde_json::Value;

/// Parses `key=value`. The value is read as JSON when it parses, otherwise
/// kept as text, so `meals_included=["Lunch","Dinner"]` stores a list and
/// `budget_range=$25-$50` stores a string.
pub fn parse_key_value(input: &str) -> Result<(String, Value), String> {
    let (key, value) = input
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{input}'"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("missing key in '{input}'"));
    }
    Ok((key.to_string(), decode_value(value.trim())))
}

/// Activity status filter
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum StatusArg {
    Planning,
    Planned,
    Finalized,
}

impl fmt::Display for StatusArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusArg::Planning => write!(f, "planning"),
            StatusArg::Planned => write!(f, "planned"),
            StatusArg::Finalized => write!(f, "finalized"),
        }
    }
}

/// Create a new activity
#[derive(Args)]
pub struct CreateActivityArgs {
    /// Title of the activity
    pub title: Option<String>,
    #[arg(short, long, help = "Longer description of the activity")]
    pub description: Option<String>,
    #[arg(
        short = 't',
        long,
        help = "Start time, e.g. '10:30 AM' or '14:00'"
    )]
    pub start_time: Option<String>,
    #[arg(short, long, help = "Meeting address")]
    pub location: Option<String>,
}

impl From<CreateActivityArgs> for CreateActivity {
    fn from(val: CreateActivityArgs) -> Self {
        CreateActivity {
            title: val.title,
            description: val.description,
            start_time: val.start_time,
            location_address: val.location,
        }
    }
}

/// List activities
#[derive(Args)]
pub struct ListActivitiesArgs {
    #[arg(long, value_enum, help = "Only show activities in this status")]
    pub status: Option<StatusArg>,
}

impl From<ListActivitiesArgs> for ListActivities {
    fn from(val: ListActivitiesArgs) -> Self {
        ListActivities {
            status: val.status.map(|s| s.to_string()),
        }
    }
}

/// Update an activity
///
/// Only the provided fields change.
#[derive(Args)]
pub struct UpdateActivityArgs {
    #[arg(help = "ID of the activity to update")]
    pub id: u64,
    #[arg(long, help = "New title")]
    pub title: Option<String>,
    #[arg(short, long, help = "New description")]
    pub description: Option<String>,
    #[arg(short = 't', long, help = "New start time")]
    pub start_time: Option<String>,
    #[arg(short, long, help = "New meeting address")]
    pub location: Option<String>,
}

impl From<UpdateActivityArgs> for UpdateActivity {
    fn from(val: UpdateActivityArgs) -> Self {
        UpdateActivity {
            id: val.id,
            title: val.title,
            description: val.description,
            start_time: val.start_time,
            location_address: val.location,
        }
    }
}

/// Delete an activity with its participants, preferences and plans
#[derive(Args)]
pub struct DeleteActivityArgs {
    #[arg(help = "ID of the activity to delete")]
    pub id: u64,
    #[arg(long, help = "Confirm the deletion")]
    pub confirm: bool,
}

impl From<DeleteActivityArgs> for DeleteActivity {
    fn from(val: DeleteActivityArgs) -> Self {
        DeleteActivity {
            id: val.id,
            confirmed: val.confirm,
        }
    }
}

/// Add a participant to an activity
///
/// Adding a phone number that is already part of the activity returns the
/// existing participant.
#[derive(Args)]
pub struct AddParticipantArgs {
    #[arg(help = "ID of the activity")]
    pub activity_id: u64,
    #[arg(help = "Phone number of the participant")]
    pub phone_number: String,
    #[arg(short, long, help = "Display name")]
    pub name: Option<String>,
    #[arg(short, long, help = "E-mail address")]
    pub email: Option<String>,
}

impl From<AddParticipantArgs> for AddParticipant {
    fn from(val: AddParticipantArgs) -> Self {
        AddParticipant {
            activity_id: val.activity_id,
            phone_number: val.phone_number,
            email: val.email,
            name: val.name,
        }
    }
}

/// Update a participant
#[derive(Args)]
pub struct UpdateParticipantArgs {
    #[arg(help = "ID of the participant to update")]
    pub id: u64,
    #[arg(short, long, help = "New display name")]
    pub name: Option<String>,
    #[arg(short, long, help = "New e-mail address")]
    pub email: Option<String>,
    #[arg(long, help = "Whether group text messages are allowed (true/false)")]
    pub allow_group_text: Option<bool>,
}

impl From<UpdateParticipantArgs> for UpdateParticipant {
    fn from(val: UpdateParticipantArgs) -> Self {
        UpdateParticipant {
            id: val.id,
            name: val.name,
            email: val.email,
            allow_group_text: val.allow_group_text,
        }
    }
}

/// Answer questionnaire questions
#[derive(Args)]
pub struct AnswerArgs {
    #[arg(help = "ID of the answering participant")]
    pub participant_id: u64,
    #[arg(
        required = true,
        value_parser = parse_key_value,
        help = "Answers as QUESTION=VALUE; use a JSON list for multi-choice questions"
    )]
    pub answers: Vec<(String, Value)>,
}

impl From<AnswerArgs> for SubmitAnswers {
    fn from(val: AnswerArgs) -> Self {
        SubmitAnswers {
            participant_id: val.participant_id,
            answers: val.answers.into_iter().collect::<BTreeMap<_, _>>(),
        }
    }
}

/// Store a single preference
#[derive(Args)]
pub struct SetPreferenceArgs {
    #[arg(help = "ID of the activity")]
    pub activity_id: u64,
    #[arg(help = "Preference as CATEGORY.KEY=VALUE", value_parser = parse_key_value)]
    pub preference: (String, Value),
    #[arg(
        short,
        long,
        help = "Participant the preference belongs to; omit for a group preference"
    )]
    pub participant: Option<u64>,
}

impl TryFrom<SetPreferenceArgs> for SavePreference {
    type Error = String;

    fn try_from(val: SetPreferenceArgs) -> Result<Self, Self::Error> {
        let (path, value) = val.preference;
        let (category, key) = path
            .split_once('.')
            .ok_or_else(|| format!("expected CATEGORY.KEY, got '{path}'"))?;
        Ok(SavePreference {
            activity_id: val.activity_id,
            participant_id: val.participant,
            category: category.to_string(),
            key: key.to_string(),
            value,
        })
    }
}

/// Show preferences of an activity or a single participant
#[derive(Args)]
pub struct ShowPreferencesArgs {
    #[arg(help = "ID of the activity")]
    pub activity_id: u64,
    #[arg(short, long, help = "Only show this participant's answers")]
    pub participant: Option<u64>,
}

/// Extract planning details from a free-text message
#[derive(Args)]
pub struct SayArgs {
    #[arg(help = "ID of the activity")]
    pub activity_id: u64,
    #[arg(help = "The message text")]
    pub text: String,
    #[arg(short, long, help = "Participant who wrote the message")]
    pub participant: Option<u64>,
}

impl From<SayArgs> for ConversationInput {
    fn from(val: SayArgs) -> Self {
        ConversationInput {
            activity_id: val.activity_id,
            participant_id: val.participant,
            text: val.text,
        }
    }
}

/// Revise a plan with feedback
///
/// The original plan is kept; the revision is stored as a new plan.
#[derive(Args)]
pub struct RevisePlanArgs {
    #[arg(help = "ID of the plan to revise")]
    pub plan_id: u64,
    #[arg(help = "What should change")]
    pub feedback: String,
    #[arg(short, long, help = "Participant giving the feedback")]
    pub participant: Option<u64>,
}

impl From<RevisePlanArgs> for RevisePlan {
    fn from(val: RevisePlanArgs) -> Self {
        RevisePlan {
            plan_id: val.plan_id,
            feedback: val.feedback,
            participant_id: val.participant,
        }
    }
}

/// Record a participant's verdict on a plan awaiting approval
#[derive(Args)]
pub struct ApproveArgs {
    #[arg(help = "ID of the plan")]
    pub plan_id: u64,
    #[arg(help = "ID of the participant")]
    pub participant_id: u64,
    #[arg(long, help = "Record a decline instead of an approval")]
    pub decline: bool,
    #[arg(short, long, help = "Optional comment")]
    pub feedback: Option<String>,
}

impl From<ApproveArgs> for RecordApproval {
    fn from(val: ApproveArgs) -> Self {
        RecordApproval {
            plan_id: val.plan_id,
            participant_id: val.participant_id,
            approved: !val.decline,
            feedback: val.feedback,
        }
    }
}
