//! Command handlers for the Rally CLI.
//!
//! Every handler calls one [`Planner`] operation and renders its markdown
//! output through the [`TerminalRenderer`].

use std::fmt;

use anyhow::{anyhow, Context, Result};
use clap::Subcommand;
use rally_core::{
    display::{
        Activities, CreateResult, DeleteResult, OperationStatus, Plans, Preferences, UpdateResult,
    },
    params::{ActivityId, DeleteActivity, Id, ListActivities, SavePreference},
    Planner,
};

use crate::renderer::TerminalRenderer;

mod params;

pub use params::{
    AddParticipantArgs, AnswerArgs, ApproveArgs, CreateActivityArgs, DeleteActivityArgs,
    ListActivitiesArgs, RevisePlanArgs, SayArgs, SetPreferenceArgs, ShowPreferencesArgs,
    UpdateActivityArgs, UpdateParticipantArgs,
};

/// Activity management commands
#[derive(Subcommand)]
pub enum ActivityCommands {
    /// Create a new activity
    #[command(alias = "c")]
    Create(CreateActivityArgs),
    /// List activities, newest first
    #[command(alias = "ls")]
    List(ListActivitiesArgs),
    /// Show an activity and its participants
    Show {
        #[arg(help = "ID of the activity")]
        id: u64,
    },
    /// Update an activity
    Update(UpdateActivityArgs),
    /// Delete an activity and everything recorded for it
    #[command(alias = "rm")]
    Delete(DeleteActivityArgs),
    /// Show how many participants have answered
    Stats {
        #[arg(help = "ID of the activity")]
        activity_id: u64,
    },
}

/// Participant and questionnaire commands
#[derive(Subcommand)]
pub enum ParticipantCommands {
    /// Add a participant to an activity
    Add(AddParticipantArgs),
    /// Update a participant
    Update(UpdateParticipantArgs),
    /// Show a participant
    Show {
        #[arg(help = "ID of the participant")]
        id: u64,
    },
    /// Show the next batch of unanswered questions
    #[command(alias = "q")]
    Questions {
        #[arg(help = "ID of the participant")]
        id: u64,
    },
    /// Answer questionnaire questions
    Answer(AnswerArgs),
    /// Discard a participant's answers and restart the questionnaire
    Reset {
        #[arg(help = "ID of the participant")]
        id: u64,
    },
}

/// Preference commands
#[derive(Subcommand)]
pub enum PrefCommands {
    /// Store a single preference
    Set(SetPreferenceArgs),
    /// Show recorded preferences
    Show(ShowPreferencesArgs),
    /// Extract planning details from a free-text message
    Say(SayArgs),
}

/// Plan commands
#[derive(Subcommand)]
pub enum PlanCommands {
    /// Generate a plan from the recorded preferences
    #[command(alias = "gen")]
    Generate {
        #[arg(help = "ID of the activity")]
        activity_id: u64,
    },
    /// Show a plan, or the current plan of an activity
    Show {
        #[arg(help = "ID of the plan", required_unless_present = "activity")]
        id: Option<u64>,
        #[arg(long, help = "Show the current plan of this activity instead")]
        activity: Option<u64>,
    },
    /// List every plan of an activity, newest first
    #[command(alias = "ls")]
    List {
        #[arg(help = "ID of the activity")]
        activity_id: u64,
    },
    /// Revise a plan with feedback
    Revise(RevisePlanArgs),
    /// Send a plan out for approval
    RequestApproval {
        #[arg(help = "ID of the plan")]
        id: u64,
    },
    /// Record a participant's approval or decline
    Approve(ApproveArgs),
    /// Finalize a plan
    Finalize {
        #[arg(help = "ID of the plan")]
        id: u64,
    },
}

pub struct Cli {
    planner: Planner,
    renderer: TerminalRenderer,
}

impl Cli {
    pub fn new(planner: Planner, renderer: TerminalRenderer) -> Self {
        Self { planner, renderer }
    }

    pub async fn handle_activity_command(&self, command: ActivityCommands) -> Result<()> {
        match command {
            ActivityCommands::Create(args) => {
                let activity = self
                    .planner
                    .create_activity(&args.into())
                    .await
                    .context("Failed to create activity")?;
                self.render(&CreateResult::new(activity));
            }
            ActivityCommands::List(args) => self.list_activities(&args.into()).await?,
            ActivityCommands::Show { id } => {
                let activity = self
                    .planner
                    .get_activity(&Id { id })
                    .await
                    .context("Failed to get activity")?;
                self.render(&activity);
            }
            ActivityCommands::Update(args) => {
                let activity = self
                    .planner
                    .update_activity(&args.into())
                    .await
                    .context("Failed to update activity")?;
                self.render(&UpdateResult::new(activity));
            }
            ActivityCommands::Delete(args) => self.delete_activity(&args.into()).await?,
            ActivityCommands::Stats { activity_id } => {
                let stats = self
                    .planner
                    .response_stats(&ActivityId { activity_id })
                    .await
                    .context("Failed to get response statistics")?;
                self.render(&stats);
            }
        }
        Ok(())
    }

    pub async fn handle_participant_command(&self, command: ParticipantCommands) -> Result<()> {
        match command {
            ParticipantCommands::Add(args) => {
                let participant = self
                    .planner
                    .add_participant(&args.into())
                    .await
                    .context("Failed to add participant")?;
                self.render(&CreateResult::new(participant));
            }
            ParticipantCommands::Update(args) => {
                let participant = self
                    .planner
                    .update_participant(&args.into())
                    .await
                    .context("Failed to update participant")?;
                self.render(&UpdateResult::new(participant));
            }
            ParticipantCommands::Show { id } => {
                let participant = self
                    .planner
                    .get_participant(&Id { id })
                    .await
                    .context("Failed to get participant")?;
                self.render(&participant);
            }
            ParticipantCommands::Questions { id } => {
                let batch = self
                    .planner
                    .next_questions(&Id { id })
                    .await
                    .context("Failed to get questions")?;
                match batch {
                    Some(batch) => self.render(&batch),
                    None => self.render(&OperationStatus::success(format!(
                        "Participant {id} has answered every question"
                    ))),
                }
            }
            ParticipantCommands::Answer(args) => {
                let submission = self
                    .planner
                    .submit_answers(&args.into())
                    .await
                    .context("Failed to submit answers")?;
                self.render(&submission);
            }
            ParticipantCommands::Reset { id } => {
                let participant = self
                    .planner
                    .reset_participant(&Id { id })
                    .await
                    .context("Failed to reset participant")?;
                self.render(&UpdateResult::with_changes(
                    participant,
                    vec!["Answers discarded".to_string()],
                ));
            }
        }
        Ok(())
    }

    pub async fn handle_pref_command(&self, command: PrefCommands) -> Result<()> {
        match command {
            PrefCommands::Set(args) => {
                let params = SavePreference::try_from(args).map_err(|e| anyhow!(e))?;
                self.planner
                    .save_preference(&params)
                    .await
                    .context("Failed to save preference")?;
                self.render(&OperationStatus::success(format!(
                    "Saved {}.{}",
                    params.category, params.key
                )));
            }
            PrefCommands::Show(args) => match args.participant {
                Some(id) => {
                    let categories = self
                        .planner
                        .get_participant_preferences(&Id { id })
                        .await
                        .context("Failed to get preferences")?;
                    self.render(&Preferences(categories));
                }
                None => {
                    let set = self
                        .planner
                        .get_all_preferences(&ActivityId {
                            activity_id: args.activity_id,
                        })
                        .await
                        .context("Failed to get preferences")?;
                    self.render(&set);
                }
            },
            PrefCommands::Say(args) => {
                let extracted = self
                    .planner
                    .process_conversation_input(&args.into())
                    .await
                    .context("Failed to process message")?;
                self.render(&extracted);
            }
        }
        Ok(())
    }

    pub async fn handle_plan_command(&self, command: PlanCommands) -> Result<()> {
        match command {
            PlanCommands::Generate { activity_id } => {
                let plan = self
                    .planner
                    .generate_plan(&ActivityId { activity_id })
                    .await
                    .context("Failed to generate plan")?;
                self.render(&CreateResult::new(plan));
            }
            PlanCommands::Show { id, activity } => self.show_plan(id, activity).await?,
            PlanCommands::List { activity_id } => {
                let plans = self
                    .planner
                    .list_plans(&ActivityId { activity_id })
                    .await
                    .context("Failed to list plans")?;
                self.render(&Plans(plans));
            }
            PlanCommands::Revise(args) => {
                let plan = self
                    .planner
                    .revise_plan(&args.into())
                    .await
                    .context("Failed to revise plan")?;
                self.render(&CreateResult::new(plan));
            }
            PlanCommands::RequestApproval { id } => {
                let plan = self
                    .planner
                    .request_approval(&Id { id })
                    .await
                    .context("Failed to request approval")?;
                self.render(&UpdateResult::with_changes(
                    plan,
                    vec!["Sent out for approval".to_string()],
                ));
            }
            PlanCommands::Approve(args) => {
                let approval = self
                    .planner
                    .record_approval(&args.into())
                    .await
                    .context("Failed to record approval")?;
                let verdict = if approval.approved { "approval" } else { "decline" };
                self.render(&OperationStatus::success(format!(
                    "Recorded {verdict} of plan {} by participant {}",
                    approval.plan_id, approval.participant_id
                )));
            }
            PlanCommands::Finalize { id } => {
                let plan = self
                    .planner
                    .finalize_plan(&Id { id })
                    .await
                    .context("Failed to finalize plan")?;
                self.render(&UpdateResult::with_changes(
                    plan,
                    vec!["Plan finalized".to_string()],
                ));
            }
        }
        Ok(())
    }

    /// Lists activities; also the default when no command is given.
    pub async fn list_activities(&self, params: &ListActivities) -> Result<()> {
        let activities = self
            .planner
            .list_activities(params)
            .await
            .context("Failed to list activities")?;
        self.render(&Activities(activities));
        Ok(())
    }

    async fn delete_activity(&self, params: &DeleteActivity) -> Result<()> {
        let activity = self
            .planner
            .get_activity(&Id { id: params.id })
            .await
            .context("Failed to get activity")?;
        self.planner
            .delete_activity(params)
            .await
            .context("Failed to delete activity")?;
        self.render(&DeleteResult::new(activity));
        Ok(())
    }

    async fn show_plan(&self, id: Option<u64>, activity: Option<u64>) -> Result<()> {
        let plan = match (id, activity) {
            (Some(id), _) => self
                .planner
                .get_plan(&Id { id })
                .await
                .context("Failed to get plan")?,
            (None, Some(activity_id)) => self
                .planner
                .current_plan(&ActivityId { activity_id })
                .await
                .context("Failed to get current plan")?
                .ok_or_else(|| anyhow!("Activity {activity_id} has no plan yet"))?,
            (None, None) => return Err(anyhow!("Provide a plan ID or --activity")),
        };
        self.render(&plan);
        Ok(())
    }

    fn render<T: fmt::Display>(&self, output: &T) {
        self.renderer.render(&output.to_string());
    }
}
