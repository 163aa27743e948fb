//! MCP server for Rally.
//!
//! Exposes the planner operations as Model Context Protocol tools over
//! stdio, so an AI assistant can run the whole workflow: create an activity,
//! collect answers, generate a plan, revise it and take it to approval.
//! Every tool returns the same markdown the CLI prints.

use std::{fmt, future::Future, sync::Arc};

use anyhow::Result;
use log::{debug, error, info};
use rally_core::{
    display::{
        Activities, CreateResult, DeleteResult, OperationStatus, Plans, Preferences, UpdateResult,
    },
    params::{
        ActivityId, AddParticipant, ConversationInput, CreateActivity, DeleteActivity, Id,
        ListActivities, RecordApproval, RevisePlan, SavePreference, SubmitAnswers, UpdateActivity,
        UpdateParticipant,
    },
    Planner,
};
use rmcp::{
    handler::server::{router::tool::ToolRouter, tool::Parameters},
    model::{
        CallToolResult, Content, GetPromptRequestParam, GetPromptResult, Implementation,
        ListPromptsResult, PaginatedRequestParam, Prompt, PromptArgument, PromptMessage,
        PromptMessageContent, PromptMessageRole, ProtocolVersion, ServerCapabilities, ServerInfo,
    },
    service::RequestContext,
    tool, tool_handler, tool_router, ErrorData as McpError, RoleServer, ServerHandler,
};
use serde_json::Value;
use tokio::{
    signal::unix::{signal, SignalKind},
    sync::Mutex,
};

mod errors;
mod prompts;

use errors::to_mcp_error;
use prompts::PROMPT_TEMPLATES;

pub type McpResult = Result<CallToolResult, McpError>;

fn text(output: &impl fmt::Display) -> McpResult {
    Ok(CallToolResult::success(vec![Content::text(
        output.to_string(),
    )]))
}

/// MCP server for Rally
#[derive(Clone)]
pub struct RallyMcpServer {
    planner: Arc<Mutex<Planner>>,
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl RallyMcpServer {
    pub fn new(planner: Planner) -> Self {
        Self {
            planner: Arc::new(Mutex::new(planner)),
            tool_router: Self::tool_router(),
        }
    }

    #[tool(
        name = "create_activity",
        description = "Create a new group activity. All fields are optional: title, description, start_time (e.g. '10:30 AM' or '14:00') and location_address. Returns the activity ID used by every other tool."
    )]
    async fn create_activity(&self, Parameters(params): Parameters<CreateActivity>) -> McpResult {
        debug!("create_activity: {params:?}");
        let activity = self
            .planner
            .lock()
            .await
            .create_activity(&params)
            .await
            .map_err(|e| to_mcp_error("Failed to create activity", &e))?;
        text(&CreateResult::new(activity))
    }

    #[tool(
        name = "list_activities",
        description = "List activities, newest first. Optionally filter by status: 'planning' (collecting preferences), 'planned' (has a plan) or 'finalized'."
    )]
    async fn list_activities(&self, Parameters(params): Parameters<ListActivities>) -> McpResult {
        debug!("list_activities: {params:?}");
        let activities = self
            .planner
            .lock()
            .await
            .list_activities(&params)
            .await
            .map_err(|e| to_mcp_error("Failed to list activities", &e))?;
        text(&Activities(activities))
    }

    #[tool(
        name = "show_activity",
        description = "Show an activity with its details and participants."
    )]
    async fn show_activity(&self, Parameters(params): Parameters<Id>) -> McpResult {
        debug!("show_activity: {params:?}");
        let activity = self
            .planner
            .lock()
            .await
            .get_activity(&params)
            .await
            .map_err(|e| to_mcp_error("Failed to get activity", &e))?;
        text(&activity)
    }

    #[tool(
        name = "update_activity",
        description = "Update an activity's title, description, start_time or location_address. Omitted fields are left unchanged."
    )]
    async fn update_activity(&self, Parameters(params): Parameters<UpdateActivity>) -> McpResult {
        debug!("update_activity: {params:?}");
        let activity = self
            .planner
            .lock()
            .await
            .update_activity(&params)
            .await
            .map_err(|e| to_mcp_error("Failed to update activity", &e))?;
        text(&UpdateResult::new(activity))
    }

    #[tool(
        name = "delete_activity",
        description = "Permanently delete an activity together with its participants, preferences, plans and approvals. Requires confirmed=true; ask the user before confirming."
    )]
    async fn delete_activity(&self, Parameters(params): Parameters<DeleteActivity>) -> McpResult {
        debug!("delete_activity: {params:?}");
        let planner = self.planner.lock().await;
        let activity = planner
            .get_activity(&Id { id: params.id })
            .await
            .map_err(|e| to_mcp_error("Failed to get activity", &e))?;
        planner
            .delete_activity(&params)
            .await
            .map_err(|e| to_mcp_error("Failed to delete activity", &e))?;
        text(&DeleteResult::new(activity))
    }

    #[tool(
        name = "response_stats",
        description = "Show how many participants of an activity have started and completed the questionnaire."
    )]
    async fn response_stats(&self, Parameters(params): Parameters<ActivityId>) -> McpResult {
        debug!("response_stats: {params:?}");
        let stats = self
            .planner
            .lock()
            .await
            .response_stats(&params)
            .await
            .map_err(|e| to_mcp_error("Failed to get response statistics", &e))?;
        text(&stats)
    }

    #[tool(
        name = "add_participant",
        description = "Add a participant to an activity by phone_number, with optional name and email. A phone number already in the activity returns the existing participant."
    )]
    async fn add_participant(&self, Parameters(params): Parameters<AddParticipant>) -> McpResult {
        debug!("add_participant: {params:?}");
        let participant = self
            .planner
            .lock()
            .await
            .add_participant(&params)
            .await
            .map_err(|e| to_mcp_error("Failed to add participant", &e))?;
        text(&CreateResult::new(participant))
    }

    #[tool(
        name = "update_participant",
        description = "Update a participant's name, email or allow_group_text consent. Omitted fields are left unchanged."
    )]
    async fn update_participant(
        &self,
        Parameters(params): Parameters<UpdateParticipant>,
    ) -> McpResult {
        debug!("update_participant: {params:?}");
        let participant = self
            .planner
            .lock()
            .await
            .update_participant(&params)
            .await
            .map_err(|e| to_mcp_error("Failed to update participant", &e))?;
        text(&UpdateResult::new(participant))
    }

    #[tool(
        name = "show_participant",
        description = "Show a participant with contact details and questionnaire status."
    )]
    async fn show_participant(&self, Parameters(params): Parameters<Id>) -> McpResult {
        debug!("show_participant: {params:?}");
        let participant = self
            .planner
            .lock()
            .await
            .get_participant(&params)
            .await
            .map_err(|e| to_mcp_error("Failed to get participant", &e))?;
        text(&participant)
    }

    #[tool(
        name = "next_questions",
        description = "Get the next batch of questions a participant has not answered yet, one category at a time. Each question lists its ID, prompt and allowed options."
    )]
    async fn next_questions(&self, Parameters(params): Parameters<Id>) -> McpResult {
        debug!("next_questions: {params:?}");
        let batch = self
            .planner
            .lock()
            .await
            .next_questions(&params)
            .await
            .map_err(|e| to_mcp_error("Failed to get questions", &e))?;
        match batch {
            Some(batch) => text(&batch),
            None => text(&OperationStatus::success(format!(
                "Participant {} has answered every question",
                params.id
            ))),
        }
    }

    #[tool(
        name = "submit_answers",
        description = "Submit questionnaire answers for a participant. Keys are question IDs from next_questions; use a list of strings for multi-choice questions. Returns the next batch of questions, if any."
    )]
    async fn submit_answers(&self, Parameters(params): Parameters<SubmitAnswers>) -> McpResult {
        debug!("submit_answers: {params:?}");
        let submission = self
            .planner
            .lock()
            .await
            .submit_answers(&params)
            .await
            .map_err(|e| to_mcp_error("Failed to submit answers", &e))?;
        text(&submission)
    }

    #[tool(
        name = "reset_participant",
        description = "Discard all of a participant's answers so the questionnaire starts over."
    )]
    async fn reset_participant(&self, Parameters(params): Parameters<Id>) -> McpResult {
        debug!("reset_participant: {params:?}");
        let participant = self
            .planner
            .lock()
            .await
            .reset_participant(&params)
            .await
            .map_err(|e| to_mcp_error("Failed to reset participant", &e))?;
        text(&UpdateResult::with_changes(
            participant,
            vec!["Answers discarded".to_string()],
        ))
    }

    #[tool(
        name = "save_preference",
        description = "Store one preference value under category and key, e.g. category 'activity', key 'budget_range'. Omit participant_id for an activity-wide preference. A later value replaces an earlier one."
    )]
    async fn save_preference(&self, Parameters(params): Parameters<SavePreference>) -> McpResult {
        debug!("save_preference: {params:?}");
        self.planner
            .lock()
            .await
            .save_preference(&params)
            .await
            .map_err(|e| to_mcp_error("Failed to save preference", &e))?;
        text(&OperationStatus::success(format!(
            "Saved {}.{}",
            params.category, params.key
        )))
    }

    #[tool(
        name = "show_preferences",
        description = "Show every preference recorded for an activity, grouped by participant."
    )]
    async fn show_preferences(&self, Parameters(params): Parameters<ActivityId>) -> McpResult {
        debug!("show_preferences: {params:?}");
        let set = self
            .planner
            .lock()
            .await
            .get_all_preferences(&params)
            .await
            .map_err(|e| to_mcp_error("Failed to get preferences", &e))?;
        text(&set)
    }

    #[tool(
        name = "show_participant_preferences",
        description = "Show the preferences recorded for one participant."
    )]
    async fn show_participant_preferences(&self, Parameters(params): Parameters<Id>) -> McpResult {
        debug!("show_participant_preferences: {params:?}");
        let categories = self
            .planner
            .lock()
            .await
            .get_participant_preferences(&params)
            .await
            .map_err(|e| to_mcp_error("Failed to get preferences", &e))?;
        text(&Preferences(categories))
    }

    #[tool(
        name = "process_conversation_input",
        description = "Extract planning details (group size, budget, activity type, timing, location, exertion) from a free-text message and store them. The full message is kept as a special request."
    )]
    async fn process_conversation_input(
        &self,
        Parameters(params): Parameters<ConversationInput>,
    ) -> McpResult {
        debug!("process_conversation_input: {params:?}");
        let extracted = self
            .planner
            .lock()
            .await
            .process_conversation_input(&params)
            .await
            .map_err(|e| to_mcp_error("Failed to process message", &e))?;
        text(&extracted)
    }

    #[tool(
        name = "generate_plan",
        description = "Generate a plan for an activity from its participants' preferences: a title, a description and a timed schedule. The plan is stored as a draft and the activity becomes 'planned'."
    )]
    async fn generate_plan(&self, Parameters(params): Parameters<ActivityId>) -> McpResult {
        debug!("generate_plan: {params:?}");
        let plan = self
            .planner
            .lock()
            .await
            .generate_plan(&params)
            .await
            .map_err(|e| to_mcp_error("Failed to generate plan", &e))?;
        text(&CreateResult::new(plan))
    }

    #[tool(
        name = "show_plan",
        description = "Show a plan with its description, schedule, status and approvals."
    )]
    async fn show_plan(&self, Parameters(params): Parameters<Id>) -> McpResult {
        debug!("show_plan: {params:?}");
        let plan = self
            .planner
            .lock()
            .await
            .get_plan(&params)
            .await
            .map_err(|e| to_mcp_error("Failed to get plan", &e))?;
        text(&plan)
    }

    #[tool(
        name = "current_plan",
        description = "Show the most recent plan of an activity, including revisions."
    )]
    async fn current_plan(&self, Parameters(params): Parameters<ActivityId>) -> McpResult {
        debug!("current_plan: {params:?}");
        let plan = self
            .planner
            .lock()
            .await
            .current_plan(&params)
            .await
            .map_err(|e| to_mcp_error("Failed to get current plan", &e))?;
        match plan {
            Some(plan) => text(&plan),
            None => text(&OperationStatus::failure(format!(
                "Activity {} has no plan yet. Use 'generate_plan' first.",
                params.activity_id
            ))),
        }
    }

    #[tool(
        name = "list_plans",
        description = "List every plan of an activity, newest first, including revised versions."
    )]
    async fn list_plans(&self, Parameters(params): Parameters<ActivityId>) -> McpResult {
        debug!("list_plans: {params:?}");
        let plans = self
            .planner
            .lock()
            .await
            .list_plans(&params)
            .await
            .map_err(|e| to_mcp_error("Failed to list plans", &e))?;
        text(&Plans(plans))
    }

    #[tool(
        name = "revise_plan",
        description = "Revise a plan with feedback. The original plan is kept and the revision is stored as a new plan with status 'revised'. Pass participant_id when the feedback comes from a participant."
    )]
    async fn revise_plan(&self, Parameters(params): Parameters<RevisePlan>) -> McpResult {
        debug!("revise_plan: {params:?}");
        let plan = self
            .planner
            .lock()
            .await
            .revise_plan(&params)
            .await
            .map_err(|e| to_mcp_error("Failed to revise plan", &e))?;
        text(&CreateResult::new(plan))
    }

    #[tool(
        name = "request_approval",
        description = "Send a plan out for approval. Participants can then approve or decline it with record_approval."
    )]
    async fn request_approval(&self, Parameters(params): Parameters<Id>) -> McpResult {
        debug!("request_approval: {params:?}");
        let plan = self
            .planner
            .lock()
            .await
            .request_approval(&params)
            .await
            .map_err(|e| to_mcp_error("Failed to request approval", &e))?;
        text(&UpdateResult::with_changes(
            plan,
            vec!["Sent out for approval".to_string()],
        ))
    }

    #[tool(
        name = "record_approval",
        description = "Record whether a participant approves a plan awaiting approval, with optional feedback. A second verdict from the same participant replaces the first."
    )]
    async fn record_approval(&self, Parameters(params): Parameters<RecordApproval>) -> McpResult {
        debug!("record_approval: {params:?}");
        let approval = self
            .planner
            .lock()
            .await
            .record_approval(&params)
            .await
            .map_err(|e| to_mcp_error("Failed to record approval", &e))?;
        let verdict = if approval.approved { "approval" } else { "decline" };
        text(&OperationStatus::success(format!(
            "Recorded {verdict} of plan {} by participant {}",
            approval.plan_id, approval.participant_id
        )))
    }

    #[tool(
        name = "finalize_plan",
        description = "Finalize a plan. The plan becomes 'final' and its activity 'finalized'."
    )]
    async fn finalize_plan(&self, Parameters(params): Parameters<Id>) -> McpResult {
        debug!("finalize_plan: {params:?}");
        let plan = self
            .planner
            .lock()
            .await
            .finalize_plan(&params)
            .await
            .map_err(|e| to_mcp_error("Failed to finalize plan", &e))?;
        text(&UpdateResult::with_changes(
            plan,
            vec!["Plan finalized".to_string()],
        ))
    }
}

#[tool_handler(router = self.tool_router)]
impl ServerHandler for RallyMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .enable_prompts()
                .build(),
            server_info: Implementation {
                name: "rally".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            instructions: Some(r#"Rally plans group activities from the preferences of the people taking part.

## Core Concepts
- **Activity**: the outing being planned, with optional start time and address
- **Participant**: someone taking part, identified by phone number within the activity
- **Preferences**: questionnaire answers and free-text details, stored per participant
- **Plan**: a title, description and timed schedule generated from the combined preferences

## Workflow
1. `create_activity`, then `add_participant` for everyone involved
2. Collect answers with `next_questions` and `submit_answers`; pass free text to `process_conversation_input`
3. Track progress with `response_stats`
4. `generate_plan`, then `revise_plan` with feedback as often as needed
5. `request_approval`, `record_approval` for each participant, and `finalize_plan`

## Tool Categories
- **Activities**: create_activity, list_activities, show_activity, update_activity, delete_activity, response_stats
- **Participants**: add_participant, update_participant, show_participant, next_questions, submit_answers, reset_participant
- **Preferences**: save_preference, show_preferences, show_participant_preferences, process_conversation_input
- **Plans**: generate_plan, show_plan, current_plan, list_plans, revise_plan, request_approval, record_approval, finalize_plan"#.to_string()),
        }
    }

    async fn list_prompts(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListPromptsResult, McpError> {
        debug!("list_prompts");

        let prompts = PROMPT_TEMPLATES
            .iter()
            .map(|template| {
                Prompt::new(
                    template.name,
                    Some(template.description),
                    Some(
                        template
                            .arguments
                            .iter()
                            .map(|arg| PromptArgument {
                                name: arg.name.to_string(),
                                description: Some(arg.description.to_string()),
                                required: Some(arg.required),
                            })
                            .collect(),
                    ),
                )
            })
            .collect();

        Ok(ListPromptsResult {
            next_cursor: None,
            prompts,
        })
    }

    async fn get_prompt(
        &self,
        request: GetPromptRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<GetPromptResult, McpError> {
        debug!("get_prompt: {}", request.name);

        let template = PROMPT_TEMPLATES
            .iter()
            .find(|t| t.name == request.name)
            .ok_or_else(|| McpError::invalid_params("Prompt not found", None))?;

        let arguments = request.arguments.as_ref();
        let prompt_text = template
            .apply(|name| arguments.and_then(|args| args.get(name)).and_then(Value::as_str))
            .map_err(|missing| {
                McpError::invalid_params(
                    format!("Required argument '{missing}' is missing or not a string"),
                    None,
                )
            })?;

        Ok(GetPromptResult {
            description: Some(template.description.to_string()),
            messages: vec![PromptMessage {
                role: PromptMessageRole::User,
                content: PromptMessageContent::text(prompt_text),
            }],
        })
    }
}

/// Run the MCP server with stdio transport until the client disconnects or
/// the process receives SIGINT/SIGTERM.
pub async fn run_stdio_server(server: RallyMcpServer) -> Result<()> {
    use rmcp::{transport::stdio, ServiceExt};

    info!("Starting Rally MCP server on stdio");
    debug!(
        "Server created with {} tools",
        server.tool_router.list_all().len()
    );

    let service = server.serve(stdio()).await.inspect_err(|e| {
        error!("serving error: {e:?}");
    })?;

    let mut sigint = signal(SignalKind::interrupt())?;
    let mut sigterm = signal(SignalKind::terminate())?;

    tokio::select! {
        result = service.waiting() => {
            match result {
                Ok(_) => info!("MCP server stopped normally"),
                Err(e) => error!("MCP server error: {e:?}"),
            }
        }
        _ = sigint.recv() => {
            info!("Received SIGINT, shutting down");
        }
        _ = sigterm.recv() => {
            info!("Received SIGTERM, shutting down");
        }
    }

    info!("MCP server shutdown complete");
    Ok(())
}

#[cfg(test)]
mod tests {
    use rally_core::PlannerBuilder;
    use tempfile::TempDir;

    use super::*;

    async fn create_server() -> (TempDir, RallyMcpServer) {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let planner = PlannerBuilder::new()
            .with_database_path(Some(temp_dir.path().join("mcp.db")))
            .build()
            .await
            .expect("Failed to build planner");
        (temp_dir, RallyMcpServer::new(planner))
    }

    fn output(result: &CallToolResult) -> String {
        result
            .content
            .iter()
            .filter_map(|c| c.as_text().map(|t| t.text.clone()))
            .collect()
    }

    #[tokio::test]
    async fn test_server_info() {
        let (_temp_dir, server) = create_server().await;
        let info = server.get_info();
        assert_eq!(info.server_info.name, "rally");
        assert!(info.capabilities.tools.is_some());
        assert!(info.capabilities.prompts.is_some());
    }

    #[tokio::test]
    async fn test_every_planner_operation_is_a_tool() {
        let (_temp_dir, server) = create_server().await;
        let names: Vec<String> = server
            .tool_router
            .list_all()
            .into_iter()
            .map(|tool| tool.name.to_string())
            .collect();
        for expected in [
            "create_activity",
            "delete_activity",
            "submit_answers",
            "process_conversation_input",
            "generate_plan",
            "revise_plan",
            "record_approval",
            "finalize_plan",
        ] {
            assert!(names.iter().any(|n| n == expected), "missing tool {expected}");
        }
    }

    #[tokio::test]
    async fn test_tools_drive_a_plan() {
        let (_temp_dir, server) = create_server().await;

        let created = server
            .create_activity(Parameters(CreateActivity {
                title: Some("Board games".to_string()),
                ..Default::default()
            }))
            .await
            .expect("create_activity failed");
        assert!(output(&created).contains("Created activity with ID: 1"));

        server
            .add_participant(Parameters(AddParticipant {
                activity_id: 1,
                phone_number: "555-0100".to_string(),
                ..Default::default()
            }))
            .await
            .expect("add_participant failed");

        let plan = server
            .generate_plan(Parameters(ActivityId { activity_id: 1 }))
            .await
            .expect("generate_plan failed");
        assert!(output(&plan).contains("Created plan with ID: 1"));

        let current = server
            .current_plan(Parameters(ActivityId { activity_id: 1 }))
            .await
            .expect("current_plan failed");
        assert!(output(&current).contains("# 1."));
    }

    #[tokio::test]
    async fn test_missing_resources_are_errors() {
        let (_temp_dir, server) = create_server().await;

        let result = server.show_plan(Parameters(Id { id: 42 })).await;
        let error = result.expect_err("missing plan should fail");
        assert!(error.message.starts_with("Failed to get plan"));

        server
            .create_activity(Parameters(CreateActivity::default()))
            .await
            .expect("create_activity failed");
        let current = server
            .current_plan(Parameters(ActivityId { activity_id: 1 }))
            .await
            .expect("an activity without plans is not an error");
        assert!(output(&current).contains("has no plan yet"));
    }
}
