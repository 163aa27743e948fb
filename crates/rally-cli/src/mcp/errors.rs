//! Error conversion for MCP tool results.

use rally_core::PlannerError;
use rmcp::ErrorData;

/// Wraps a planner error with the failing operation's context.
pub fn to_mcp_error(message: &str, error: &PlannerError) -> ErrorData {
    ErrorData::internal_error(format!("{message}: {error}"), None)
}
