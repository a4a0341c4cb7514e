//! JSON command protocol for driving an annotation session from scripts.

use serde::{Deserialize, Serialize};
use shared::AnnotationId;

use crate::annotation::{CommitOutcome, IgnoreReason, PlacementOutcome};
use crate::harness::TestHarness;

/// A command sent as `{"command": "<name>", ...}`.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum AgentCommand {
    /// Double-click at a viewport pixel
    DoubleClick { x: f32, y: f32 },
    /// Commit text for the annotation being edited
    Confirm { text: String },
    /// Cancel the annotation being edited
    Cancel,
    /// Delete an annotation by id
    Delete { id: AnnotationId },
    /// List annotations in creation order
    List,
    /// Dispose every annotation and release the model
    Teardown,
}

/// Response from executing a command.
#[derive(Debug, Serialize, Deserialize)]
pub struct CommandResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl CommandResponse {
    fn ok_with_data(data: serde_json::Value) -> Self {
        Self {
            success: true,
            error: None,
            data: Some(data),
        }
    }

    fn err(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(msg.into()),
            data: None,
        }
    }
}

fn reason_name(reason: IgnoreReason) -> &'static str {
    match reason {
        IgnoreReason::PickMiss => "pick_miss",
        IgnoreReason::ModelNotReady => "model_not_ready",
        IgnoreReason::ConcurrentEdit => "concurrent_edit",
    }
}

/// Execute a single command on the harness.
pub fn execute_command(harness: &mut TestHarness, cmd: AgentCommand) -> CommandResponse {
    match cmd {
        AgentCommand::DoubleClick { x, y } => match harness.double_click(x, y) {
            PlacementOutcome::Placed { id, edit_anchor } => {
                CommandResponse::ok_with_data(serde_json::json!({
                    "placed": true,
                    "id": id,
                    "edit_anchor": edit_anchor.map(|p| [p.x, p.y]),
                }))
            }
            // Ignored placements are expected outcomes, not failures
            PlacementOutcome::Ignored(reason) => CommandResponse::ok_with_data(serde_json::json!({
                "placed": false,
                "reason": reason_name(reason),
            })),
        },

        AgentCommand::Confirm { text } => match harness.confirm(&text) {
            Some(CommitOutcome::Committed { id, text }) => {
                CommandResponse::ok_with_data(serde_json::json!({ "id": id, "text": text }))
            }
            Some(CommitOutcome::Deleted(id)) => {
                CommandResponse::ok_with_data(serde_json::json!({ "id": id, "deleted": true }))
            }
            Some(CommitOutcome::Ignored) | None => {
                CommandResponse::err("no annotation is being edited")
            }
        },

        AgentCommand::Cancel => {
            if harness.cancel() {
                CommandResponse::ok_with_data(serde_json::json!({ "cancelled": true }))
            } else {
                CommandResponse::err("no annotation is being edited")
            }
        }

        AgentCommand::Delete { id } => {
            let removed = harness.delete(id);
            CommandResponse::ok_with_data(serde_json::json!({ "removed": removed }))
        }

        AgentCommand::List => {
            let annotations = harness.list();
            CommandResponse::ok_with_data(serde_json::json!({
                "count": annotations.len(),
                "editing": harness.editing(),
                "annotations": annotations,
            }))
        }

        AgentCommand::Teardown => {
            let disposed = harness.teardown();
            CommandResponse::ok_with_data(serde_json::json!({ "disposed": disposed }))
        }
    }
}

/// Parse and execute a single JSON command string.
pub fn execute_json(harness: &mut TestHarness, json: &str) -> Result<CommandResponse, String> {
    let cmd: AgentCommand =
        serde_json::from_str(json).map_err(|e| format!("Invalid command JSON: {e}"))?;
    Ok(execute_command(harness, cmd))
}

/// Parse and execute multiple JSON commands (array).
pub fn execute_json_batch(
    harness: &mut TestHarness,
    json: &str,
) -> Result<Vec<CommandResponse>, String> {
    let cmds: Vec<AgentCommand> =
        serde_json::from_str(json).map_err(|e| format!("Invalid commands JSON: {e}"))?;
    Ok(cmds
        .into_iter()
        .map(|cmd| execute_command(harness, cmd))
        .collect())
}
