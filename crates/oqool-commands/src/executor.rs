//! Command execution.
//!
//! The executor never returns an error: every failure, including policy
//! refusals, becomes a `Failed` [`CommandResult`] so callers can tell "your
//! command failed" apart from "the API is broken".

use crate::command::{Command, CommandResult, CommandType};
use crate::fileops::FileSandbox;
use crate::security::analyze_risk;
use oqool_core::{OqoolError, OqoolResult, RequestContext};
use serde_json::{json, Value};

pub const EXEC_NOT_ALLOWED: &str = "Command execution not allowed for security reasons";
pub const GIT_NOT_IMPLEMENTED: &str = "Git operations not implemented yet";

#[derive(Debug, Clone)]
pub struct CommandExecutor {
    sandbox: FileSandbox,
}

impl CommandExecutor {
    pub fn new(sandbox: FileSandbox) -> Self {
        Self { sandbox }
    }

    pub fn sandbox(&self) -> &FileSandbox {
        &self.sandbox
    }

    /// Run `command`; execution time is measured from when `ctx` was created.
    pub async fn execute(&self, command: &Command, ctx: &RequestContext) -> CommandResult {
        match self.dispatch(command).await {
            Ok(output) => {
                tracing::info!(
                    request_id = %ctx.request_id,
                    key_id = ctx.key_id.as_deref().unwrap_or("-"),
                    command_id = %command.id,
                    kind = %command.kind,
                    "command succeeded"
                );
                CommandResult::success(command.id, output, ctx.elapsed_ms())
            }
            Err(err) => {
                tracing::warn!(
                    request_id = %ctx.request_id,
                    key_id = ctx.key_id.as_deref().unwrap_or("-"),
                    command_id = %command.id,
                    kind = %command.kind,
                    error = %err,
                    "command failed"
                );
                CommandResult::failure(command.id, err.message(), ctx.elapsed_ms())
            }
        }
    }

    async fn dispatch(&self, command: &Command) -> OqoolResult<Value> {
        match command.kind {
            CommandType::ReadFile => {
                let content = self.sandbox.read_file(required(command, "path")?).await?;
                Ok(Value::String(content))
            }
            CommandType::WriteFile => {
                let path = required(command, "path")?;
                let sanitize = command
                    .payload
                    .get("sanitize")
                    .and_then(Value::as_bool)
                    .unwrap_or(true);
                self.sandbox
                    .write_file(path, required(command, "content")?, sanitize)
                    .await?;
                Ok(json!({ "success": true, "path": path }))
            }
            CommandType::DeleteFile => {
                let path = required(command, "path")?;
                self.sandbox.delete_file(path).await?;
                Ok(json!({ "success": true, "path": path }))
            }
            CommandType::ListFiles => {
                let path = command.str_field("path").unwrap_or(".");
                let files = self.sandbox.list_files(path).await?;
                serde_json::to_value(files).map_err(|e| OqoolError::Execution(e.to_string()))
            }
            CommandType::CreateDirectory => {
                let path = required(command, "path")?;
                self.sandbox.create_directory(path).await?;
                Ok(json!({ "success": true, "path": path }))
            }
            CommandType::GitStatus
            | CommandType::GitCommit
            | CommandType::GitPush
            | CommandType::GitPull => Err(OqoolError::Policy(GIT_NOT_IMPLEMENTED.to_string())),
            CommandType::ExecuteCommand => {
                let report = analyze_risk(command.kind, &command.payload);
                if !report.is_clean() {
                    tracing::warn!(warnings = ?report.warnings, "refused shell command carried risky payload");
                }
                Err(OqoolError::Policy(EXEC_NOT_ALLOWED.to_string()))
            }
        }
    }
}

fn required<'a>(command: &'a Command, field: &str) -> OqoolResult<&'a str> {
    command
        .str_field(field)
        .ok_or_else(|| OqoolError::Execution(format!("Missing required field: {}", field)))
}
