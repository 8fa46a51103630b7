//! Shorthand command parsing and presentation helpers.

use crate::command::{Command, CommandType};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{json, Map, Value};

static COMMIT_MESSAGE: Lazy<Regex> = Lazy::new(|| Regex::new(r#"-m ["'](.+)["']"#).unwrap());

/// A command typed as shorthand (`read src/a.ts`, `ls`, `git status`, ...).
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedCommand {
    pub kind: CommandType,
    pub payload: Map<String, Value>,
}

impl ParsedCommand {
    fn new(kind: CommandType, payload: Value) -> Self {
        let payload = match payload {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        Self { kind, payload }
    }

    pub fn into_command(self, project_id: Option<String>) -> Command {
        Command::new(self.kind, self.payload, project_id)
    }
}

/// Parse shorthand. Returns `None` for anything unrecognised; shell
/// execution has no shorthand.
pub fn parse_command(input: &str) -> Option<ParsedCommand> {
    let trimmed = input.trim();
    let mut words = trimmed.split_whitespace();
    let verb = words.next()?;
    let arg = words.next();

    let parsed = match (verb, arg) {
        ("read" | "cat", Some(path)) => {
            ParsedCommand::new(CommandType::ReadFile, json!({ "path": path }))
        }
        ("write" | "create", Some(path)) => {
            ParsedCommand::new(CommandType::WriteFile, json!({ "path": path, "content": "" }))
        }
        ("delete" | "rm", Some(path)) => {
            ParsedCommand::new(CommandType::DeleteFile, json!({ "path": path }))
        }
        ("ls" | "list", path) => {
            ParsedCommand::new(CommandType::ListFiles, json!({ "path": path.unwrap_or(".") }))
        }
        ("mkdir", Some(path)) => {
            ParsedCommand::new(CommandType::CreateDirectory, json!({ "path": path }))
        }
        ("git", Some("status")) => ParsedCommand::new(CommandType::GitStatus, json!({})),
        ("git", Some("push")) => ParsedCommand::new(CommandType::GitPush, json!({})),
        ("git", Some("pull")) => ParsedCommand::new(CommandType::GitPull, json!({})),
        ("git", Some("commit")) => {
            let message = COMMIT_MESSAGE
                .captures(trimmed)
                .and_then(|c| c.get(1))
                .map(|m| m.as_str())
                .unwrap_or("");
            ParsedCommand::new(CommandType::GitCommit, json!({ "message": message }))
        }
        _ => return None,
    };

    Some(parsed)
}

/// One-line description of what a command will do.
pub fn describe(command: &Command) -> String {
    let path = command.str_field("path");
    match command.kind {
        CommandType::ReadFile => format!("Read file: {}", path.unwrap_or("?")),
        CommandType::WriteFile => format!("Write file: {}", path.unwrap_or("?")),
        CommandType::DeleteFile => format!("Delete file: {}", path.unwrap_or("?")),
        CommandType::ListFiles => format!("List files in: {}", path.unwrap_or(".")),
        CommandType::CreateDirectory => format!("Create directory: {}", path.unwrap_or("?")),
        CommandType::GitStatus => "Show git status".to_string(),
        CommandType::GitCommit => {
            format!("Commit changes: {}", command.str_field("message").unwrap_or(""))
        }
        CommandType::GitPush => "Push changes to the repository".to_string(),
        CommandType::GitPull => "Pull updates from the repository".to_string(),
        CommandType::ExecuteCommand => {
            format!("Execute: {}", command.str_field("command").unwrap_or("?"))
        }
    }
}

pub fn format_execution_time(ms: u64) -> String {
    if ms < 1000 {
        format!("{}ms", ms)
    } else {
        format!("{:.2}s", ms as f64 / 1000.0)
    }
}
