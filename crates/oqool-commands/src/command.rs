//! Command and result types for the developer command API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::str::FromStr;
use uuid::Uuid;

/// Operations a caller can request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommandType {
    ReadFile,
    WriteFile,
    DeleteFile,
    ListFiles,
    CreateDirectory,
    GitStatus,
    GitCommit,
    GitPush,
    GitPull,
    /// Arbitrary shell execution; always refused
    ExecuteCommand,
}

impl CommandType {
    pub const ALL: [CommandType; 10] = [
        CommandType::ReadFile,
        CommandType::WriteFile,
        CommandType::DeleteFile,
        CommandType::ListFiles,
        CommandType::CreateDirectory,
        CommandType::GitStatus,
        CommandType::GitCommit,
        CommandType::GitPush,
        CommandType::GitPull,
        CommandType::ExecuteCommand,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CommandType::ReadFile => "read_file",
            CommandType::WriteFile => "write_file",
            CommandType::DeleteFile => "delete_file",
            CommandType::ListFiles => "list_files",
            CommandType::CreateDirectory => "create_directory",
            CommandType::GitStatus => "git_status",
            CommandType::GitCommit => "git_commit",
            CommandType::GitPush => "git_push",
            CommandType::GitPull => "git_pull",
            CommandType::ExecuteCommand => "execute_command",
        }
    }

    /// Reads are safe, writes and creates moderate, deletes, push/pull and
    /// shell execution dangerous.
    pub fn security_level(&self) -> SecurityLevel {
        match self {
            CommandType::ReadFile | CommandType::ListFiles | CommandType::GitStatus => {
                SecurityLevel::Safe
            }
            CommandType::WriteFile | CommandType::CreateDirectory | CommandType::GitCommit => {
                SecurityLevel::Moderate
            }
            CommandType::DeleteFile
            | CommandType::GitPush
            | CommandType::GitPull
            | CommandType::ExecuteCommand => SecurityLevel::Dangerous,
        }
    }

    /// Payload fields that must be present as strings.
    pub fn required_fields(&self) -> &'static [&'static str] {
        match self {
            CommandType::ReadFile | CommandType::DeleteFile | CommandType::CreateDirectory => {
                &["path"]
            }
            CommandType::WriteFile => &["path", "content"],
            CommandType::GitCommit => &["message"],
            _ => &[],
        }
    }

    pub fn is_git(&self) -> bool {
        matches!(
            self,
            CommandType::GitStatus | CommandType::GitCommit | CommandType::GitPush | CommandType::GitPull
        )
    }

    /// Types the executor refuses whoever asks: shell execution and git.
    pub fn is_always_refused(&self) -> bool {
        self.is_git() || *self == CommandType::ExecuteCommand
    }
}

impl std::fmt::Display for CommandType {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CommandType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CommandType::ALL
            .iter()
            .copied()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| format!("Unknown command type: {}", s))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SecurityLevel {
    /// Read-only
    Safe,
    /// Writes files or directories
    Moderate,
    /// Deletes, touches remotes, or runs processes
    Dangerous,
}

impl SecurityLevel {
    pub fn requires_approval(&self) -> bool {
        matches!(self, SecurityLevel::Dangerous)
    }
}

impl std::fmt::Display for SecurityLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            SecurityLevel::Safe => write!(f, "SAFE"),
            SecurityLevel::Moderate => write!(f, "MODERATE"),
            SecurityLevel::Dangerous => write!(f, "DANGEROUS"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Command {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub kind: CommandType,
    pub payload: Map<String, Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub security_level: SecurityLevel,
    pub requires_approval: bool,
}

impl Command {
    pub fn new(kind: CommandType, payload: Map<String, Value>, project_id: Option<String>) -> Self {
        let security_level = kind.security_level();
        Self {
            id: Uuid::new_v4(),
            kind,
            payload,
            project_id,
            created_at: Utc::now(),
            security_level,
            requires_approval: security_level.requires_approval(),
        }
    }

    /// String payload field, if present.
    pub fn str_field(&self, name: &str) -> Option<&str> {
        self.payload.get(name).and_then(Value::as_str)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommandStatus {
    Pending,
    Executing,
    Success,
    Failed,
    Cancelled,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandResult {
    pub command_id: Uuid,
    pub status: CommandStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub executed_at: DateTime<Utc>,
    pub execution_time_ms: u64,
}

impl CommandResult {
    pub fn success(command_id: Uuid, output: Value, execution_time_ms: u64) -> Self {
        Self {
            command_id,
            status: CommandStatus::Success,
            output: Some(output),
            error: None,
            executed_at: Utc::now(),
            execution_time_ms,
        }
    }

    pub fn failure(command_id: Uuid, error: impl Into<String>, execution_time_ms: u64) -> Self {
        Self {
            command_id,
            status: CommandStatus::Failed,
            output: None,
            error: Some(error.into()),
            executed_at: Utc::now(),
            execution_time_ms,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == CommandStatus::Success
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileKind {
    File,
    Directory,
}

/// One entry of a directory listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectFile {
    /// Path relative to the sandbox root
    pub path: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: FileKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_security_levels() {
        assert_eq!(CommandType::ReadFile.security_level(), SecurityLevel::Safe);
        assert_eq!(CommandType::ListFiles.security_level(), SecurityLevel::Safe);
        assert_eq!(CommandType::WriteFile.security_level(), SecurityLevel::Moderate);
        assert_eq!(CommandType::CreateDirectory.security_level(), SecurityLevel::Moderate);
        assert_eq!(CommandType::DeleteFile.security_level(), SecurityLevel::Dangerous);
        assert_eq!(CommandType::GitPush.security_level(), SecurityLevel::Dangerous);
        assert_eq!(CommandType::ExecuteCommand.security_level(), SecurityLevel::Dangerous);
    }

    #[test]
    fn test_always_refused_types() {
        let refused: Vec<_> = CommandType::ALL.iter().filter(|k| k.is_always_refused()).collect();
        assert_eq!(refused.len(), 5);
        assert!(!CommandType::ReadFile.is_always_refused());
        assert!(CommandType::ExecuteCommand.is_always_refused());
    }

    #[test]
    fn test_parse_round_trips_every_type() {
        for kind in CommandType::ALL {
            assert_eq!(kind.as_str().parse::<CommandType>(), Ok(kind));
            // serde and as_str agree
            assert_eq!(serde_json::to_value(kind).unwrap(), kind.as_str());
        }
        assert_eq!(
            "rm_rf".parse::<CommandType>(),
            Err("Unknown command type: rm_rf".to_string())
        );
    }

    #[test]
    fn test_new_command_derives_approval() {
        let cmd = Command::new(CommandType::DeleteFile, Map::new(), None);
        assert_eq!(cmd.security_level, SecurityLevel::Dangerous);
        assert!(cmd.requires_approval);

        let cmd = Command::new(CommandType::WriteFile, Map::new(), Some("p1".into()));
        assert!(!cmd.requires_approval);
        assert_eq!(cmd.project_id.as_deref(), Some("p1"));
    }

    #[test]
    fn test_result_serialization() {
        let result = CommandResult::failure(Uuid::new_v4(), "boom", 3);
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["status"], "failed");
        assert_eq!(json["error"], "boom");
        assert!(json.get("output").is_none());
    }
}
