//! Oqool Commands: the developer command API behind the key authority
//!
//! Requests are validated structurally, turned into [`Command`]s carrying a
//! derived [`SecurityLevel`], and executed against a [`FileSandbox`].
//! Shell execution and git operations are refused unconditionally.
//!
//! # Example
//!
//! ```
//! use oqool_commands::{validate_command, Command, SecurityLevel};
//! use serde_json::json;
//!
//! let payload = json!({ "path": "src/app/page.tsx" });
//! let valid = validate_command(Some("delete_file"), Some(&payload)).unwrap();
//! let command = Command::new(valid.kind, valid.payload, None);
//! assert_eq!(command.security_level, SecurityLevel::Dangerous);
//! assert!(command.requires_approval);
//! ```

pub mod command;
pub mod executor;
pub mod fileops;
pub mod parser;
pub mod security;
pub mod validate;

pub use command::{
    Command, CommandResult, CommandStatus, CommandType, FileKind, ProjectFile, SecurityLevel,
};
pub use executor::{CommandExecutor, EXEC_NOT_ALLOWED, GIT_NOT_IMPLEMENTED};
pub use fileops::FileSandbox;
pub use parser::{describe, format_execution_time, parse_command, ParsedCommand};
pub use security::{analyze_risk, is_command_safe, RiskReport};
pub use validate::{validate_command, ValidCommand};
