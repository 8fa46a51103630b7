//! Path, filename, content and shell safety checks.
//!
//! Every check answers `Err(reason)` with a short human-readable reason; the
//! reasons surface verbatim in validation errors and failed results.

use crate::command::{CommandType, SecurityLevel};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use serde_json::{Map, Value};

/// Path components that are never readable or writable.
const BLOCKED_COMPONENTS: &[&str] = &[
    "node_modules",
    ".git",
    ".next",
    "dist",
    "build",
    "package-lock.json",
    "yarn.lock",
];

/// Any component starting with this is an environment file.
const ENV_FILE_PREFIX: &str = ".env";

/// Extensions a write may produce.
pub const ALLOWED_EXTENSIONS: &[&str] = &[
    ".ts", ".tsx", ".js", ".jsx", ".json", ".md", ".txt", ".css", ".scss", ".sass", ".html",
    ".svg",
];

const BLOCKED_SHELL: &[&str] = &["rm -rf /", "rm -rf *", "dd", "mkfs", "format", ":(){ :|:& };:"];

/// Largest content a write accepts, in bytes.
pub const MAX_CONTENT_BYTES: usize = 1_000_000;

static SCRIPT_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?is)<script[^>]*>.*?</script>").unwrap());
static JS_URL: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)javascript:").unwrap());
static INLINE_HANDLER: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)on(error|click)=").unwrap());
static FILENAME_CHARS: Lazy<Regex> = Lazy::new(|| Regex::new(r#"[<>:"|?*]"#).unwrap());

pub fn check_path(path: &str) -> Result<(), String> {
    if path.trim().is_empty() {
        return Err("Path is empty".to_string());
    }
    if path.contains("..") {
        return Err("Path traversal detected".to_string());
    }
    if path.starts_with('/') || path.starts_with('\\') || path.get(1..2) == Some(":") {
        return Err("Absolute paths are not allowed".to_string());
    }

    for component in path.split(['/', '\\']) {
        if BLOCKED_COMPONENTS.contains(&component) || component.starts_with(ENV_FILE_PREFIX) {
            return Err(format!("Blocked pattern: {}", component));
        }
    }

    Ok(())
}

pub fn check_filename(filename: &str) -> Result<(), String> {
    let ext = filename.rfind('.').map(|i| &filename[i..]).unwrap_or("");
    if !ALLOWED_EXTENSIONS.contains(&ext) {
        let shown = if ext.is_empty() { "(none)" } else { ext };
        return Err(format!("File extension {} not allowed", shown));
    }
    if FILENAME_CHARS.is_match(filename) {
        return Err("Invalid characters in filename".to_string());
    }
    Ok(())
}

/// Strip script tags, `javascript:` URLs and inline click/error handlers.
pub fn sanitize_content(content: &str) -> String {
    let out = SCRIPT_TAG.replace_all(content, "");
    let out = JS_URL.replace_all(&out, "");
    INLINE_HANDLER.replace_all(&out, "").into_owned()
}

/// Screen a shell command line. Only used for reporting: shell execution is
/// refused regardless of the outcome.
pub fn check_shell_command(command: &str) -> Result<(), String> {
    let lower = command.to_lowercase();
    if let Some(blocked) = BLOCKED_SHELL.iter().find(|b| lower.contains(*b)) {
        return Err(format!("Blocked command: {}", blocked));
    }
    if command.contains(';') || command.contains("&&") || command.contains("||") {
        return Err("Command chaining detected".to_string());
    }
    Ok(())
}

pub fn is_command_safe(command: &str) -> bool {
    check_shell_command(command).is_ok()
}

#[derive(Debug, Clone, Serialize)]
pub struct RiskReport {
    pub level: SecurityLevel,
    pub warnings: Vec<String>,
}

impl RiskReport {
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }
}

/// Security level of the command plus warnings found in its payload.
pub fn analyze_risk(kind: CommandType, payload: &Map<String, Value>) -> RiskReport {
    let mut warnings = Vec::new();

    if let Some(path) = payload.get("path").and_then(Value::as_str) {
        if let Err(reason) = check_path(path) {
            warnings.push(reason);
        }
    }

    if let Some(content) = payload.get("content").and_then(Value::as_str) {
        if content.len() > MAX_CONTENT_BYTES {
            warnings.push("Content size exceeds 1MB".to_string());
        }
    }

    if kind == CommandType::ExecuteCommand {
        if let Some(command) = payload.get("command").and_then(Value::as_str) {
            if let Err(reason) = check_shell_command(command) {
                warnings.push(reason);
            }
        }
    }

    RiskReport {
        level: kind.security_level(),
        warnings,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_path_checks() {
        assert!(check_path("src/app/page.tsx").is_ok());
        assert!(check_path("docs/building.md").is_ok());
        assert!(check_path(".").is_ok());
        assert_eq!(check_path("../etc/passwd"), Err("Path traversal detected".to_string()));
        assert_eq!(check_path("/etc/passwd"), Err("Absolute paths are not allowed".to_string()));
        assert_eq!(check_path("C:\\Windows"), Err("Absolute paths are not allowed".to_string()));
        assert!(check_path("node_modules/react/index.js").is_err());
        assert!(check_path("app/.git/config").is_err());
        assert!(check_path(".env.local").is_err());
        assert!(check_path("dist/bundle.js").is_err());
        assert!(check_path("").is_err());
    }

    #[test]
    fn test_filename_checks() {
        assert!(check_filename("index.tsx").is_ok());
        assert!(check_filename("notes.md").is_ok());
        assert_eq!(check_filename("run.sh"), Err("File extension .sh not allowed".to_string()));
        assert_eq!(check_filename("Makefile"), Err("File extension (none) not allowed".to_string()));
        assert!(check_filename("a|b.txt").is_err());
    }

    #[test]
    fn test_sanitize_content() {
        let dirty = "<p>hi</p><script src=\"x\">\nalert(1)\n</script><a href=\"javascript:go()\" onclick=\"x\">";
        let clean = sanitize_content(dirty);
        assert!(!clean.contains("<script"));
        assert!(!clean.contains("javascript:"));
        assert!(!clean.contains("onclick="));
        assert!(clean.contains("<p>hi</p>"));
    }

    #[test]
    fn test_shell_checks() {
        assert!(check_shell_command("ls -la").is_ok());
        assert!(check_shell_command("rm -rf /").is_err());
        assert_eq!(check_shell_command("ls; whoami"), Err("Command chaining detected".to_string()));
        assert!(is_command_safe("npm run build"));
        assert!(!is_command_safe("npm test && rm -rf *"));
    }

    #[test]
    fn test_analyze_risk() {
        let payload = json!({ "path": "../secret.txt", "content": "x" });
        let report = analyze_risk(CommandType::WriteFile, payload.as_object().unwrap());
        assert_eq!(report.level, SecurityLevel::Moderate);
        assert_eq!(report.warnings, vec!["Path traversal detected".to_string()]);

        let big = "a".repeat(MAX_CONTENT_BYTES + 1);
        let payload = json!({ "path": "big.txt", "content": big });
        let report = analyze_risk(CommandType::WriteFile, payload.as_object().unwrap());
        assert_eq!(report.warnings, vec!["Content size exceeds 1MB".to_string()]);

        let payload = json!({ "path": "src/a.ts" });
        assert!(analyze_risk(CommandType::ReadFile, payload.as_object().unwrap()).is_clean());
    }
}
