//! Structural validation of incoming command requests.

use crate::command::CommandType;
use crate::security::analyze_risk;
use serde_json::{Map, Value};

/// A request that passed validation
#[derive(Debug, Clone)]
pub struct ValidCommand {
    pub kind: CommandType,
    pub payload: Map<String, Value>,
}

/// Validate the raw `type` and `payload` of a request.
///
/// Collects every problem rather than stopping at the first. Shell
/// execution payloads are not inspected; they pass validation and are
/// refused at execution.
pub fn validate_command(kind: Option<&str>, payload: Option<&Value>) -> Result<ValidCommand, Vec<String>> {
    let mut errors = Vec::new();

    let kind = match kind.map(str::trim) {
        None | Some("") => {
            errors.push("Command type is required".to_string());
            None
        }
        Some(raw) => match raw.parse::<CommandType>() {
            Ok(kind) => Some(kind),
            Err(e) => {
                errors.push(e);
                None
            }
        },
    };

    let payload = match payload {
        None | Some(Value::Null) => {
            errors.push("Command payload is required".to_string());
            None
        }
        Some(Value::Object(map)) => Some(map),
        Some(_) => {
            errors.push("Command payload must be an object".to_string());
            None
        }
    };

    let (Some(kind), Some(payload)) = (kind, payload) else {
        return Err(errors);
    };

    for field in kind.required_fields() {
        match payload.get(*field) {
            None | Some(Value::Null) => errors.push(format!("Missing required field: {}", field)),
            Some(Value::String(_)) => {}
            Some(_) => errors.push(format!("Field {} must be a string", field)),
        }
    }

    if kind == CommandType::ListFiles {
        if let Some(path) = payload.get("path") {
            if !path.is_string() && !path.is_null() {
                errors.push("Field path must be a string".to_string());
            }
        }
    }

    if kind != CommandType::ExecuteCommand {
        errors.extend(analyze_risk(kind, payload).warnings);
    }

    if errors.is_empty() {
        Ok(ValidCommand {
            kind,
            payload: payload.clone(),
        })
    } else {
        Err(errors)
    }
}
