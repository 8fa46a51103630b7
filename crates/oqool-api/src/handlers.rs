//! API Handlers
use crate::error::ApiError;
use crate::state::AppState;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use chrono::{Duration, Utc};
use oqool_classify::route;
use oqool_commands::{validate_command, Command, CommandType};
use oqool_core::{ApiResponse, OqoolError, RequestContext, OQOOL_VERSION};
use oqool_keys::{KeyVerification, MANAGE_KEYS_PERMISSION};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

/// Header carrying the caller's key (or the admin secret) on administration endpoints.
pub const API_KEY_HEADER: &str = "x-api-key";

const INVALID_KEY: &str = "Invalid or expired API key";

type ApiResult = Result<(StatusCode, Json<ApiResponse>), ApiError>;

fn ok(data: Value) -> ApiResult {
    Ok((StatusCode::OK, Json(ApiResponse::ok(data))))
}

#[derive(Debug, Deserialize)]
pub struct GenerateKeyRequest {
    pub name: Option<String>,
    pub permissions: Option<Vec<String>>,
    pub expires_in_secs: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub struct VerifyKeyRequest {
    pub api_key: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CommandRequest {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub payload: Option<Value>,
    pub project_id: Option<String>,
    pub api_key: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ClassifyRequest {
    pub message: Option<String>,
    pub query: Option<String>,
}

pub async fn generate_key(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Json<GenerateKeyRequest>, JsonRejection>,
) -> ApiResult {
    let Json(req) = body?;
    let permissions = req
        .permissions
        .unwrap_or_else(|| state.config.default_permissions.clone());

    // Only an existing manager may mint another one.
    if permissions.iter().any(|p| p == MANAGE_KEYS_PERMISSION) {
        authorize_manager(&state, &headers)?;
    }

    let expires_at = match req.expires_in_secs {
        Some(secs) => Some(
            i64::try_from(secs)
                .ok()
                .and_then(Duration::try_seconds)
                .and_then(|ttl| Utc::now().checked_add_signed(ttl))
                .ok_or_else(|| ApiError::BadRequest("expires_in_secs is out of range".to_string()))?,
        ),
        None => None,
    };

    let issued = state.keys.generate_with_expiry(
        req.name.as_deref().unwrap_or_default(),
        permissions,
        expires_at,
    )?;

    Ok((
        StatusCode::CREATED,
        Json(
            ApiResponse::ok(json!({ "id": issued.id, "key": issued.key }))
                .with_message("API key generated successfully. Save it securely!"),
        ),
    ))
}

pub async fn verify_key(
    State(state): State<AppState>,
    body: Result<Json<VerifyKeyRequest>, JsonRejection>,
) -> ApiResult {
    let Json(req) = body?;
    let api_key = req
        .api_key
        .filter(|k| !k.is_empty())
        .ok_or_else(|| ApiError::BadRequest("API key is required".to_string()))?;

    let verification = verify(&state, &api_key);
    if !verification.valid {
        return Err(ApiError::Unauthorized(INVALID_KEY.to_string()));
    }

    Ok((
        StatusCode::OK,
        Json(
            ApiResponse::ok(json!({
                "valid": true,
                "key_id": verification.key_id,
                "permissions": verification.permissions,
            }))
            .with_message("API key is valid"),
        ),
    ))
}

pub async fn execute_command(
    State(state): State<AppState>,
    body: Result<Json<CommandRequest>, JsonRejection>,
) -> ApiResult {
    let ctx = RequestContext::new();
    let Json(req) = body?;

    let api_key = req
        .api_key
        .filter(|k| !k.is_empty())
        .ok_or_else(|| OqoolError::Auth("API key is required".to_string()))?;
    let verification = verify(&state, &api_key);
    let Some(key_id) = verification.key_id.filter(|_| verification.valid) else {
        return Err(OqoolError::Auth(INVALID_KEY.to_string()).into());
    };

    // A known type the key may not run is refused before payload checks.
    // Shell and git requests always reach the executor, which refuses them.
    let kind = req.kind.as_deref().and_then(|k| k.trim().parse::<CommandType>().ok());
    if let Some(kind) = kind.filter(|k| !k.is_always_refused()) {
        require_permission(&verification, kind.as_str())?;
    }

    let valid = validate_command(req.kind.as_deref(), req.payload.as_ref())
        .map_err(OqoolError::Validation)?;

    let command = Command::new(valid.kind, valid.payload, req.project_id);
    let ctx = ctx.with_key(key_id.to_string());
    let result = state.executor.execute(&command, &ctx).await;

    let status = if result.is_success() { "success" } else { "failed" };
    state
        .metrics
        .commands
        .with_label_values(&[command.kind.as_str(), status])
        .inc();

    let message = if result.is_success() {
        "Command executed successfully"
    } else {
        "Command failed"
    };
    let success = result.is_success();
    let data = serde_json::to_value(&result).map_err(|e| ApiError::Internal(e.to_string()))?;

    Ok((
        StatusCode::OK,
        Json(ApiResponse::outcome(success, data).with_message(message)),
    ))
}

pub async fn classify(
    State(state): State<AppState>,
    body: Result<Json<ClassifyRequest>, JsonRejection>,
) -> ApiResult {
    let Json(req) = body?;
    // Blank text is still a message; a blank `message` defers to `query`.
    let message = match (req.message, req.query) {
        (Some(message), Some(query)) if message.trim().is_empty() => query,
        (Some(message), _) => message,
        (None, Some(query)) => query,
        (None, None) => return Err(ApiError::BadRequest("Message is required".to_string())),
    };

    let classification = state.classifier.log_classification(&message);
    let route = route(&message, &classification);
    state
        .metrics
        .classifications
        .with_label_values(&[classification.kind.as_str()])
        .inc();

    ok(json!({ "classification": classification, "route": route }))
}

pub async fn list_keys(State(state): State<AppState>, headers: HeaderMap) -> ApiResult {
    authorize_manager(&state, &headers)?;
    ok(json!({ "keys": state.keys.list_keys() }))
}

pub async fn revoke_key(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> ApiResult {
    authorize_manager(&state, &headers)?;
    let id = Uuid::parse_str(&id).map_err(|_| ApiError::BadRequest("Invalid key id".to_string()))?;

    let revoked = state.keys.revoke(&id);
    tracing::info!(key_id = %id, revoked, "revoke requested");
    ok(json!({ "revoked": revoked }))
}

pub async fn cleanup_keys(State(state): State<AppState>, headers: HeaderMap) -> ApiResult {
    authorize_manager(&state, &headers)?;
    let removed = state.keys.cleanup_expired_keys();
    ok(json!({ "removed": removed }))
}

pub async fn health(State(state): State<AppState>) -> ApiResult {
    ok(json!({
        "status": "ok",
        "version": OQOOL_VERSION,
        "classifier_mode": state.classifier.mode(),
    }))
}

pub async fn metrics(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let body = state
        .metrics
        .encode()
        .map_err(|e| ApiError::Internal(e.to_string()))?;
    Ok((
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        body,
    ))
}

fn verify(state: &AppState, api_key: &str) -> KeyVerification {
    let verification = state.keys.verify(api_key);
    state.metrics.record_verification(verification.valid);
    verification
}

fn require_permission(verification: &KeyVerification, permission: &str) -> Result<(), ApiError> {
    if verification.allows(permission) {
        Ok(())
    } else {
        Err(ApiError::Forbidden(format!("Permission denied: {}", permission)))
    }
}

fn authorize_manager(state: &AppState, headers: &HeaderMap) -> Result<(), ApiError> {
    let api_key = headers
        .get(API_KEY_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|k| !k.is_empty())
        .ok_or_else(|| ApiError::Unauthorized("API key is required".to_string()))?;

    if state.is_admin_secret(api_key) {
        return Ok(());
    }

    let verification = verify(state, api_key);
    if !verification.valid {
        return Err(ApiError::Unauthorized(INVALID_KEY.to_string()));
    }
    require_permission(&verification, MANAGE_KEYS_PERMISSION)
}
