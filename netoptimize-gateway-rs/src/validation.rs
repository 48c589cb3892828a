//! Request validation for the gateway endpoints
//!
//! Bodies are checked structurally (required fields, JSON types) against a JSON schema
//! per endpoint before any handler runs, so a malformed request never reaches the model.
//! Values are not sanitized: prompts must carry caller text verbatim.

use axum::body::{to_bytes, Body};
use axum::extract::rejection::JsonRejection;
use axum::http::{header, HeaderMap, HeaderValue, Method, Request, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use jsonschema::{Draft, JSONSchema};
use serde_json::{json, Value};

/// Maximum accepted request body (1 MiB)
pub const MAX_PAYLOAD_SIZE: usize = 1024 * 1024;

pub const ANALYZE_POLICY_PATH: &str = "/analyze_policy/";
pub const OPTIMIZE_NETWORK_PATH: &str = "/optimize_network/";
pub const RESOURCE_ALLOCATION_PATH: &str = "/resource_allocation/";

fn compile(schema: Value) -> JSONSchema {
    JSONSchema::options()
        .with_draft(Draft::Draft7)
        .compile(&schema)
        .expect("Invalid schema")
}

lazy_static::lazy_static! {
    pub static ref POLICY_ANALYSIS_SCHEMA: JSONSchema = compile(json!({
        "type": "object",
        "required": ["country", "policy_text"],
        "properties": {
            "country": { "type": "string" },
            "policy_text": { "type": "string" }
        }
    }));

    pub static ref NETWORK_DESIGN_SCHEMA: JSONSchema = compile(json!({
        "type": "object",
        "required": ["region", "terrain_data", "existing_infrastructure", "budget"],
        "properties": {
            "region": { "type": "string" },
            "terrain_data": { "type": "string" },
            "existing_infrastructure": { "type": "array", "items": { "type": "string" } },
            "budget": { "type": "integer" }
        }
    }));

    pub static ref RESOURCE_OPTIMIZATION_SCHEMA: JSONSchema = compile(json!({
        "type": "object",
        "required": ["region", "existing_assets", "user_demand", "budget"],
        "properties": {
            "region": { "type": "string" },
            "existing_assets": { "type": "array", "items": { "type": "string" } },
            "user_demand": { "type": "string" },
            "budget": { "type": "integer" }
        }
    }));
}

/// Error body for rejected requests, one entry per problem found
#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct ValidationErrorResponse {
    pub detail: Vec<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum ApiValidationError {
    #[error("Invalid request format: {0}")]
    InvalidFormat(String),

    #[error("Content type must be {0}")]
    ContentType(String),

    #[error("Request payload too large: {0}")]
    PayloadTooLarge(String),

    #[error("Schema validation failed: {}", .0.join("; "))]
    Schema(Vec<String>),

    /// Body passed the schema but could not be deserialized into the request type
    #[error("{message}")]
    Rejected { status: StatusCode, message: String },
}

impl ApiValidationError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidFormat(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::ContentType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            Self::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            Self::Schema(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Rejected { status, .. } => *status,
        }
    }

    /// Convert to HTTP status code and error response
    pub fn to_response(&self) -> (StatusCode, Json<ValidationErrorResponse>) {
        let detail = match self {
            Self::Schema(errors) => errors.clone(),
            other => vec![other.to_string()],
        };

        (self.status_code(), Json(ValidationErrorResponse { detail }))
    }
}

impl IntoResponse for ApiValidationError {
    fn into_response(self) -> Response {
        self.to_response().into_response()
    }
}

impl From<JsonRejection> for ApiValidationError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Rejected {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

/// Schema for a POST endpoint, if the path has one
pub fn schema_for_path(path: &str) -> Option<&'static JSONSchema> {
    match path {
        ANALYZE_POLICY_PATH => Some(&*POLICY_ANALYSIS_SCHEMA),
        OPTIMIZE_NETWORK_PATH => Some(&*NETWORK_DESIGN_SCHEMA),
        RESOURCE_ALLOCATION_PATH => Some(&*RESOURCE_OPTIMIZATION_SCHEMA),
        _ => None,
    }
}

/// `application/json` or any `application/*+json`, parameters ignored
pub fn is_json_media_type(content_type: &str) -> bool {
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    match essence.strip_prefix("application/") {
        Some("json") => true,
        Some(subtype) => subtype.len() > "+json".len() && subtype.ends_with("+json"),
        None => false,
    }
}

/// Check the Content-Type header of a JSON endpoint
///
/// A missing header is accepted and the body is treated as JSON.
pub fn validate_content_type(headers: &HeaderMap) -> Result<(), ApiValidationError> {
    let content_type = match headers.get(header::CONTENT_TYPE) {
        Some(value) => value.to_str().unwrap_or_default(),
        None => return Ok(()),
    };

    if !is_json_media_type(content_type) {
        return Err(ApiValidationError::ContentType(format!(
            "application/json, got '{}'",
            content_type
        )));
    }

    Ok(())
}

/// Validate a parsed body against a compiled schema
pub fn validate_json_schema(schema: &JSONSchema, json: &Value) -> Result<(), ApiValidationError> {
    if let Err(errors) = schema.validate(json) {
        let details: Vec<String> = errors
            .map(|err| {
                let path = err.instance_path.to_string();
                if path.is_empty() {
                    err.to_string()
                } else {
                    format!("{}: {}", path, err)
                }
            })
            .collect();

        return Err(ApiValidationError::Schema(if details.is_empty() {
            vec!["Schema validation failed".to_string()]
        } else {
            details
        }));
    }

    Ok(())
}

/// Parse a raw body as JSON
pub fn parse_json_body(bytes: &[u8]) -> Result<Value, ApiValidationError> {
    let body_str = std::str::from_utf8(bytes).map_err(|_| {
        ApiValidationError::InvalidFormat("Request body is not valid UTF-8".to_string())
    })?;

    serde_json::from_str::<Value>(body_str.trim())
        .map_err(|e| ApiValidationError::InvalidFormat(format!("Invalid JSON: {}", e)))
}

/// Rejects POST bodies on the model-backed endpoints that are not structurally valid
pub async fn validate_request_middleware(
    req: Request<Body>,
    next: Next,
) -> Result<Response, ApiValidationError> {
    if req.method() != Method::POST {
        return Ok(next.run(req).await);
    }

    let schema = match schema_for_path(req.uri().path()) {
        Some(schema) => schema,
        None => return Ok(next.run(req).await),
    };

    validate_content_type(req.headers())?;

    let (mut parts, body) = req.into_parts();
    let body_bytes = to_bytes(body, MAX_PAYLOAD_SIZE).await.map_err(|e| {
        ApiValidationError::PayloadTooLarge(format!(
            "Failed to read request body within {} bytes: {}",
            MAX_PAYLOAD_SIZE, e
        ))
    })?;

    let json_value = parse_json_body(&body_bytes)?;
    if let Err(err) = validate_json_schema(schema, &json_value) {
        tracing::debug!(path = %parts.uri.path(), "Rejected request: {}", err);
        return Err(err);
    }

    // Downstream `Json` extractors require the header even when the caller omitted it.
    parts
        .headers
        .insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));

    let req = Request::from_parts(parts, Body::from(body_bytes));
    Ok(next.run(req).await)
}

/// Generate middleware config for payload limits
pub fn payload_limit_config() -> tower_http::limit::RequestBodyLimitLayer {
    tower_http::limit::RequestBodyLimitLayer::new(MAX_PAYLOAD_SIZE)
}
