use serde_json::Value;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Not logged in")]
    NotAuthenticated,

    #[error("Unauthorized - token may be invalid")]
    Unauthorized,

    #[error("Access denied: {0}")]
    AccessDenied(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("{0}")]
    Validation(String),

    #[error("Server error: {0}")]
    ServerError(String),

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Service log {0} is already approved")]
    AlreadyApproved(i64),

    #[error("Unknown user role")]
    UnknownRole,
}

/// Maximum length for error response bodies in error messages
const MAX_ERROR_BODY_LENGTH: usize = 500;

/// Fields checked first when picking the validation message to surface.
/// `detail` and `non_field_errors` are shown bare, the rest as `Field: message`.
const PRIORITY_FIELDS: [&str; 4] = ["detail", "non_field_errors", "username", "email"];

impl ApiError {
    /// Truncate a response body to avoid logging excessive data
    fn truncate_body(body: &str) -> String {
        if body.chars().count() <= MAX_ERROR_BODY_LENGTH {
            body.to_string()
        } else {
            let head: String = body.chars().take(MAX_ERROR_BODY_LENGTH).collect();
            format!("{}... (truncated, {} total bytes)", head, body.len())
        }
    }

    pub fn from_status(status: reqwest::StatusCode, body: &str) -> Self {
        let truncated = Self::truncate_body(body);
        match status.as_u16() {
            401 => ApiError::Unauthorized,
            403 => ApiError::AccessDenied(first_field_error(body).unwrap_or(truncated)),
            404 => ApiError::NotFound(truncated),
            400 | 422 => ApiError::Validation(first_field_error(body).unwrap_or(truncated)),
            500..=599 => ApiError::ServerError(truncated),
            _ => ApiError::InvalidResponse(format!("Status {}: {}", status, truncated)),
        }
    }

    /// Find the first `ApiError` anywhere in an error chain.
    pub fn find(err: &anyhow::Error) -> Option<&ApiError> {
        err.chain().find_map(|e| e.downcast_ref::<ApiError>())
    }

    /// True when the error means the user has to log in (again).
    pub fn requires_login(err: &anyhow::Error) -> bool {
        matches!(
            Self::find(err),
            Some(ApiError::NotAuthenticated) | Some(ApiError::Unauthorized)
        )
    }

    /// Build the message shown to the user for a failed operation.
    ///
    /// Errors the user can act on are surfaced specifically; everything else
    /// falls back to the screen's generic `fallback` text.
    pub fn user_message(err: &anyhow::Error, fallback: &str) -> String {
        if let Some(api_err) = Self::find(err) {
            return match api_err {
                ApiError::NotAuthenticated => "You must be logged in.".to_string(),
                ApiError::Unauthorized => "Unauthorized. Please log in again.".to_string(),
                ApiError::AccessDenied(detail) => format!(
                    "Access denied: {}. Please log in again.",
                    detail.trim_end_matches('.')
                ),
                ApiError::Validation(msg) => msg.clone(),
                ApiError::NetworkError(_) => network_message(),
                ApiError::AlreadyApproved(_) => "This service log is already approved.".to_string(),
                ApiError::UnknownRole => "Unknown user role".to_string(),
                ApiError::NotFound(_) | ApiError::ServerError(_) | ApiError::InvalidResponse(_) => {
                    fallback.to_string()
                }
            };
        }
        if err.chain().any(|e| e.downcast_ref::<reqwest::Error>().is_some()) {
            return network_message();
        }
        fallback.to_string()
    }

    /// Message for a failed program application. A 403 about the missing
    /// student profile gets a plain explanation.
    pub fn application_message(err: &anyhow::Error) -> String {
        if let Some(ApiError::AccessDenied(detail)) = Self::find(err) {
            if detail.contains("Student Profile") {
                return "Permission denied: your account is missing a student profile.".to_string();
            }
        }
        Self::user_message(err, "Failed to submit application. Please try again.")
    }
}

fn network_message() -> String {
    "Unable to connect to server. Check your connection.".to_string()
}

/// Extract the first recognised field error from a structured error body.
///
/// Accepts DRF-style bodies: `{"field": ["msg", ...]}`, `{"detail": "msg"}`
/// or a bare `["msg"]` list. Returns `None` for anything else.
pub fn first_field_error(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    match value {
        Value::Object(map) => {
            for field in PRIORITY_FIELDS {
                if let Some(msg) = map.get(field).and_then(first_message) {
                    return Some(labelled(field, msg));
                }
            }
            map.iter()
                .filter(|(field, _)| !PRIORITY_FIELDS.contains(&field.as_str()))
                .find_map(|(field, v)| first_message(v).map(|msg| labelled(field, msg)))
        }
        other => first_message(&other),
    }
}

fn first_message(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Array(items) => items.iter().find_map(first_message),
        _ => None,
    }
}

fn labelled(field: &str, msg: String) -> String {
    if field == "detail" || field == "non_field_errors" {
        return msg;
    }
    let spaced = field.replace('_', " ");
    let mut chars = spaced.chars();
    let label = match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => return msg,
    };
    format!("{}: {}", label, msg)
}
