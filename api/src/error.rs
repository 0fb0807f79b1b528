use serde_json::Value;
use std::fmt;

pub type ApiResult<T> = Result<T, ApiError>;

/// Everything that can go wrong between a command and the upstream API.
///
/// Transport failures never show up here directly: the client folds them
/// into an error envelope, so they arrive through [`ApiError::from_errors`]
/// like any other upstream complaint. Upstream variants keep the `errors`
/// payload exactly as it was received.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiError {
    Authentication { message: String, errors: Value },
    RateLimit { message: String, errors: Value },
    NotFound { message: String, errors: Value },
    Api { message: String, errors: Value },
    /// `results` claimed data but the envelope had no `response` key.
    Contract(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Authentication { message, .. } => write!(f, "Authentication error: {message}"),
            ApiError::RateLimit { message, .. } => write!(f, "Rate limit exceeded: {message}"),
            ApiError::NotFound { message, .. } => write!(f, "Resource not found: {message}"),
            ApiError::Api { message, .. } => write!(f, "API error: {message}"),
            ApiError::Contract(msg) => write!(f, "Malformed API response: {msg}"),
        }
    }
}

impl std::error::Error for ApiError {}

impl ApiError {
    /// Classify an upstream `errors` payload.
    ///
    /// Upstream has no structured error codes, so this sniffs the message
    /// text. Keep every heuristic in here so it can be swapped out in one
    /// place.
    pub fn from_errors(errors: &Value) -> Self {
        let message = errors_message(errors);
        let lower = message.to_lowercase();
        let errors = errors.clone();

        if lower.contains("token") || lower.contains("api key") || lower.contains("authentication") {
            ApiError::Authentication { message, errors }
        } else if lower.contains("rate limit") {
            ApiError::RateLimit { message, errors }
        } else if lower.contains("not found") {
            ApiError::NotFound { message, errors }
        } else {
            ApiError::Api { message, errors }
        }
    }

    /// Contract violations are bugs in our assumptions about the wire format
    /// and must reach the user even from inside an aggregation loop.
    pub fn is_fatal(&self) -> bool {
        matches!(self, ApiError::Contract(_))
    }

    /// The upstream `errors` payload, untouched. `None` for contract errors.
    pub fn errors(&self) -> Option<&Value> {
        match self {
            ApiError::Authentication { errors, .. }
            | ApiError::RateLimit { errors, .. }
            | ApiError::NotFound { errors, .. }
            | ApiError::Api { errors, .. } => Some(errors),
            ApiError::Contract(_) => None,
        }
    }
}

/// True when an `errors` field carries nothing: `null`, `{}`, `[]` or `""`.
pub fn errors_empty(errors: &Value) -> bool {
    match errors {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

/// Flatten the `errors` payload into one line. Objects come as
/// `{"token": "Error/Missing application key..."}`, arrays as plain strings.
fn errors_message(errors: &Value) -> String {
    match errors {
        Value::String(s) => s.clone(),
        Value::Object(map) => map
            .iter()
            .map(|(key, value)| match value {
                Value::String(s) if key == "message" => s.clone(),
                Value::String(s) => format!("{key}: {s}"),
                other => format!("{key}: {other}"),
            })
            .collect::<Vec<_>>()
            .join("; "),
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect::<Vec<_>>()
            .join("; "),
        other => other.to_string(),
    }
}
