use reqwest::StatusCode;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ApiError>;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Missing identifier: {0} must not be empty")]
    MissingIdentifier(&'static str),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Failed to encode request body: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("Network error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Resource not found: {path}{}", detail_suffix(.detail))]
    NotFound {
        path: String,
        detail: Option<String>,
    },

    #[error("API error {status} from {path}{}", detail_suffix(.detail))]
    Api {
        status: StatusCode,
        path: String,
        detail: Option<String>,
    },

    #[error("Failed to decode response from {path}: {source}")]
    Decode {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid response from {path}: {message}")]
    InvalidResponse { path: String, message: String },
}

/// Maximum length for error response bodies in error messages
const MAX_ERROR_BODY_LENGTH: usize = 500;

fn detail_suffix(detail: &Option<String>) -> String {
    match detail {
        Some(d) => format!(": {}", d),
        None => String::new(),
    }
}

impl ApiError {
    /// Truncate a response body to avoid logging excessive data
    fn truncate_body(body: &str) -> String {
        if body.len() <= MAX_ERROR_BODY_LENGTH {
            return body.to_string();
        }
        let mut end = MAX_ERROR_BODY_LENGTH;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}... (truncated, {} total bytes)", &body[..end], body.len())
    }

    /// Pull a human readable message out of an error body.
    ///
    /// The broker answers with a few shapes: `{"error": "..."}`,
    /// `{"error": {"message": "..."}}`, problem+json `{"title", "detail"}`
    /// and validation failures `{"errors": {"field": ["..."]}}`. Anything
    /// else is returned as the raw body.
    fn extract_detail(body: &str) -> Option<String> {
        let body = body.trim();
        if body.is_empty() {
            return None;
        }

        let value = match serde_json::from_str::<serde_json::Value>(body) {
            Ok(value) => value,
            Err(_) => return Some(Self::truncate_body(body)),
        };

        let text = |key: &str| value.get(key).and_then(|v| v.as_str()).map(str::to_string);

        let detail = text("detail")
            .or_else(|| text("message"))
            .or_else(|| text("error"))
            .or_else(|| {
                value
                    .get("error")
                    .and_then(|e| e.get("message"))
                    .and_then(|m| m.as_str())
                    .map(str::to_string)
            })
            .or_else(|| value.get("errors").map(|e| e.to_string()))
            .or_else(|| text("title"))
            .unwrap_or_else(|| body.to_string());

        Some(Self::truncate_body(&detail))
    }

    pub fn from_status(status: StatusCode, path: &str, body: &str) -> Self {
        let detail = Self::extract_detail(body);
        match status {
            StatusCode::NOT_FOUND => ApiError::NotFound {
                path: path.to_string(),
                detail,
            },
            _ => ApiError::Api {
                status,
                path: path.to_string(),
                detail,
            },
        }
    }

    /// HTTP status of an API-level failure, if this error came from the server.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::NotFound { .. } => Some(StatusCode::NOT_FOUND),
            ApiError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::NotFound { .. })
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(StatusCode::UNAUTHORIZED)
    }

    /// Server-provided detail for API-level failures.
    pub fn detail(&self) -> Option<&str> {
        match self {
            ApiError::NotFound { detail, .. } | ApiError::Api { detail, .. } => detail.as_deref(),
            _ => None,
        }
    }
}
