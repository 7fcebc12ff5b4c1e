use thiserror::Error;

/// Common errors that can occur in chat-completion HTTP requests
#[derive(Error, Debug)]
pub enum CommonRequestError {
    /// HTTP request failed before a response was received
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Request body could not be serialized
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Server answered with a non-success status
    #[error("HTTP {status}: {message}")]
    HttpStatus { status: u16, message: String },

    /// Server answered 2xx with a body we could not decode
    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),

    /// A configured header name or value is not valid HTTP
    #[error("Invalid header `{name}`: {reason}")]
    InvalidHeader { name: String, reason: String },
}

/// Parse error response from HTTP status and body
pub fn parse_error_response(status: reqwest::StatusCode, body: &bytes::Bytes) -> CommonRequestError {
    let message = serde_json::from_slice::<serde_json::Value>(body)
        .ok()
        .and_then(|json| extract_error_message(&json))
        .unwrap_or_else(|| String::from_utf8_lossy(body).into_owned());

    CommonRequestError::HttpStatus {
        status: status.as_u16(),
        message,
    }
}

/// Extract error message from the JSON error shapes used by OpenAI-compatible services
fn extract_error_message(json: &serde_json::Value) -> Option<String> {
    // {"error": {"message": "..."}}
    if let Some(msg) = json
        .get("error")
        .and_then(|error| error.get("message"))
        .and_then(serde_json::Value::as_str)
    {
        return Some(msg.to_string());
    }

    // {"error": "..."}
    if let Some(msg) = json.get("error").and_then(serde_json::Value::as_str) {
        return Some(msg.to_string());
    }

    // Generic message field
    json.get("message")
        .and_then(serde_json::Value::as_str)
        .map(ToString::to_string)
}
