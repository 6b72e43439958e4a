use thiserror::Error;

pub type ClientResult<T> = Result<T, ClientError>;

#[derive(Debug, Error)]
pub enum ClientError {
    /// Non-2xx answer from the server.
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("failed to decode response: {0}")]
    Decode(String),

    #[error("invalid client configuration: {0}")]
    Config(String),
}

impl ClientError {
    /// Builds an `Api` error from a failed response body.
    ///
    /// Prefers the server's `message`, then its `error` field, then the raw text.
    pub(crate) fn from_response(status: u16, body: &str) -> Self {
        let message = match serde_json::from_str::<serde_json::Value>(body) {
            Ok(value) => value
                .get("message")
                .and_then(|m| m.as_str())
                .filter(|m| !m.is_empty())
                .or_else(|| value.get("error").and_then(|e| e.as_str()))
                .map(str::to_string)
                .unwrap_or_else(|| body.to_string()),
            Err(_) => body.to_string(),
        };
        let message = if message.is_empty() {
            format!("Request failed with status {status}")
        } else {
            message
        };
        ClientError::Api { status, message }
    }

    /// Human-readable message suitable for display.
    pub fn message(&self) -> String {
        match self {
            ClientError::Api { message, .. } => message.clone(),
            ClientError::Transport(e) => e.to_string(),
            ClientError::Decode(msg) | ClientError::Config(msg) => msg.clone(),
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            ClientError::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
