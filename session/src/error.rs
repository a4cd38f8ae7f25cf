use shared::server_error_message;

/// Anything that can go wrong talking to a backend.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ClientError {
    #[error("Network error: {0}")]
    Transport(String),
    #[error("Server error: {status} - {body}")]
    Status { status: u16, body: String },
    /// A 2xx body that does not have the expected shape.
    #[error("Failed to parse response: {0}")]
    Decode(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The request never got an HTTP answer.
    Transport,
    /// The backend answered, but not with what we asked for.
    Application,
}

impl ClientError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ClientError::Transport(_) => ErrorKind::Transport,
            _ => ErrorKind::Application,
        }
    }

    /// Human-readable reason, with the backend's `error` member unwrapped when there is one.
    pub fn reason(&self) -> String {
        match self {
            ClientError::Status { status, body } => {
                format!("{} (status {})", server_error_message(body), status)
            }
            other => other.to_string(),
        }
    }
}
