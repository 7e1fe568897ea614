//! Client error types
//!
//! Every failure of an API call ends up as a [`ClientError`]. Two classes
//! matter to callers: transport failures (no response at all) and
//! application failures (the server answered with a non-success status).

use thiserror::Error;

/// Message shown when the backend cannot be reached.
pub const CONNECT_FAILED_MESSAGE: &str =
    "Cannot connect to server. Please make sure the backend is running.";

/// Fallback message when an error body is not valid JSON.
pub const REQUEST_FAILED_MESSAGE: &str = "Request failed";

/// Errors returned by [`ApiClient`](super::ApiClient) operations
#[derive(Error, Debug)]
pub enum ClientError {
    /// The request never produced a response (connection refused, DNS, TLS...)
    #[error("Transport error: {0}")]
    Transport(#[source] reqwest::Error),

    /// The server answered with a non-success status. `from_server` is false
    /// when `message` is a client-side fallback rather than the body's `error`.
    #[error("{message}")]
    Api {
        status: u16,
        message: String,
        from_server: bool,
    },

    /// A success response body could not be decoded
    #[error("Decode error: {0}")]
    Decode(String),

    /// A request body could not be serialized
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Reading a file for upload failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A caller-supplied header was not valid
    #[error("Invalid header: {0}")]
    InvalidHeader(String),
}

impl ClientError {
    /// True when no response was received from the server.
    pub fn is_transport(&self) -> bool {
        matches!(self, ClientError::Transport(_))
    }

    /// HTTP status of an application failure.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// The `error` text the server sent, if any.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ClientError::Api {
                message,
                from_server: true,
                ..
            } => Some(message),
            _ => None,
        }
    }

    /// Text suitable for showing to an end user.
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Transport(_) => CONNECT_FAILED_MESSAGE.to_string(),
            ClientError::Api { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}

/// Result alias for client operations
pub type ClientResult<T> = Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_displays_server_message() {
        let err = ClientError::Api {
            status: 400,
            message: "bad request".to_string(),
            from_server: true,
        };
        assert_eq!(err.to_string(), "bad request");
        assert_eq!(err.server_message(), Some("bad request"));
        assert_eq!(err.user_message(), "bad request");
        assert_eq!(err.status(), Some(400));
        assert!(!err.is_transport());
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing.pdf");
        let err: ClientError = io_err.into();
        assert!(matches!(err, ClientError::Io(_)));
        assert_eq!(err.status(), None);
    }
}
