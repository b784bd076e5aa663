//! Error types for the bookstore client.

use crate::gateway::envelope::ServiceError;

/// Status code of the one failure with special handling: sign-in required.
pub const UNAUTHORIZED: u16 = 401;

/// Code reported when the gateway could not be reached at all.
pub const SERVICE_UNAVAILABLE: u16 = 503;

/// Code reported when the gateway answered with something unreadable.
pub const INTERNAL_ERROR: u16 = 500;

/// Result type for gateway operations.
pub type Result<T> = std::result::Result<T, GatewayError>;

/// Errors that can end a gateway call.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// The gateway answered with an error envelope.
    #[error("{0}")]
    Service(ServiceError),

    /// The request never produced a response.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The gateway root cannot carry operation paths.
    #[error("invalid gateway url: {0}")]
    InvalidUrl(String),

    /// The request form could not be turned into envelope parameters.
    #[error("failed to encode {operation} request: {source}")]
    Encode {
        operation: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// The payload did not match the record expected for the operation.
    #[error("failed to decode {operation} payload: {source}")]
    Decode {
        operation: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// The envelope carried the wrong case (`result` where `items` was expected, or the reverse).
    #[error("{operation} answered without the expected {expected}")]
    UnexpectedShape {
        operation: &'static str,
        expected: &'static str,
    },
}

impl From<ServiceError> for GatewayError {
    fn from(error: ServiceError) -> Self {
        GatewayError::Service(error)
    }
}

impl GatewayError {
    /// Numeric code of the failure as the views report it.
    pub fn code(&self) -> u16 {
        match self {
            GatewayError::Service(e) => e.code,
            GatewayError::Transport(e) => e
                .status()
                .map(|s| s.as_u16())
                .unwrap_or(SERVICE_UNAVAILABLE),
            GatewayError::InvalidUrl(_)
            | GatewayError::Encode { .. }
            | GatewayError::Decode { .. }
            | GatewayError::UnexpectedShape { .. } => INTERNAL_ERROR,
        }
    }

    /// Message shown to the user; the service message verbatim when there is one.
    pub fn message(&self) -> String {
        match self {
            GatewayError::Service(e) => e.message.clone(),
            other => other.to_string(),
        }
    }

    /// True when the user has to sign in again before retrying.
    pub fn is_unauthorized(&self) -> bool {
        self.code() == UNAUTHORIZED
    }
}

/// Errors raised by the session gate.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("session closed before sign-in completed")]
    Closed,
}

/// Errors raised while loading configuration from the environment.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: {message}")]
    Invalid { key: &'static str, message: String },
}
