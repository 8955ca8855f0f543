//! Shared error type across fizzbuzz crates.

use thiserror::Error;

/// Client-facing error codes (stable API).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientCode {
    /// Invalid or missing request parameters.
    BadRequest,
    /// Requested data does not exist (yet).
    NotFound,
    /// Request did not complete in time.
    Timeout,
    /// Internal server error.
    Internal,
}

impl ClientCode {
    /// String representation used in logs and metrics labels.
    pub fn as_str(self) -> &'static str {
        match self {
            ClientCode::BadRequest => "BAD_REQUEST",
            ClientCode::NotFound => "NOT_FOUND",
            ClientCode::Timeout => "TIMEOUT",
            ClientCode::Internal => "INTERNAL",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, FizzBuzzError>;

/// Unified error type used by core and gateway.
///
/// The `Display` output of the validation variants is the exact message
/// returned to HTTP clients.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FizzBuzzError {
    #[error("missing required parameters: divisorA, divisorB, limit, labelA, labelB")]
    MissingParameters,
    #[error("{0} cannot be empty")]
    EmptyLabel(&'static str),
    #[error("{0} must be a valid integer")]
    NotAnInteger(&'static str),
    #[error("{0} must be greater than 0")]
    NotPositive(&'static str),
    #[error("{field} must be less than or equal to {max}")]
    TooLarge { field: &'static str, max: i64 },
    #[error("no statistics available")]
    NoStatistics,
    #[error("request timed out")]
    Timeout,
    #[error("invalid config: {0}")]
    Config(String),
    #[error("internal: {0}")]
    Internal(String),
}

impl FizzBuzzError {
    /// Map internal error to a stable client-facing code.
    pub fn client_code(&self) -> ClientCode {
        match self {
            FizzBuzzError::MissingParameters
            | FizzBuzzError::EmptyLabel(_)
            | FizzBuzzError::NotAnInteger(_)
            | FizzBuzzError::NotPositive(_)
            | FizzBuzzError::TooLarge { .. } => ClientCode::BadRequest,
            FizzBuzzError::NoStatistics => ClientCode::NotFound,
            FizzBuzzError::Timeout => ClientCode::Timeout,
            FizzBuzzError::Config(_) | FizzBuzzError::Internal(_) => ClientCode::Internal,
        }
    }

    /// Whether the message is safe to show to a client verbatim.
    pub fn is_client_visible(&self) -> bool {
        self.client_code() != ClientCode::Internal
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_messages_are_verbatim() {
        assert_eq!(
            FizzBuzzError::MissingParameters.to_string(),
            "missing required parameters: divisorA, divisorB, limit, labelA, labelB"
        );
        assert_eq!(FizzBuzzError::EmptyLabel("labelA").to_string(), "labelA cannot be empty");
        assert_eq!(
            FizzBuzzError::NotAnInteger("divisorB").to_string(),
            "divisorB must be a valid integer"
        );
        assert_eq!(FizzBuzzError::NotPositive("limit").to_string(), "limit must be greater than 0");
        assert_eq!(
            FizzBuzzError::TooLarge { field: "limit", max: 100 }.to_string(),
            "limit must be less than or equal to 100"
        );
    }

    #[test]
    fn internal_errors_are_not_client_visible() {
        assert!(!FizzBuzzError::Internal("boom".into()).is_client_visible());
        assert!(!FizzBuzzError::Config("bad".into()).is_client_visible());
        assert!(FizzBuzzError::NoStatistics.is_client_visible());
        assert_eq!(FizzBuzzError::NoStatistics.client_code().as_str(), "NOT_FOUND");
    }
}
