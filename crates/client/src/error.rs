//! Error types for talking to the schedule backend.

use models::{selector::SelectorError, timetable::GridError};
use thiserror::Error;

/// Errors that can occur while loading, editing or saving timetables.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ClientError {
    /// The request never produced a response
    #[error("Network error: {message}")]
    Network { message: String },

    /// The backend answered with a non-2xx status
    #[error("Request to {endpoint} failed with status {status}")]
    Status { endpoint: String, status: u16 },

    /// The response body did not have the expected shape
    #[error("Failed to decode response: {message}")]
    Decode { message: String },

    /// Environment configuration could not be read
    #[error("Invalid configuration: {message}")]
    Config { message: String },

    /// The backend has no schedule generator yet and returned nothing
    #[error("Automatic schedule generation is not available yet")]
    GenerationUnavailable,

    /// A personal timetable entry has no id to delete by
    #[error("Timetable entry has no id")]
    MissingEntryId,

    /// No period was opened for editing
    #[error("No period is being edited")]
    NoActiveEdit,

    #[error(transparent)]
    Grid(#[from] GridError),

    #[error(transparent)]
    Selector(#[from] SelectorError),
}

impl ClientError {
    /// Returns true if repeating the same user action may succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            ClientError::Network { .. } => true,
            ClientError::Status { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ClientError::Decode {
                message: err.to_string(),
            }
        } else {
            ClientError::Network {
                message: err.to_string(),
            }
        }
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::Decode {
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_errors() {
        assert!(
            ClientError::Network {
                message: "connection reset".to_string()
            }
            .is_retryable()
        );
        assert!(
            ClientError::Status {
                endpoint: "/teachers".to_string(),
                status: 503
            }
            .is_retryable()
        );
        assert!(
            !ClientError::Status {
                endpoint: "/teachers".to_string(),
                status: 401
            }
            .is_retryable()
        );
        assert!(!ClientError::GenerationUnavailable.is_retryable());
    }

    #[test]
    fn test_wrapped_model_errors() {
        let err = ClientError::from(GridError::BreakPeriod {
            semester: 0,
            period: 4,
        });
        assert_eq!(err.to_string(), "Period 4 is a break in semester 0");

        let err: ClientError = serde_json::from_str::<u32>("\"x\"").unwrap_err().into();
        assert!(matches!(err, ClientError::Decode { .. }));
    }
}
