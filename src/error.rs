//! Error types
//!
//! - `ApiError`: HTTP and decoding failures from the REST API
//! - `TokenError`: bearer tokens whose claims cannot be read
//! - `ValidationError`: client-side form checks (Display is the inline message)

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Network(#[source] reqwest::Error),

    /// The `If-Match` version precondition failed (HTTP 409)
    #[error("Version conflict: {body}")]
    Conflict { body: String },

    #[error("Not authorized: {body}")]
    Unauthorized { body: String },

    #[error("Request failed with status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Failed to decode response: {0}")]
    Decode(String),
}

impl ApiError {
    /// Classify a non-success HTTP status
    pub fn from_status(status: u16, body: String) -> Self {
        match status {
            409 => ApiError::Conflict { body },
            401 => ApiError::Unauthorized { body },
            _ => ApiError::Status { status, body },
        }
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, ApiError::Conflict { .. })
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("token is not three dot-separated segments")]
    Malformed,

    #[error("token payload is not base64url: {0}")]
    Encoding(String),

    #[error("token claims are invalid: {0}")]
    Claims(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Project name is required")]
    ProjectNameRequired,

    #[error("Task title is required")]
    TaskTitleRequired,

    #[error("Email is required")]
    EmailRequired,

    #[error("Password is required")]
    PasswordRequired,

    #[error("Name is required")]
    NameRequired,

    #[error("Assignee must be a user id")]
    InvalidAssignee,

    #[error("Nothing to update")]
    NoChanges,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_classification() {
        assert!(ApiError::from_status(409, "stale".into()).is_conflict());
        assert!(matches!(ApiError::from_status(401, String::new()), ApiError::Unauthorized { .. }));
        assert!(matches!(ApiError::from_status(500, String::new()), ApiError::Status { status: 500, .. }));
        assert!(!ApiError::from_status(403, String::new()).is_conflict());
    }

    #[test]
    fn test_validation_messages() {
        assert_eq!(ValidationError::ProjectNameRequired.to_string(), "Project name is required");
        assert_eq!(ValidationError::TaskTitleRequired.to_string(), "Task title is required");
    }
}
