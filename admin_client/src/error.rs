use thiserror::Error;

/// Shown whenever the backend gives us nothing better to display.
pub const GENERIC_ERROR: &str = "Something went wrong. Please try again.";

#[derive(Debug, Clone, Error, PartialEq)]
pub enum AdminError {
    /// Transport failure or non-2xx response, collapsed to one display string.
    #[error("{message}")]
    Request { status: Option<u16>, message: String },

    #[error("unexpected response from {endpoint}: {reason}")]
    Decode { endpoint: String, reason: String },

    #[error("{0}")]
    Validation(String),

    #[error("not signed in")]
    Unauthenticated,

    #[error("session storage error: {0}")]
    Storage(String),

    #[error("configuration error: {0}")]
    Config(String),
}

impl AdminError {
    pub fn request(status: Option<u16>, message: impl Into<String>) -> Self {
        AdminError::Request {
            status,
            message: message.into(),
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            AdminError::Request { status, .. } => *status,
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, AdminError::Unauthenticated) || self.status() == Some(401)
    }
}

impl From<reqwest::Error> for AdminError {
    fn from(err: reqwest::Error) -> Self {
        tracing::error!("HTTP request error: {:?}", err);
        AdminError::Request {
            status: err.status().map(|s| s.as_u16()),
            message: GENERIC_ERROR.to_string(),
        }
    }
}

impl From<url::ParseError> for AdminError {
    fn from(err: url::ParseError) -> Self {
        AdminError::Config(err.to_string())
    }
}

impl From<std::io::Error> for AdminError {
    fn from(err: std::io::Error) -> Self {
        AdminError::Storage(err.to_string())
    }
}

pub type AdminResult<T> = Result<T, AdminError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_error_displays_only_the_message() {
        let err = AdminError::request(Some(404), "Patient not found");
        assert_eq!(err.to_string(), "Patient not found");
        assert_eq!(err.status(), Some(404));
        assert!(!err.is_unauthorized());
    }

    #[test]
    fn unauthorized_covers_401_and_missing_session() {
        assert!(AdminError::request(Some(401), "Token expired").is_unauthorized());
        assert!(AdminError::Unauthenticated.is_unauthorized());
        assert!(!AdminError::Validation("Email is required".into()).is_unauthorized());
    }
}
