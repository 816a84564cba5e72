use std::time::Duration;

use thiserror::Error;

/// Failure of a remote classification/recommendation call.
///
/// Never retried inside the core; callers decide per material.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    #[error("service call timed out after {0:?}")]
    Timeout(Duration),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("authentication rejected: {0}")]
    Auth(String),

    #[error("quota or rate limit exceeded: {0}")]
    Quota(String),

    #[error("service returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed response: {0}")]
    MalformedResponse(String),

    #[error("service returned an empty response")]
    EmptyResponse,
}

impl ServiceError {
    /// Map a non-success HTTP status to an error kind.
    pub fn from_status(status: u16, body: impl Into<String>) -> Self {
        let body = body.into();
        match status {
            401 | 403 => Self::Auth(body),
            429 => Self::Quota(body),
            _ => Self::Status { status, body },
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping() {
        assert!(matches!(ServiceError::from_status(401, "no"), ServiceError::Auth(_)));
        assert!(matches!(ServiceError::from_status(403, "no"), ServiceError::Auth(_)));
        assert!(matches!(ServiceError::from_status(429, "slow down"), ServiceError::Quota(_)));
        assert_eq!(
            ServiceError::from_status(503, "busy"),
            ServiceError::Status {
                status: 503,
                body: "busy".to_string()
            }
        );
    }

    #[test]
    fn only_timeout_reports_timeout() {
        assert!(ServiceError::Timeout(std::time::Duration::from_secs(1)).is_timeout());
        assert!(!ServiceError::Transport("reset".into()).is_timeout());
    }
}
