use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failure taxonomy for one submission attempt. Every variant terminates
/// the attempt; none of them is retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("no valid input: every submitted entry was blank")]
    NoValidInput,
    #[error("batch of {count} items exceeds the configured maximum of {max}")]
    BatchTooLarge { count: usize, max: usize },
    #[error("cannot blind an empty batch")]
    EmptyBatch,
    #[error("blinding failed: {0}")]
    Blinding(String),
    #[error("transport failure: {0}")]
    Transport(String),
    #[error("server rejected evaluation (status {status}): {message}")]
    Server { status: u16, message: String },
    #[error("malformed evaluation response: {0}")]
    MalformedResponse(String),
    #[error("finalize produced {actual} outputs for {expected} blinded inputs")]
    ProtocolInvariantViolation { expected: usize, actual: usize },
    #[error("a submission is already in progress")]
    SessionBusy,
    #[error("attempt superseded by session reset")]
    AttemptSuperseded,
}

impl SessionError {
    /// Defect-class failures point at a broken or tampering collaborator
    /// rather than an ordinary operational condition, and are logged at a
    /// higher severity.
    pub fn is_defect(&self) -> bool {
        matches!(
            self,
            Self::MalformedResponse(_) | Self::ProtocolInvariantViolation { .. }
        )
    }
}

/// Structured body the evaluation endpoint may return on a non-2xx status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_error_renders_status_and_message() {
        let err = SessionError::Server {
            status: 500,
            message: "overloaded".into(),
        };
        assert_eq!(
            err.to_string(),
            "server rejected evaluation (status 500): overloaded"
        );
    }

    #[test]
    fn only_protocol_failures_are_defects() {
        assert!(SessionError::MalformedResponse("short read".into()).is_defect());
        assert!(SessionError::ProtocolInvariantViolation {
            expected: 2,
            actual: 1
        }
        .is_defect());
        assert!(!SessionError::NoValidInput.is_defect());
        assert!(!SessionError::Transport("connection refused".into()).is_defect());
    }

    #[test]
    fn error_body_parses_optional_message() {
        let body: ErrorBody = serde_json::from_str(r#"{"message":"overloaded"}"#).unwrap();
        assert_eq!(body.message.as_deref(), Some("overloaded"));

        let body: ErrorBody = serde_json::from_str(r#"{}"#).unwrap();
        assert!(body.message.is_none());
    }
}
