use thiserror::Error;

use crate::ids::InstanceId;

/// Failure reported by a host collaborator (sound engine or external music director).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AudioError {
    #[error("unknown sound instance {0:?}")]
    UnknownInstance(InstanceId),

    #[error("operation not supported by backend: {0}")]
    Unsupported(&'static str),

    #[error("backend unavailable: {0}")]
    Unavailable(String),

    #[error("{op} rejected: {reason}")]
    Rejected { op: &'static str, reason: String },
}

impl AudioError {
    #[inline]
    pub fn rejected(op: &'static str, reason: impl Into<String>) -> Self {
        Self::Rejected {
            op,
            reason: reason.into(),
        }
    }
}
