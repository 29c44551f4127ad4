//! Error taxonomy for the capture contract
//!
//! Three families: unsupported host, session-state misuse, and failures
//! reported by the host camera subsystem. Misuse errors are returned before
//! any host interaction; host failures arrive as the resolution of the
//! pending completion. Nothing here is retried automatically.

use thiserror::Error;

/// Failure reason reported by the host camera subsystem.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct HostFailure(pub String);

impl HostFailure {
    pub fn new(reason: impl Into<String>) -> Self {
        Self(reason.into())
    }
}

impl From<&str> for HostFailure {
    fn from(reason: &str) -> Self {
        Self(reason.to_string())
    }
}

/// Top-level contract error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CaptureError {
    /// Capture is not available on this host
    #[error("video capture is not supported on this host")]
    Unsupported,
    /// `start` while a session is already active
    #[error("a recording is already in progress")]
    AlreadyRecording,
    /// `stop`, `pause` or `resume` with no active session
    #[error("no recording in progress")]
    NotRecording,
    /// `pause` while already paused
    #[error("recording is already paused")]
    AlreadyPaused,
    /// `resume` while not paused
    #[error("recording is not paused")]
    NotPaused,
    /// The host camera subsystem failed (hardware busy, permission denied,
    /// storage full, ...)
    #[error("camera subsystem failure: {0}")]
    Host(#[from] HostFailure),
}

impl CaptureError {
    /// Whether this is a session state machine violation (a caller bug)
    /// rather than a host condition.
    pub fn is_misuse(&self) -> bool {
        matches!(
            self,
            CaptureError::AlreadyRecording
                | CaptureError::NotRecording
                | CaptureError::AlreadyPaused
                | CaptureError::NotPaused
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn misuse_classification() {
        assert!(CaptureError::AlreadyRecording.is_misuse());
        assert!(CaptureError::NotRecording.is_misuse());
        assert!(CaptureError::AlreadyPaused.is_misuse());
        assert!(CaptureError::NotPaused.is_misuse());
        assert!(!CaptureError::Unsupported.is_misuse());
        assert!(!CaptureError::Host(HostFailure::from("camera busy")).is_misuse());
    }

    #[test]
    fn host_failure_carries_the_reason() {
        let err = CaptureError::from(HostFailure::new("permission denied"));
        assert_eq!(
            err.to_string(),
            "camera subsystem failure: permission denied"
        );
    }
}
