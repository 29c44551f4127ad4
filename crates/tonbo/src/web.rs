//! Web fallback implementation
//!
//! Satisfies the contract's type signature on hosts without native camera
//! access and fails loudly instead of pretending to record. There is no
//! session on this host: no operation allocates resources or transitions
//! state, and `state` reports [`SessionState::Idle`] forever. `echo` is the
//! one operation that genuinely executes.

use crate::capture::{Recording, SessionState, VideoCapture};
use crate::config::CaptureConfig;
use crate::error::CaptureError;
use tracing::{debug, warn};

/// Fallback implementation for hosts without camera capability.
#[derive(Debug, Default)]
pub struct WebCapture;

impl WebCapture {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait::async_trait]
impl VideoCapture for WebCapture {
    async fn start(&self, _config: CaptureConfig) -> Result<(), CaptureError> {
        warn!("start rejected: video capture is not supported on this host");
        Err(CaptureError::Unsupported)
    }

    async fn stop(&self) -> Result<Recording, CaptureError> {
        Err(CaptureError::Unsupported)
    }

    async fn record(&self, _config: CaptureConfig) -> Result<Recording, CaptureError> {
        warn!("record rejected: video capture is not supported on this host");
        Err(CaptureError::Unsupported)
    }

    async fn pause(&self) -> Result<(), CaptureError> {
        Err(CaptureError::Unsupported)
    }

    async fn resume(&self) -> Result<(), CaptureError> {
        Err(CaptureError::Unsupported)
    }

    async fn state(&self) -> SessionState {
        SessionState::Idle
    }

    async fn echo(&self, value: String) -> String {
        debug!("echo: {}", value);
        value
    }
}
