//! The capture session contract
//!
//! Every host implementation (native recorder, web fallback) provides these
//! operations. All of them are single-shot asynchronous completions: each
//! call resolves exactly once, with a value or a [`CaptureError`], never
//! both and never zero times.

use crate::config::CaptureConfig;
use crate::error::CaptureError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Session lifecycle state.
///
/// At most one session exists per implementation instance. `Completed` and
/// `Failed` are rest states; the next `start` leaves them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionState {
    /// No session
    Idle,
    /// Capture in progress
    Recording,
    /// Capture in progress but paused
    Paused,
    /// The last session finished and produced a [`Recording`]
    Completed,
    /// The last session ended in a host failure
    Failed,
}

/// A finished recording.
///
/// Serialized in camelCase for the application layer. `video_path` is an
/// absolute path in whatever convention the host OS uses; the contract
/// treats it as opaque.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recording {
    /// Absolute local path of the recorded video
    pub video_path: PathBuf,
    /// Realized duration in seconds
    pub duration_secs: f64,
    /// Realized frame width in pixels
    pub width: u32,
    /// Realized frame height in pixels
    pub height: u32,
    /// Realized frame rate
    pub frame_rate: u32,
    /// Artifact size in bytes
    pub size_bytes: u64,
}

/// The capture contract.
///
/// Two lifecycles are supported:
///
/// - paired: [`start`](VideoCapture::start) then [`stop`](VideoCapture::stop),
///   with the result returned by `stop`
/// - single-call: [`record`](VideoCapture::record), which starts and resolves
///   once the host tears the session down on its own (duration or size cap
///   reached, or the host UI ends it)
///
/// There is no cancellation primitive: a started capture ends through `stop`
/// or host-side termination, both of which resolve the pending completion.
#[async_trait::async_trait]
pub trait VideoCapture: Send + Sync {
    /// Begin a recording session.
    ///
    /// Fails with [`CaptureError::AlreadyRecording`] if a session is active,
    /// including while a previous `start` is still opening the camera.
    async fn start(&self, config: CaptureConfig) -> Result<(), CaptureError>;

    /// Stop the active session and finalize the artifact.
    ///
    /// Valid only while recording or paused; [`CaptureError::NotRecording`]
    /// otherwise.
    async fn stop(&self) -> Result<Recording, CaptureError>;

    /// Single-call capture: start, then resolve when the host ends the
    /// session. The returned path exists by the time this resolves.
    async fn record(&self, config: CaptureConfig) -> Result<Recording, CaptureError>;

    /// Pause the active session without ending it.
    async fn pause(&self) -> Result<(), CaptureError>;

    /// Resume a paused session.
    async fn resume(&self) -> Result<(), CaptureError>;

    /// Current session state.
    async fn state(&self) -> SessionState;

    /// Diagnostic round-trip through the dispatch layer. Returns the input
    /// unchanged on every host, including ones without camera access.
    async fn echo(&self, value: String) -> String;
}
