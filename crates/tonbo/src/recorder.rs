//! Native capture implementation
//!
//! Drives a [`CameraHost`] while enforcing the session state machine: at
//! most one session per recorder, fail-fast misuse errors, and a completion
//! that resolves exactly once whether the session ends through
//! [`stop`](VideoCapture::stop) or the host tears it down on its own.

use crate::capture::{Recording, SessionState, VideoCapture};
use crate::config::CaptureConfig;
use crate::error::{CaptureError, HostFailure};
use crate::host::{Artifact, CameraHost, CaptureControl};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::{watch, Mutex};
use tracing::{debug, info, warn};

/// Outcome published by the supervisor once a session finalizes.
type Outcome = Option<Result<Recording, HostFailure>>;

/// An in-flight session.
struct Active {
    control: Box<dyn CaptureControl>,
    outcome: watch::Receiver<Outcome>,
    paused: bool,
    generation: u64,
}

/// Session phases. `Starting` reserves the slot while the host is opening
/// the camera; `Stopping` parks it while teardown is in flight.
enum Phase {
    Idle,
    Starting,
    Recording(Active),
    Stopping { generation: u64 },
    Completed,
    Failed,
}

/// Native implementation of the capture contract, delegating the pipeline
/// to a [`CameraHost`].
///
/// The camera hardware handle lives inside the host session; the recorder
/// only holds the control surface and the completion for the one active
/// session.
pub struct Recorder {
    host: Arc<dyn CameraHost>,
    phase: Arc<Mutex<Phase>>,
    generation: AtomicU64,
}

impl Recorder {
    pub fn new(host: Arc<dyn CameraHost>) -> Self {
        Self {
            host,
            phase: Arc::new(Mutex::new(Phase::Idle)),
            generation: AtomicU64::new(0),
        }
    }

    /// Reserve the session slot, failing fast while any session is active -
    /// including one whose `start` is still opening the camera.
    async fn reserve(&self) -> Result<u64, CaptureError> {
        let mut phase = self.phase.lock().await;
        match *phase {
            Phase::Idle | Phase::Completed | Phase::Failed => {
                *phase = Phase::Starting;
                Ok(self.generation.fetch_add(1, Ordering::SeqCst) + 1)
            }
            Phase::Starting | Phase::Recording(_) | Phase::Stopping { .. } => {
                Err(CaptureError::AlreadyRecording)
            }
        }
    }

    /// Begin a session and return a receiver for its outcome.
    async fn start_session(
        &self,
        config: CaptureConfig,
    ) -> Result<watch::Receiver<Outcome>, CaptureError> {
        let generation = self.reserve().await?;
        info!(
            "starting capture session {} ({} @ {}fps)",
            generation, config.quality, config.frame_rate
        );

        let (control, completion) = match self.host.begin(&config).await {
            Ok(pair) => pair,
            Err(reason) => {
                warn!("camera host failed to begin capture: {}", reason);
                *self.phase.lock().await = Phase::Failed;
                return Err(CaptureError::Host(reason));
            }
        };

        let (outcome_tx, outcome_rx) = watch::channel(None);
        {
            let mut phase = self.phase.lock().await;
            // `start` is the only writer between `Starting` and here.
            *phase = Phase::Recording(Active {
                control,
                outcome: outcome_rx.clone(),
                paused: false,
                generation,
            });
        }

        // The supervisor owns the host completion: it finalizes the phase
        // and publishes the outcome exactly once, whether the session ends
        // through `stop` or the host tears it down on its own.
        let slot = Arc::clone(&self.phase);
        tokio::spawn(async move {
            let result = match completion.await {
                Ok(Ok(artifact)) => Ok(finalize(artifact)),
                Ok(Err(reason)) => Err(reason),
                Err(_) => Err(HostFailure::from(
                    "camera host dropped the capture completion",
                )),
            };

            let mut phase = slot.lock().await;
            let owner = match &*phase {
                Phase::Recording(active) => Some(active.generation),
                Phase::Stopping { generation, .. } => Some(*generation),
                _ => None,
            };
            if owner == Some(generation) {
                match &result {
                    Ok(recording) => {
                        info!(
                            "capture session {} completed: {}",
                            generation,
                            recording.video_path.display()
                        );
                        *phase = Phase::Completed;
                    }
                    Err(reason) => {
                        warn!("capture session {} failed: {}", generation, reason);
                        *phase = Phase::Failed;
                    }
                }
            } else {
                // A newer session owns the slot; leave its state alone.
                debug!("capture session {} finalized after being superseded", generation);
            }
            drop(phase);

            let _ = outcome_tx.send(Some(result));
        });

        Ok(outcome_rx)
    }
}

/// Map a host artifact to the caller-facing result.
fn finalize(artifact: Artifact) -> Recording {
    Recording {
        video_path: artifact.path,
        duration_secs: artifact.duration.as_secs_f64(),
        width: artifact.width,
        height: artifact.height,
        frame_rate: artifact.frame_rate,
        size_bytes: artifact.size_bytes,
    }
}

/// Await the single-shot outcome of a session.
async fn wait_outcome(rx: &mut watch::Receiver<Outcome>) -> Result<Recording, HostFailure> {
    match rx.wait_for(|outcome| outcome.is_some()).await {
        Ok(value) => match &*value {
            Some(result) => result.clone(),
            None => Err(HostFailure::from("capture finished without an outcome")),
        },
        Err(_) => Err(HostFailure::from(
            "capture supervisor dropped before finalizing",
        )),
    }
}

#[async_trait::async_trait]
impl VideoCapture for Recorder {
    async fn start(&self, config: CaptureConfig) -> Result<(), CaptureError> {
        self.start_session(config).await.map(|_| ())
    }

    async fn stop(&self) -> Result<Recording, CaptureError> {
        let (mut control, mut outcome, generation) = {
            let mut phase = self.phase.lock().await;
            match std::mem::replace(&mut *phase, Phase::Idle) {
                Phase::Recording(active) => {
                    let Active {
                        control,
                        outcome,
                        generation,
                        ..
                    } = active;
                    *phase = Phase::Stopping { generation };
                    (control, outcome, generation)
                }
                other => {
                    *phase = other;
                    return Err(CaptureError::NotRecording);
                }
            }
        };

        debug!("stop requested for capture session {}", generation);
        control.request_stop();

        wait_outcome(&mut outcome).await.map_err(CaptureError::Host)
    }

    async fn record(&self, config: CaptureConfig) -> Result<Recording, CaptureError> {
        let mut outcome = self.start_session(config).await?;
        wait_outcome(&mut outcome).await.map_err(CaptureError::Host)
    }

    async fn pause(&self) -> Result<(), CaptureError> {
        let mut phase = self.phase.lock().await;
        match &mut *phase {
            Phase::Recording(active) => {
                if active.paused {
                    return Err(CaptureError::AlreadyPaused);
                }
                active.control.pause().await.map_err(CaptureError::Host)?;
                active.paused = true;
                debug!("capture session {} paused", active.generation);
                Ok(())
            }
            _ => Err(CaptureError::NotRecording),
        }
    }

    async fn resume(&self) -> Result<(), CaptureError> {
        let mut phase = self.phase.lock().await;
        match &mut *phase {
            Phase::Recording(active) => {
                if !active.paused {
                    return Err(CaptureError::NotPaused);
                }
                active.control.resume().await.map_err(CaptureError::Host)?;
                active.paused = false;
                debug!("capture session {} resumed", active.generation);
                Ok(())
            }
            _ => Err(CaptureError::NotRecording),
        }
    }

    async fn state(&self) -> SessionState {
        match &*self.phase.lock().await {
            Phase::Idle => SessionState::Idle,
            Phase::Starting => SessionState::Recording,
            Phase::Recording(active) if active.paused => SessionState::Paused,
            Phase::Recording(_) => SessionState::Recording,
            Phase::Stopping { .. } => SessionState::Recording,
            Phase::Completed => SessionState::Completed,
            Phase::Failed => SessionState::Failed,
        }
    }

    async fn echo(&self, value: String) -> String {
        debug!("echo: {}", value);
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::time::Duration;

    #[test]
    fn finalize_maps_artifact_fields() {
        let artifact = Artifact {
            path: PathBuf::from("/videos/VID_1.mp4"),
            duration: Duration::from_millis(2500),
            width: 1920,
            height: 1080,
            frame_rate: 240,
            size_bytes: 4096,
        };

        let recording = finalize(artifact);
        assert_eq!(recording.video_path, PathBuf::from("/videos/VID_1.mp4"));
        assert_eq!(recording.duration_secs, 2.5);
        assert_eq!((recording.width, recording.height), (1920, 1080));
        assert_eq!(recording.frame_rate, 240);
        assert_eq!(recording.size_bytes, 4096);
    }
}
