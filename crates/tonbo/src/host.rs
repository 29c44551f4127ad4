//! Seam to the host camera subsystem
//!
//! The native camera pipeline (sensor access, encoder, file writing) lives
//! behind [`CameraHost`]: begin a capture with a configuration, receive a
//! control surface plus a completion that resolves exactly once when the
//! pipeline tears down - either because [`CaptureControl::request_stop`]
//! asked it to or because the host ended the capture on its own (duration or
//! size cap reached, host UI).
//!
//! The `test-source` feature provides [`TestCamera`], a synthetic host that
//! records a placeholder clip to disk without hardware.

use crate::config::CaptureConfig;
use crate::error::HostFailure;
use std::path::PathBuf;
use std::time::Duration;
use tokio::sync::oneshot;

/// Description of a finalized capture artifact.
#[derive(Debug, Clone)]
pub struct Artifact {
    /// Absolute path of the written file
    pub path: PathBuf,
    /// Realized capture duration
    pub duration: Duration,
    /// Realized frame width in pixels
    pub width: u32,
    /// Realized frame height in pixels
    pub height: u32,
    /// Realized frame rate
    pub frame_rate: u32,
    /// File size in bytes
    pub size_bytes: u64,
}

/// Resolves exactly once when the host pipeline tears down.
pub type Completion = oneshot::Receiver<Result<Artifact, HostFailure>>;

/// The host camera subsystem as an opaque capability.
#[async_trait::async_trait]
pub trait CameraHost: Send + Sync {
    /// Begin capture. Resolves once the pipeline is live, returning the
    /// control surface and the teardown completion.
    async fn begin(
        &self,
        config: &CaptureConfig,
    ) -> Result<(Box<dyn CaptureControl>, Completion), HostFailure>;
}

/// Control surface for an in-flight capture.
#[async_trait::async_trait]
pub trait CaptureControl: Send {
    /// Request teardown and finalization. Idempotent; the result arrives on
    /// the [`Completion`].
    fn request_stop(&mut self);

    /// Pause the encoder without ending the session.
    async fn pause(&mut self) -> Result<(), HostFailure>;

    /// Resume a paused encoder.
    async fn resume(&mut self) -> Result<(), HostFailure>;
}

// ── Synthetic test-source host ───────────────────────────────────────

#[cfg(feature = "test-source")]
pub use test_source::{TestCamera, TestCameraConfig};

#[cfg(feature = "test-source")]
mod test_source {
    use super::{Artifact, CameraHost, CaptureControl, Completion};
    use crate::config::CaptureConfig;
    use crate::error::HostFailure;
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::time::{Duration, SystemTime, UNIX_EPOCH};
    use tokio::sync::{oneshot, watch};
    use tracing::{debug, info};

    /// Simulation tick; coarse so high frame rates do not dominate test time.
    const TICK: Duration = Duration::from_millis(20);

    /// Marker bytes at the start of every synthetic clip.
    const CLIP_HEADER: &[u8] = b"tonbo-synthetic-clip\n";

    static CLIP_COUNTER: AtomicU64 = AtomicU64::new(0);

    /// Configuration for the synthetic camera host.
    #[derive(Debug, Clone)]
    pub struct TestCameraConfig {
        /// Directory artifacts are written into
        pub output_dir: PathBuf,
        /// Simulated bytes per captured frame
        pub bytes_per_frame: u64,
        /// Fail `begin` with this reason instead of capturing
        pub fail_begin: Option<String>,
    }

    impl Default for TestCameraConfig {
        fn default() -> Self {
            Self {
                output_dir: std::env::temp_dir(),
                bytes_per_frame: 48,
                fail_begin: None,
            }
        }
    }

    /// Synthetic camera host: honors duration/size caps, stop requests and
    /// pause/resume, and writes a placeholder clip where a real host would
    /// write the encoded video.
    pub struct TestCamera {
        config: TestCameraConfig,
    }

    impl TestCamera {
        pub fn new(config: TestCameraConfig) -> Self {
            Self { config }
        }
    }

    #[async_trait::async_trait]
    impl CameraHost for TestCamera {
        async fn begin(
            &self,
            config: &CaptureConfig,
        ) -> Result<(Box<dyn CaptureControl>, Completion), HostFailure> {
            if let Some(reason) = &self.config.fail_begin {
                return Err(HostFailure::new(reason.clone()));
            }

            let (width, height) = config.quality.dimensions();
            let clip = CLIP_COUNTER.fetch_add(1, Ordering::Relaxed);
            let path = self
                .config
                .output_dir
                .join(format!("VID_{}_{}.mp4", unix_micros(), clip));

            let (stop_tx, stop_rx) = oneshot::channel();
            let (pause_tx, pause_rx) = watch::channel(false);
            let (done_tx, done_rx) = oneshot::channel();

            let session = Session {
                path,
                width,
                height,
                frame_rate: config.frame_rate,
                bytes_per_frame: self.config.bytes_per_frame,
                duration_cap: match config.duration_limit_secs {
                    0 => None,
                    secs => Some(Duration::from_secs(secs)),
                },
                size_cap: config.size_limit_bytes,
            };

            info!(
                "test camera capture started: {}x{} @ {}fps -> {}",
                width,
                height,
                config.frame_rate,
                session.path.display()
            );

            tokio::spawn(async move {
                let outcome = session.run(stop_rx, pause_rx).await;
                let _ = done_tx.send(outcome);
            });

            Ok((
                Box::new(TestControl {
                    stop: Some(stop_tx),
                    pause: pause_tx,
                }),
                done_rx,
            ))
        }
    }

    struct TestControl {
        stop: Option<oneshot::Sender<()>>,
        pause: watch::Sender<bool>,
    }

    #[async_trait::async_trait]
    impl CaptureControl for TestControl {
        fn request_stop(&mut self) {
            if let Some(stop) = self.stop.take() {
                let _ = stop.send(());
            }
        }

        async fn pause(&mut self) -> Result<(), HostFailure> {
            self.pause
                .send(true)
                .map_err(|_| HostFailure::from("capture task gone"))
        }

        async fn resume(&mut self) -> Result<(), HostFailure> {
            self.pause
                .send(false)
                .map_err(|_| HostFailure::from("capture task gone"))
        }
    }

    struct Session {
        path: PathBuf,
        width: u32,
        height: u32,
        frame_rate: u32,
        bytes_per_frame: u64,
        duration_cap: Option<Duration>,
        size_cap: u64,
    }

    impl Session {
        async fn run(
            self,
            mut stop_rx: oneshot::Receiver<()>,
            pause_rx: watch::Receiver<bool>,
        ) -> Result<Artifact, HostFailure> {
            let frames_per_tick = (self.frame_rate as u64 * TICK.as_millis() as u64 / 1000).max(1);
            let bytes_per_tick = frames_per_tick * self.bytes_per_frame;

            let mut ticker = tokio::time::interval(TICK);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            ticker.tick().await; // immediate first tick

            let mut recorded = Duration::ZERO;
            let mut payload_bytes = 0u64;

            loop {
                tokio::select! {
                    _ = &mut stop_rx => {
                        debug!("test camera capture stop requested");
                        break;
                    }
                    _ = ticker.tick() => {
                        if *pause_rx.borrow() {
                            continue;
                        }
                        recorded += TICK;
                        payload_bytes += bytes_per_tick;
                        if self.duration_cap.is_some_and(|cap| recorded >= cap) {
                            debug!("test camera capture reached its duration cap");
                            break;
                        }
                        if self.size_cap > 0 && payload_bytes >= self.size_cap {
                            debug!("test camera capture reached its size cap");
                            break;
                        }
                    }
                }
            }

            let mut content = Vec::with_capacity(CLIP_HEADER.len() + payload_bytes as usize);
            content.extend_from_slice(CLIP_HEADER);
            content.resize(CLIP_HEADER.len() + payload_bytes as usize, 0);

            tokio::fs::write(&self.path, &content).await.map_err(|e| {
                HostFailure::new(format!("failed to write {}: {}", self.path.display(), e))
            })?;

            info!(
                "test camera clip written: {} ({} bytes, {:.2}s)",
                self.path.display(),
                content.len(),
                recorded.as_secs_f64()
            );

            Ok(Artifact {
                path: self.path,
                duration: recorded,
                width: self.width,
                height: self.height,
                frame_rate: self.frame_rate,
                size_bytes: content.len() as u64,
            })
        }
    }

    fn unix_micros() -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_micros() as u64)
            .unwrap_or(0)
    }
}
