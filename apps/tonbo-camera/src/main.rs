//! Tonbo demo camera binary
//!
//! Records a short clip through the capture dispatcher against the synthetic
//! test-source host, so the whole contract can be driven without hardware.
//!
//! ## Usage
//!
//! ```bash
//! # Record 3 seconds of synthetic 1080p @ 240fps
//! tonbo-camera
//!
//! # Override the clip parameters
//! TONBO_QUALITY=uhd TONBO_FPS=60 TONBO_DURATION_SECS=5 tonbo-camera
//!
//! # Write somewhere specific
//! TONBO_OUTPUT_DIR=/tmp/clips tonbo-camera
//! ```

use anyhow::{Context, Result};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

use tonbo::{CaptureConfig, Dispatcher, Quality, TestCamera, TestCameraConfig, VideoCapture};

/// Demo configuration from environment
struct Config {
    quality: Quality,
    frame_rate: u32,
    duration_secs: u64,
    output_dir: PathBuf,
}

impl Config {
    fn from_env() -> Result<Self> {
        let quality = match std::env::var("TONBO_QUALITY") {
            Ok(s) => s.parse().context("Invalid TONBO_QUALITY")?,
            Err(_) => Quality::Fhd,
        };

        let frame_rate = match std::env::var("TONBO_FPS") {
            Ok(s) => s.parse().context("Invalid TONBO_FPS")?,
            Err(_) => 240,
        };

        let duration_secs = match std::env::var("TONBO_DURATION_SECS") {
            Ok(s) => s.parse().context("Invalid TONBO_DURATION_SECS")?,
            Err(_) => 3,
        };

        let output_dir = std::env::var("TONBO_OUTPUT_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| std::env::temp_dir());

        Ok(Self {
            quality,
            frame_rate,
            duration_secs,
            output_dir,
        })
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env()?;

    let host = Arc::new(TestCamera::new(TestCameraConfig {
        output_dir: config.output_dir.clone(),
        ..Default::default()
    }));
    let plugin =
        Dispatcher::register_default(Some(host)).context("Failed to register capture plugin")?;

    info!(
        "recording {} @ {}fps for {}s via {}",
        config.quality,
        config.frame_rate,
        config.duration_secs,
        plugin.name()
    );

    let recording = plugin
        .record(CaptureConfig {
            quality: config.quality,
            frame_rate: config.frame_rate,
            duration_limit_secs: config.duration_secs,
            ..Default::default()
        })
        .await
        .context("Capture failed")?;

    info!(
        "clip written: {} ({} bytes, {:.1}s @ {}fps)",
        recording.video_path.display(),
        recording.size_bytes,
        recording.duration_secs,
        recording.frame_rate
    );

    Ok(())
}
