//! Tonbo - high-frame-rate video capture contract
//!
//! One contract, one implementation per host:
//!
//! - **`capture`**: the [`VideoCapture`] operations, session states, and
//!   result shape every implementation must honor
//! - **`config`**: quality presets and per-recording configuration
//! - **`host`**: the seam to the platform camera subsystem
//! - **`recorder`**: native implementation driving a [`CameraHost`]
//! - **`web`**: fallback for hosts without camera access (always unsupported)
//! - **`dispatcher`**: binds the contract to one implementation per process
//!
//! The `test-source` feature adds a synthetic camera host that records
//! placeholder clips without hardware.

pub mod capture;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod host;
pub mod recorder;
pub mod web;

// Re-export commonly used types
pub use capture::{Recording, SessionState, VideoCapture};
pub use config::{CaptureConfig, Quality};
pub use dispatcher::{Dispatcher, RegisterError, PLUGIN_NAME};
pub use error::{CaptureError, HostFailure};
pub use host::{Artifact, CameraHost, CaptureControl, Completion};
pub use recorder::Recorder;
pub use web::WebCapture;

#[cfg(feature = "test-source")]
pub use host::{TestCamera, TestCameraConfig};
