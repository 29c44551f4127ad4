//! Capture dispatcher
//!
//! Binds a stable plugin name to exactly one implementation per process,
//! decided once at registration time. The implementation is produced by a
//! factory resolved lazily on first use - fallback hosts never construct the
//! native path and vice versa - and every call is forwarded verbatim. The
//! dispatcher holds no capture state of its own.

use crate::capture::{Recording, SessionState, VideoCapture};
use crate::config::CaptureConfig;
use crate::error::CaptureError;
use crate::host::CameraHost;
use crate::recorder::Recorder;
use crate::web::WebCapture;
use once_cell::sync::{Lazy, OnceCell};
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use thiserror::Error;
use tracing::{debug, info};

/// Stable registration identifier for this contract.
pub const PLUGIN_NAME: &str = "VideoHighFps";

/// Plugin names registered in this process.
static REGISTERED: Lazy<Mutex<HashSet<String>>> = Lazy::new(|| Mutex::new(HashSet::new()));

/// Factory producing the bound implementation on first use.
type Factory = Box<dyn Fn() -> Arc<dyn VideoCapture> + Send + Sync>;

/// Registration errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegisterError {
    /// The name is already bound in this process
    #[error("plugin name already registered: {0}")]
    DuplicateName(String),
}

/// Routes contract calls to the one implementation bound for this host.
pub struct Dispatcher {
    name: &'static str,
    factory: Factory,
    bound: OnceCell<Arc<dyn VideoCapture>>,
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("name", &self.name)
            .field("bound", &self.bound.get().is_some())
            .finish_non_exhaustive()
    }
}

impl Dispatcher {
    /// Register a contract instance under a process-unique name.
    ///
    /// The factory runs at most once, on the first forwarded call.
    pub fn register<F>(name: &'static str, factory: F) -> Result<Self, RegisterError>
    where
        F: Fn() -> Arc<dyn VideoCapture> + Send + Sync + 'static,
    {
        let mut registered = REGISTERED.lock().unwrap();
        if !registered.insert(name.to_string()) {
            return Err(RegisterError::DuplicateName(name.to_string()));
        }
        drop(registered);

        info!("registered capture plugin {}", name);
        Ok(Self {
            name,
            factory: Box::new(factory),
            bound: OnceCell::new(),
        })
    }

    /// Select the implementation for this host at startup: the native
    /// recorder when a camera host is available, the web fallback otherwise.
    pub fn register_default(host: Option<Arc<dyn CameraHost>>) -> Result<Self, RegisterError> {
        match host {
            Some(host) => Self::register(PLUGIN_NAME, move || {
                Arc::new(Recorder::new(Arc::clone(&host))) as Arc<dyn VideoCapture>
            }),
            None => {
                Self::register(PLUGIN_NAME, || Arc::new(WebCapture::new()) as Arc<dyn VideoCapture>)
            }
        }
    }

    /// The registration name of this contract instance.
    pub fn name(&self) -> &str {
        self.name
    }

    /// The bound implementation, constructed on first use.
    fn bound(&self) -> &Arc<dyn VideoCapture> {
        self.bound.get_or_init(|| {
            debug!("resolving capture implementation for {}", self.name);
            (self.factory)()
        })
    }
}

#[async_trait::async_trait]
impl VideoCapture for Dispatcher {
    async fn start(&self, config: CaptureConfig) -> Result<(), CaptureError> {
        self.bound().start(config).await
    }

    async fn stop(&self) -> Result<Recording, CaptureError> {
        self.bound().stop().await
    }

    async fn record(&self, config: CaptureConfig) -> Result<Recording, CaptureError> {
        self.bound().record(config).await
    }

    async fn pause(&self) -> Result<(), CaptureError> {
        self.bound().pause().await
    }

    async fn resume(&self) -> Result<(), CaptureError> {
        self.bound().resume().await
    }

    async fn state(&self) -> SessionState {
        self.bound().state().await
    }

    async fn echo(&self, value: String) -> String {
        self.bound().echo(value).await
    }
}
