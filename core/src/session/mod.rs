//! Session: the asset loader and console bridge wired to one runtime
//!
//! Replaces the page-level global object. The runtime is injected, the
//! bridge is attached as its output, and the lifecycle is observable
//! through [`Session::status`].

use std::sync::Arc;

use tokio::sync::watch;

use gbhost_shared::ResourceManifest;

use crate::bridge::ConsoleBridge;
use crate::fetch::Fetcher;
use crate::loader::{AssetLoader, LoadError};
use crate::runtime::{RuntimeError, RuntimeHandle};
use crate::status::LoadStatus;


/// A loader session bound to a runtime.
pub struct Session<F, R> {
    loader: AssetLoader<F>,
    runtime: R,
    bridge: Arc<ConsoleBridge>,
}

impl<F: Fetcher, R: RuntimeHandle> Session<F, R> {
    /// Create a session and route the runtime's output into a fresh bridge
    pub fn new(manifest: ResourceManifest, fetcher: F, mut runtime: R) -> Self {
        let bridge = Arc::new(ConsoleBridge::new());
        runtime.attach_output(bridge.clone());

        Self {
            loader: AssetLoader::new(manifest, fetcher),
            runtime,
            bridge,
        }
    }

    /// Wait for the runtime to signal readiness, then load every resource.
    pub async fn on_runtime_ready(&mut self) -> Result<(), LoadError> {
        self.runtime.ready().await;
        tracing::debug!("Runtime signalled ready");
        self.loader.initialize(&mut self.runtime).await
    }

    /// Invoke the runtime's entry point with the manifest's names as arguments.
    ///
    /// Runs regardless of how many resources were loaded.
    pub fn on_entry_point_trigger(&mut self) -> Result<(), RuntimeError> {
        let args = self.loader.manifest().to_args();
        tracing::info!("Calling main with {:?}", args);

        let code = self.runtime.call_main(&args)?;
        tracing::debug!("main exited with {}", code);

        self.loader.mark_running();
        Ok(())
    }

    /// Feed a line of runtime output to the bridge
    pub fn print(&self, text: &str) {
        self.bridge.print(text);
    }

    /// Snapshot of the display buffer
    pub fn message(&self) -> String {
        self.bridge.message()
    }

    /// Observe the display buffer
    pub fn subscribe(&self) -> watch::Receiver<String> {
        self.bridge.subscribe()
    }

    /// Current lifecycle state
    pub fn status(&self) -> &LoadStatus {
        self.loader.status()
    }

    /// Resources this session loads
    pub fn manifest(&self) -> &ResourceManifest {
        self.loader.manifest()
    }

    /// Get the console bridge
    pub fn bridge(&self) -> &Arc<ConsoleBridge> {
        &self.bridge
    }

    /// Get the runtime
    pub fn runtime(&self) -> &R {
        &self.runtime
    }

    /// Get mutable reference to the runtime
    pub fn runtime_mut(&mut self) -> &mut R {
        &mut self.runtime
    }
}
