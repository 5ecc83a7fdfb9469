//! In-process runtime backed by the in-memory filesystem

use std::future::Future;
use std::sync::Arc;

use tokio::sync::watch;

use super::{EntryPoint, LogSink, OutputSink, RuntimeError, RuntimeHandle};
use crate::vfs::Vfs;

/// Runtime that keeps its filesystem in memory and runs an [`EntryPoint`]
/// in-process.
///
/// Starts out not ready; [`MemoryRuntime::boot`] flips it to ready and wakes
/// anything waiting in [`RuntimeHandle::ready`].
pub struct MemoryRuntime<E> {
    fs: Vfs,
    entry: E,
    output: Option<Arc<dyn OutputSink>>,
    ready: watch::Sender<bool>,
}

impl<E: EntryPoint> MemoryRuntime<E> {
    /// Create a runtime around an entry point
    pub fn new(entry: E) -> Self {
        let (ready, _) = watch::channel(false);
        Self {
            fs: Vfs::new(),
            entry,
            output: None,
            ready,
        }
    }

    /// Finish startup and signal readiness
    pub fn boot(&mut self) {
        if !self.ready.send_replace(true) {
            tracing::debug!("Runtime ready");
        }
    }

    /// Whether `boot` has been called
    pub fn is_ready(&self) -> bool {
        *self.ready.borrow()
    }

    /// Get the filesystem
    pub fn fs(&self) -> &Vfs {
        &self.fs
    }

    /// Get mutable reference to the filesystem
    pub fn fs_mut(&mut self) -> &mut Vfs {
        &mut self.fs
    }

    /// Get the entry point
    pub fn entry(&self) -> &E {
        &self.entry
    }
}

impl<E: EntryPoint> RuntimeHandle for MemoryRuntime<E> {
    fn ready(&self) -> impl Future<Output = ()> {
        let mut ready = self.ready.subscribe();
        async move {
            // The sender lives as long as the runtime, so this only errors
            // if the runtime is dropped mid-wait.
            let _ = ready.wait_for(|booted| *booted).await;
        }
    }

    fn create_data_file(
        &mut self,
        parent: &str,
        name: &str,
        data: &[u8],
        can_read: bool,
        can_write: bool,
    ) -> Result<(), RuntimeError> {
        let path = self
            .fs
            .create_data_file(parent, name, data, can_read, can_write)?;
        tracing::debug!("Created {} ({} bytes)", path, data.len());
        Ok(())
    }

    fn call_main(&mut self, args: &[String]) -> Result<i32, RuntimeError> {
        if !self.is_ready() {
            return Err(RuntimeError::NotReady);
        }

        let sink: Arc<dyn OutputSink> = match &self.output {
            Some(sink) => Arc::clone(sink),
            None => Arc::new(LogSink),
        };
        Ok(self.entry.main(&self.fs, args, sink.as_ref()))
    }

    fn attach_output(&mut self, sink: Arc<dyn OutputSink>) {
        self.output = Some(sink);
    }
}
