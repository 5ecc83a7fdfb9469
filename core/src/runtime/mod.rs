//! Runtime handle
//!
//! The seam between the loader and whatever actually executes the ROMs.
//! A session never touches a runtime through globals: it is handed a
//! [`RuntimeHandle`] and drives it through four operations (readiness,
//! file creation, entry point invocation, output attachment).

use std::future::Future;
use std::sync::Arc;

use thiserror::Error;

use crate::vfs::{FsError, Vfs};

mod cartridge_main;
mod memory;


pub use cartridge_main::CartridgeMain;
pub use memory::MemoryRuntime;

/// Process exit code for a successful entry point run
pub const EXIT_SUCCESS: i32 = 0;
/// Process exit code for a failed entry point run
pub const EXIT_FAILURE: i32 = 1;

/// Error type for runtime handle operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuntimeError {
    /// The runtime filesystem rejected an operation
    #[error(transparent)]
    Fs(#[from] FsError),
    /// The entry point was invoked before the runtime signalled readiness
    #[error("runtime is not ready")]
    NotReady,
}

/// Receives text the runtime writes to its output streams.
///
/// Called once per emitted line.
pub trait OutputSink: Send + Sync {
    /// A line written to standard output
    fn print(&self, text: &str);

    /// A line written to standard error
    fn print_err(&self, text: &str) {
        tracing::warn!("[RUNTIME] {}", text);
    }
}

/// Output sink that only logs. Used when nothing else is attached.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl OutputSink for LogSink {
    fn print(&self, text: &str) {
        tracing::info!("[RUNTIME] {}", text);
    }
}

/// Handle onto an externally provided runtime.
pub trait RuntimeHandle {
    /// Resolves once the runtime has finished starting up.
    fn ready(&self) -> impl Future<Output = ()>;

    /// Register `data` as a file named `name` inside directory `parent`.
    fn create_data_file(
        &mut self,
        parent: &str,
        name: &str,
        data: &[u8],
        can_read: bool,
        can_write: bool,
    ) -> Result<(), RuntimeError>;

    /// Invoke the runtime's main entry point with `args` as its argument vector.
    ///
    /// Returns the entry point's exit code.
    fn call_main(&mut self, args: &[String]) -> Result<i32, RuntimeError>;

    /// Route the runtime's output streams to `sink`.
    fn attach_output(&mut self, sink: Arc<dyn OutputSink>);
}

/// A program's `main`, run against the runtime filesystem.
pub trait EntryPoint {
    /// Run with `args` (program name excluded) and return an exit code.
    fn main(&mut self, fs: &Vfs, args: &[String], out: &dyn OutputSink) -> i32;
}

impl<F> EntryPoint for F
where
    F: FnMut(&Vfs, &[String], &dyn OutputSink) -> i32,
{
    fn main(&mut self, fs: &Vfs, args: &[String], out: &dyn OutputSink) -> i32 {
        self(fs, args, out)
    }
}
