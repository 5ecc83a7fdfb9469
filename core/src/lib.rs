//! gbhost core - asset loader and console bridge
//!
//! Loads a fixed list of ROM files into an externally provided runtime and
//! turns the runtime's console output into a display buffer a front end can
//! observe.
//!
//! # Architecture
//!
//! - [`Session`] - Owns the loader and bridge, drives one runtime
//! - [`AssetLoader`] - Sequential fetch-then-register over a manifest
//! - [`ConsoleBridge`] - Filters runtime output into the display buffer
//! - [`RuntimeHandle`] - The injected runtime; [`MemoryRuntime`] runs in-process
//! - [`Fetcher`] - Where resource bytes come from (HTTP or a local directory)

pub mod bridge;
pub mod config;
pub mod fetch;
pub mod loader;
pub mod payload;
pub mod runtime;
pub mod session;
pub mod status;
#[cfg(test)]
pub mod test_utils;
pub mod vfs;

pub use bridge::{ConsoleBridge, OutputLine};
pub use config::Config;
pub use fetch::{DirFetcher, FetchError, Fetcher, HttpFetcher};
pub use loader::{AssetLoader, LoadError};
pub use payload::Payload;
pub use runtime::{
    CartridgeMain, EntryPoint, LogSink, MemoryRuntime, OutputSink, RuntimeError, RuntimeHandle,
};
pub use session::Session;
pub use status::LoadStatus;
pub use vfs::{FileMode, FsError, Vfs};
