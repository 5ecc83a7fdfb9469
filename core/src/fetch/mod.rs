//! Resource fetching
//!
//! A [`Fetcher`] turns a resource name into its raw bytes. Names are
//! resolved relative to wherever the fetcher points: a base URL for
//! [`HttpFetcher`], a directory for [`DirFetcher`].

use std::future::Future;

use thiserror::Error;

use crate::payload::Payload;

mod dir;
mod http;

pub use dir::DirFetcher;
pub use http::HttpFetcher;

/// Error type for resource fetching
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// Base URL or resource URL could not be built
    #[error("invalid URL: {0}")]
    InvalidUrl(String),
    /// Resource name cannot be used as a single path segment
    #[error("invalid resource name {0:?}")]
    InvalidName(String),
    /// Request could not be sent or the body could not be read
    #[error("network error: {0}")]
    Network(String),
    /// Server answered with a non-success status
    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },
    /// Resource exceeds the configured size cap
    #[error("{resource} is too large ({len} bytes, max {max} bytes)")]
    TooLarge { resource: String, len: u64, max: u64 },
    /// Local file could not be read
    #[error("I/O error: {0}")]
    Io(String),
}

/// Source of resource bytes.
pub trait Fetcher {
    /// Fetch one resource by name, bytes untouched.
    fn fetch(&self, name: &str) -> impl Future<Output = Result<Payload, FetchError>>;
}
