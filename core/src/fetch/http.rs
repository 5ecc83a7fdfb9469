//! HTTP fetcher

use std::time::Duration;

use reqwest::Url;

use gbhost_shared::fs::MAX_ROM_BYTES;

use super::{FetchError, Fetcher};
use crate::payload::Payload;

/// Fetches resources with HTTP GET relative to a base URL.
///
/// Resolution follows page-relative link rules: with a base of
/// `http://host/emu/index.html`, `tetris.gb` resolves to
/// `http://host/emu/tetris.gb`. Bodies are read as raw bytes; no charset
/// decoding is ever applied.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
    base: Url,
    max_bytes: u64,
}

impl HttpFetcher {
    /// Create a fetcher with no request timeout and the default size cap
    pub fn new(base_url: &str) -> Result<Self, FetchError> {
        Self::with_options(base_url, None, MAX_ROM_BYTES)
    }

    /// Create a fetcher with an optional per-request timeout and a size cap
    pub fn with_options(
        base_url: &str,
        timeout: Option<Duration>,
        max_bytes: u64,
    ) -> Result<Self, FetchError> {
        let base = Url::parse(base_url)
            .map_err(|e| FetchError::InvalidUrl(format!("{}: {}", base_url, e)))?;

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| FetchError::Network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base,
            max_bytes,
        })
    }

    /// Base URL resources resolve against
    pub fn base(&self) -> &Url {
        &self.base
    }

    /// Absolute URL of a resource
    pub fn resource_url(&self, name: &str) -> Result<Url, FetchError> {
        self.base
            .join(name)
            .map_err(|e| FetchError::InvalidUrl(format!("{}: {}", name, e)))
    }

    fn check_size(&self, name: &str, len: u64) -> Result<(), FetchError> {
        if len > self.max_bytes {
            return Err(FetchError::TooLarge {
                resource: name.to_string(),
                len,
                max: self.max_bytes,
            });
        }
        Ok(())
    }
}

impl Fetcher for HttpFetcher {
    async fn fetch(&self, name: &str) -> Result<Payload, FetchError> {
        let url = self.resource_url(name)?;
        tracing::debug!("GET {}", url);

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: response.status().as_u16(),
            });
        }

        if let Some(len) = response.content_length() {
            self.check_size(name, len)?;
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;
        self.check_size(name, bytes.len() as u64)?;

        Ok(Payload::new(bytes.to_vec()))
    }
}

#[cfg(test)]
mod tests {
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::thread::JoinHandle;

    use super::*;

    /// Serve a single response on a loopback port.
    ///
    /// Returns a page URL under `/emu/` and a handle yielding the request line.
    fn serve_once(status: &'static str, body: Vec<u8>) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();

        let handle = std::thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut buf = [0u8; 4096];
            let n = stream.read(&mut buf).unwrap();
            let request = String::from_utf8_lossy(&buf[..n]).to_string();

            let header = format!(
                "HTTP/1.1 {}\r\nContent-Type: text/plain\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                status,
                body.len()
            );
            // The client may hang up early (size cap, error status).
            let _ = stream.write_all(header.as_bytes());
            let _ = stream.write_all(&body);
            let _ = stream.flush();

            request.lines().next().unwrap_or_default().to_string()
        });

        (format!("http://{}/emu/index.html", addr), handle)
    }

    #[test]
    fn resource_url_is_page_relative() {
        let fetcher = HttpFetcher::new("http://localhost:8080/emu/index.html").unwrap();
        assert_eq!(
            fetcher.resource_url("tetris.gb").unwrap().as_str(),
            "http://localhost:8080/emu/tetris.gb"
        );

        let fetcher = HttpFetcher::new("http://localhost:8080/").unwrap();
        assert_eq!(
            fetcher.resource_url("bootRom.gb").unwrap().as_str(),
            "http://localhost:8080/bootRom.gb"
        );
    }

    #[test]
    fn rejects_invalid_base_url() {
        assert!(matches!(
            HttpFetcher::new("not a url"),
            Err(FetchError::InvalidUrl(_))
        ));
    }

    #[tokio::test]
    async fn fetch_preserves_raw_bytes() {
        let body: Vec<u8> = (0..=255).collect();
        let (base, server) = serve_once("200 OK", body.clone());

        let fetcher = HttpFetcher::new(&base).unwrap();
        let payload = fetcher.fetch("bootRom.gb").await.unwrap();

        assert_eq!(payload.as_bytes(), body.as_slice());
        assert_eq!(server.join().unwrap(), "GET /emu/bootRom.gb HTTP/1.1");
    }

    #[tokio::test]
    async fn fetch_reports_http_status() {
        let (base, server) = serve_once("404 Not Found", b"missing".to_vec());

        let fetcher = HttpFetcher::new(&base).unwrap();
        let err = fetcher.fetch("tetris.gb").await.unwrap_err();

        assert!(matches!(err, FetchError::Status { status: 404, .. }));
        server.join().unwrap();
    }

    #[tokio::test]
    async fn fetch_enforces_size_cap() {
        let (base, server) = serve_once("200 OK", vec![0u8; 64]);

        let fetcher = HttpFetcher::with_options(&base, None, 32).unwrap();
        let err = fetcher.fetch("tetris.gb").await.unwrap_err();

        assert_eq!(
            err,
            FetchError::TooLarge {
                resource: "tetris.gb".to_string(),
                len: 64,
                max: 32,
            }
        );
        server.join().unwrap();
    }

    #[tokio::test]
    async fn fetch_reports_connection_failure() {
        // Bind then drop to get a port nothing listens on.
        let port = TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap()
            .port();
        let fetcher = HttpFetcher::new(&format!("http://127.0.0.1:{}/", port)).unwrap();

        assert!(matches!(
            fetcher.fetch("tetris.gb").await,
            Err(FetchError::Network(_))
        ));
    }
}
