//! HTTP retrieval of remote images and fonts for export.

use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use showcase_core::{Error, Result};
use showcase_render::{Fetched, Fetcher};
use std::time::Duration;

const FETCH_TIMEOUT: Duration = Duration::from_secs(20);

/// Blocking HTTP client. Clones share one connection pool.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .timeout(FETCH_TIMEOUT)
            .user_agent(concat!("showcase/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::Fetch(format!("Failed to create HTTP client: {}", e)))?;
        Ok(Self { client })
    }
}

impl Fetcher for HttpFetcher {
    fn fetch(&mut self, url: &str) -> Result<Fetched> {
        let response = self
            .client
            .get(url)
            .send()
            .and_then(|r| r.error_for_status())
            .map_err(|e| Error::Fetch(format!("{}: {}", url, e)))?;

        let mime_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let bytes = response
            .bytes()
            .map_err(|e| Error::Fetch(format!("{}: {}", url, e)))?;

        log::debug!("GET {} ({} bytes)", url, bytes.len());
        Ok(Fetched::new(mime_type.as_deref(), bytes.to_vec()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::thread;

    /// Serve one response on a local port and return its base URL.
    fn serve_once(status: &'static str, content_type: &'static str, body: &'static [u8]) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut request = [0u8; 1024];
            let _ = stream.read(&mut request);
            let head = format!(
                "HTTP/1.1 {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                status,
                content_type,
                body.len()
            );
            stream.write_all(head.as_bytes()).unwrap();
            stream.write_all(body).unwrap();
        });
        format!("http://{}", addr)
    }

    fn local_fetcher() -> HttpFetcher {
        HttpFetcher {
            client: Client::builder().no_proxy().build().unwrap(),
        }
    }

    #[test]
    fn test_fetch_returns_body_and_content_type() {
        let base = serve_once("200 OK", "image/png; charset=binary", b"\x89PNG");
        let fetched = local_fetcher().fetch(&format!("{}/hero.png", base)).unwrap();

        assert_eq!(fetched.mime_type.as_deref(), Some("image/png"));
        assert_eq!(fetched.bytes, b"\x89PNG".to_vec());
    }

    #[test]
    fn test_error_status_is_a_fetch_error() {
        let base = serve_once("404 Not Found", "text/plain", b"missing");
        let result = local_fetcher().fetch(&format!("{}/missing.png", base));

        assert!(matches!(result, Err(Error::Fetch(_))));
    }
}
