use anyhow::{Context, Result};
use reqwest::blocking::Client as HttpClient;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use std::time::Duration;

/// Status and body of a completed HTTP exchange.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl RawResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Performs a GET with query parameters.
///
/// Implementations report connection-level failures as errors and return
/// every HTTP status, successful or not, as a [`RawResponse`].
pub trait Transport {
    fn get(&self, url: &str, query: &[(&str, String)]) -> Result<RawResponse>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn get(&self, url: &str, query: &[(&str, String)]) -> Result<RawResponse> {
        (**self).get(url, query)
    }
}

/// Blocking `reqwest` transport.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    http: HttpClient,
}

impl HttpTransport {
    pub fn new(verify: bool) -> Result<Self> {
        let mut default_headers = HeaderMap::new();
        default_headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&format!("helioviewer-rs/{}", env!("CARGO_PKG_VERSION")))
                .unwrap_or(HeaderValue::from_static("helioviewer-rs")),
        );

        let mut builder = HttpClient::builder()
            .default_headers(default_headers)
            .timeout(Duration::from_secs(60));

        if !verify {
            builder = builder.danger_accept_invalid_certs(true);
        }

        let http = builder.build().context("failed to build HTTP client")?;
        Ok(Self { http })
    }
}

impl Transport for HttpTransport {
    fn get(&self, url: &str, query: &[(&str, String)]) -> Result<RawResponse> {
        let resp = self
            .http
            .get(url)
            .query(query)
            .send()
            .with_context(|| format!("could not connect to {url}"))?;
        let status = resp.status().as_u16();
        let body = resp
            .bytes()
            .with_context(|| format!("failed to read response body from {url}"))?;
        Ok(RawResponse {
            status,
            body: body.to_vec(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_range() {
        let ok = RawResponse {
            status: 204,
            body: Vec::new(),
        };
        assert!(ok.is_success());
        for status in [199, 301, 404, 500] {
            assert!(!RawResponse { status, body: Vec::new() }.is_success());
        }
    }

    #[test]
    fn builds_http_transport() {
        assert!(HttpTransport::new(true).is_ok());
        assert!(HttpTransport::new(false).is_ok());
    }
}
