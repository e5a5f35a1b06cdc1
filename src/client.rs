use serde_json::Value as Json;
use std::time::Duration;

use crate::config::{ClientConfig, resolve_api_url};
use crate::endpoint::Endpoint;
use crate::error::{Error, Result};
use crate::params::{OutputType, Parameters, Value};
use crate::transport::{HttpTransport, Transport};

/// A decoded response body.
#[derive(Debug, Clone, PartialEq)]
pub enum Response {
    Raw(Vec<u8>),
    Text(String),
    Json(Json),
}

impl Response {
    pub fn output_type(&self) -> OutputType {
        match self {
            Response::Raw(_) => OutputType::Raw,
            Response::Text(_) => OutputType::String,
            Response::Json(_) => OutputType::Json,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Response::Raw(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Response::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_json(&self) -> Option<&Json> {
        match self {
            Response::Json(v) => Some(v),
            _ => None,
        }
    }

    pub fn into_bytes(self) -> Result<Vec<u8>> {
        match self {
            Response::Raw(b) => Ok(b),
            other => Err(other.mismatch(OutputType::Raw)),
        }
    }

    pub fn into_text(self) -> Result<String> {
        match self {
            Response::Text(s) => Ok(s),
            other => Err(other.mismatch(OutputType::String)),
        }
    }

    pub fn into_json(self) -> Result<Json> {
        match self {
            Response::Json(v) => Ok(v),
            other => Err(other.mismatch(OutputType::Json)),
        }
    }

    fn mismatch(&self, expected: OutputType) -> Error {
        Error::UnexpectedResponse {
            expected,
            actual: self.output_type(),
        }
    }
}

fn decode(url: &str, mode: OutputType, body: Vec<u8>) -> Result<Response> {
    match mode {
        OutputType::Raw => Ok(Response::Raw(body)),
        OutputType::String => String::from_utf8(body)
            .map(Response::Text)
            .map_err(|e| Error::Decode {
                url: url.to_string(),
                reason: format!("body is not valid UTF-8: {e}"),
            }),
        OutputType::Json => serde_json::from_slice(&body)
            .map(Response::Json)
            .map_err(|e| Error::Decode {
                url: url.to_string(),
                reason: format!("body is not valid JSON: {e}"),
            }),
    }
}

/// Helioviewer API client.
///
/// The base URL is resolved on every call: the explicit override if one is
/// set, else `HELIOVIEWER_API_URL`, else the public v2 API.
#[derive(Debug, Clone)]
pub struct Client<T = HttpTransport> {
    api_url: Option<String>,
    pub(crate) poll_interval: Duration,
    pub(crate) progress: bool,
    transport: T,
}

impl Client<HttpTransport> {
    /// Creates a client without a URL override, so the environment or the
    /// default decides.
    ///
    /// This is equivalent to `Client::new(ClientConfig::default())`.
    pub fn from_env() -> Result<Self> {
        Self::new(ClientConfig::default())
    }

    pub fn new(config: ClientConfig) -> Result<Self> {
        let transport = HttpTransport::new(config.verify)?;
        let mut client = Self::with_transport(transport);
        client.api_url = config.api_url;
        Ok(client)
    }
}

impl<T: Transport> Client<T> {
    /// Creates a client on top of any [`Transport`].
    pub fn with_transport(transport: T) -> Self {
        Self {
            api_url: None,
            poll_interval: Duration::from_secs(3),
            progress: true,
            transport,
        }
    }

    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = Some(url.into());
        self
    }

    /// Delay between two movie status checks.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Show a spinner while waiting for server-side jobs.
    pub fn with_progress(mut self, progress: bool) -> Self {
        self.progress = progress;
        self
    }

    pub fn set_api_url(&mut self, url: impl Into<String>) {
        self.api_url = Some(url.into());
    }

    /// Drops the override; the environment or the default applies again.
    pub fn clear_api_url(&mut self) {
        self.api_url = None;
    }

    /// The base URL the next call will use.
    pub fn api_url(&self) -> String {
        resolve_api_url(self.api_url.as_deref())
    }

    /// Full request URL for `params` under the current configuration.
    pub fn url_for(&self, params: &Parameters) -> String {
        params.url(&self.api_url())
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Sends `params` and decodes the body according to its output type.
    ///
    /// Non-2xx statuses fail with [`Error::Http`] without decoding the body.
    pub fn execute(&self, params: &Parameters) -> Result<Response> {
        let url = self.url_for(params);
        let query = params.query();
        let mode = params.output_type();
        tracing::debug!(url = %url, ?mode, params = query.len(), "GET");

        let resp = self.transport.get(&url, &query)?;
        if !resp.is_success() {
            tracing::warn!(url = %url, status = resp.status, "request failed");
            return Err(Error::Http {
                status: resp.status,
                url,
            });
        }

        decode(&url, mode, resp.body)
    }

    /// Validates `input` for `endpoint` and executes the call.
    ///
    /// ```no_run
    /// use helioviewer::{Client, Endpoint, Value};
    ///
    /// let client = Client::from_env()?;
    /// let sources = client.call(Endpoint::GetDataSources, [("verbose", Value::from(false))])?;
    /// println!("{:?}", sources.as_json());
    /// # Ok::<(), helioviewer::Error>(())
    /// ```
    pub fn call<K, I>(&self, endpoint: Endpoint, input: I) -> Result<Response>
    where
        K: AsRef<str>,
        I: IntoIterator<Item = (K, Value)>,
    {
        let params = Parameters::new(endpoint, input)?;
        self.execute(&params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::RawResponse;
    use std::cell::RefCell;

    struct Canned {
        status: u16,
        body: &'static [u8],
        seen: RefCell<Vec<(String, Vec<(String, String)>)>>,
    }

    impl Canned {
        fn new(status: u16, body: &'static [u8]) -> Self {
            Self {
                status,
                body,
                seen: RefCell::new(Vec::new()),
            }
        }
    }

    impl Transport for Canned {
        fn get(&self, url: &str, query: &[(&str, String)]) -> anyhow::Result<RawResponse> {
            self.seen.borrow_mut().push((
                url.to_string(),
                query
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.clone()))
                    .collect(),
            ));
            Ok(RawResponse {
                status: self.status,
                body: self.body.to_vec(),
            })
        }
    }

    fn status_params() -> Parameters {
        Parameters::new(Endpoint::GetStatus, Vec::<(&str, Value)>::new()).unwrap()
    }

    #[test]
    fn decodes_json() {
        let client = Client::with_transport(Canned::new(200, br#"{"AIA": {"time": "x"}}"#))
            .with_api_url("http://localhost/v2/");
        let resp = client.execute(&status_params()).unwrap();
        assert_eq!(resp.as_json().unwrap()["AIA"]["time"], "x");
        let seen = client.transport().seen.borrow();
        assert_eq!(seen[0].0, "http://localhost/v2/getStatus/");
    }

    #[test]
    fn http_error_keeps_status() {
        let client = Client::with_transport(Canned::new(404, b"not json at all"));
        let err = client.execute(&status_params()).unwrap_err();
        assert_eq!(err.status(), Some(404));
    }

    #[test]
    fn invalid_json_is_a_decode_error() {
        let client = Client::with_transport(Canned::new(200, b"<html>"));
        let err = client.execute(&status_params()).unwrap_err();
        assert!(matches!(err, Error::Decode { .. }), "{err:?}");
    }

    #[test]
    fn raw_and_text_modes() {
        let client = Client::with_transport(Canned::new(200, b"\xff\xd8binary"));
        let resp = client
            .call(Endpoint::DownloadScreenshot, [("id", Value::from(42))])
            .unwrap();
        assert_eq!(resp.as_bytes(), Some(&b"\xff\xd8binary"[..]));

        let client = Client::with_transport(Canned::new(200, b"cb({\"a\":1})"));
        let resp = client
            .call(Endpoint::GetNewsFeed, Vec::<(&str, Value)>::new())
            .unwrap();
        assert_eq!(resp.into_text().unwrap(), "cb({\"a\":1})");

        let client = Client::with_transport(Canned::new(200, b"\xff\xfe"));
        let err = client
            .call(Endpoint::GetNewsFeed, Vec::<(&str, Value)>::new())
            .unwrap_err();
        assert!(matches!(err, Error::Decode { .. }));
    }

    #[test]
    fn validation_happens_before_any_request() {
        let client = Client::with_transport(Canned::new(200, b"{}"));
        let err = client
            .call(Endpoint::GetJP2Image, [("sourceId", Value::from(14))])
            .unwrap_err();
        assert_eq!(err.field(), Some("date"));
        assert!(client.transport().seen.borrow().is_empty());
    }

    #[test]
    fn url_follows_later_configuration() {
        let mut client = Client::with_transport(Canned::new(200, b"{}"));
        let params = status_params();
        client.set_api_url("http://first/v2/");
        assert_eq!(client.url_for(&params), "http://first/v2/getStatus/");
        client.set_api_url("http://second/v2/");
        assert_eq!(client.url_for(&params), "http://second/v2/getStatus/");
    }

    #[test]
    fn response_conversions_check_shape() {
        let err = Response::Text("x".into()).into_json().unwrap_err();
        assert!(matches!(
            err,
            Error::UnexpectedResponse {
                expected: OutputType::Json,
                actual: OutputType::String
            }
        ));
        assert!(Response::Raw(vec![1]).into_bytes().is_ok());
    }
}
