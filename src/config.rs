/// Base URL used when neither an override nor the environment names one.
pub const DEFAULT_API_URL: &str = "https://api.helioviewer.org/v2/";

/// Environment variable consulted when no explicit URL is configured.
pub const API_URL_ENV: &str = "HELIOVIEWER_API_URL";

#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Explicit base URL. Takes precedence over `HELIOVIEWER_API_URL`.
    pub api_url: Option<String>,
    /// Whether to verify TLS certificates.
    pub verify: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: None,
            verify: true,
        }
    }
}

/// Resolves the effective base URL: explicit override, then the
/// environment, then [`DEFAULT_API_URL`]. Blank values are skipped.
pub(crate) fn resolve_api_url(explicit: Option<&str>) -> String {
    resolve_with(explicit, std::env::var(API_URL_ENV).ok())
}

fn resolve_with(explicit: Option<&str>, env: Option<String>) -> String {
    explicit
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .or_else(|| env.map(|v| v.trim().to_string()).filter(|v| !v.is_empty()))
        .unwrap_or_else(|| DEFAULT_API_URL.to_string())
}
