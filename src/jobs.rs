use serde_json::Value as Json;

use crate::error::{Error, Result};

/// Reply to `queueMovie` and `takeScreenshot`.
#[derive(Debug, serde::Deserialize)]
pub(crate) struct SubmittedJob {
    // Movies use string ids, screenshots numeric ones.
    #[serde(default)]
    id: Option<Json>,
    #[serde(default)]
    pub(crate) token: Option<String>,
    #[serde(default)]
    error: Option<Json>,
}

impl SubmittedJob {
    pub(crate) fn error_message(&self) -> Option<String> {
        self.error.as_ref().and_then(truthy_message)
    }

    pub(crate) fn id(&self) -> Result<String> {
        match &self.id {
            Some(Json::String(s)) if !s.is_empty() => Ok(s.clone()),
            Some(Json::Number(n)) => Ok(n.to_string()),
            _ => Err(Error::Job("server reply is missing the job id".to_string())),
        }
    }
}

/// Movie processing state reported by `getMovieStatus`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum MovieState {
    Queued,
    Processing,
    Finished,
    Failed,
    Unknown(i64),
}

impl MovieState {
    pub(crate) fn label(self) -> String {
        match self {
            MovieState::Queued => "queued".to_string(),
            MovieState::Processing => "processing".to_string(),
            MovieState::Finished => "finished".to_string(),
            MovieState::Failed => "failed".to_string(),
            MovieState::Unknown(code) => format!("unknown ({code})"),
        }
    }
}

#[derive(Debug, serde::Deserialize)]
pub(crate) struct MovieStatus {
    #[serde(default)]
    status: Option<i64>,
    #[serde(default)]
    pub(crate) title: Option<String>,
    #[serde(default)]
    error: Option<Json>,
}

impl MovieStatus {
    /// `None` when the reply carries no status, e.g. an error-only reply.
    pub(crate) fn state(&self) -> Option<MovieState> {
        let state = match self.status? {
            0 => MovieState::Queued,
            1 => MovieState::Processing,
            2 => MovieState::Finished,
            3 => MovieState::Failed,
            other => MovieState::Unknown(other),
        };
        Some(state)
    }

    pub(crate) fn error_message(&self) -> Option<String> {
        self.error.as_ref().and_then(truthy_message)
    }
}

// Empty strings, `false`, `0` and null do not count as an error.
fn truthy_message(v: &Json) -> Option<String> {
    match v {
        Json::Null | Json::Bool(false) => None,
        Json::String(s) if s.is_empty() => None,
        Json::String(s) => Some(s.clone()),
        Json::Number(n) if n.as_f64() == Some(0.0) => None,
        other => Some(other.to_string()),
    }
}
