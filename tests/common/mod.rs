#![allow(dead_code)]

use helioviewer::{Client, RawResponse, Transport};
use serde_json::Value as Json;
use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::time::Duration;

pub const BASE: &str = "http://helioviewer.test/v2/";

#[derive(Debug, Clone)]
pub struct Call {
    pub url: String,
    pub query: Vec<(String, String)>,
}

impl Call {
    pub fn param(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

/// Replies per endpoint name, in order. The last reply for an endpoint is
/// repeated once the script runs out.
#[derive(Default)]
pub struct Scripted {
    replies: RefCell<HashMap<String, VecDeque<RawResponse>>>,
    calls: RefCell<Vec<Call>>,
}

impl Scripted {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(self, endpoint: &str, status: u16, body: impl Into<Vec<u8>>) -> Self {
        self.replies
            .borrow_mut()
            .entry(endpoint.to_string())
            .or_default()
            .push_back(RawResponse {
                status,
                body: body.into(),
            });
        self
    }

    pub fn json(self, endpoint: &str, body: Json) -> Self {
        self.reply(endpoint, 200, body.to_string())
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub fn calls_to(&self, endpoint: &str) -> Vec<Call> {
        let suffix = format!("/{endpoint}/");
        self.calls()
            .into_iter()
            .filter(|c| c.url.ends_with(&suffix))
            .collect()
    }
}

impl Transport for Scripted {
    fn get(&self, url: &str, query: &[(&str, String)]) -> anyhow::Result<RawResponse> {
        self.calls.borrow_mut().push(Call {
            url: url.to_string(),
            query: query
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect(),
        });

        let endpoint = url
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .unwrap_or_default()
            .to_string();
        let mut replies = self.replies.borrow_mut();
        let queue = replies
            .get_mut(&endpoint)
            .ok_or_else(|| anyhow::anyhow!("no scripted reply for {endpoint}"))?;
        let reply = if queue.len() > 1 {
            queue.pop_front()
        } else {
            queue.front().cloned()
        };
        reply.ok_or_else(|| anyhow::anyhow!("empty script for {endpoint}"))
    }
}

pub fn client(transport: Scripted) -> Client<Scripted> {
    Client::with_transport(transport)
        .with_api_url(BASE)
        .with_poll_interval(Duration::from_millis(1))
        .with_progress(false)
}
