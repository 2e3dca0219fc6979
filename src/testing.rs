//! In-memory transport and authenticator used by unit tests.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::auth::Authenticator;
use crate::error::{ContentApiError, Result};
use crate::request::{Headers, Options};
use crate::transport::{HttpTransport, RawResponse};

#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub url: String,
    pub headers: Headers,
}

enum Scripted {
    Respond(RawResponse),
    Fail,
}

#[derive(Default)]
struct TransportState {
    routes: HashMap<String, VecDeque<Scripted>>,
    sticky: HashMap<String, RawResponse>,
    calls: Vec<RecordedCall>,
}

/// Transport answering from per-path scripts.
///
/// Scripted responses for a path are consumed in order; `always` responses
/// never run out. Unknown paths answer 404.
#[derive(Clone, Default)]
pub struct StubTransport {
    state: Arc<Mutex<TransportState>>,
}

impl StubTransport {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(self, path: &str, scripted: Scripted) -> Self {
        self.state
            .lock()
            .unwrap()
            .routes
            .entry(path.to_string())
            .or_default()
            .push_back(scripted);
        self
    }

    pub fn respond(self, path: &str, status: u16, body: &str) -> Self {
        self.push(
            path,
            Scripted::Respond(RawResponse {
                status,
                body: body.to_string(),
                headers: Headers::new(),
            }),
        )
    }

    pub fn respond_json(self, path: &str, body: serde_json::Value) -> Self {
        self.respond(path, 200, &body.to_string())
    }

    pub fn always(self, path: &str, status: u16, body: &str) -> Self {
        self.state.lock().unwrap().sticky.insert(
            path.to_string(),
            RawResponse {
                status,
                body: body.to_string(),
                headers: Headers::new(),
            },
        );
        self
    }

    pub fn fail(self, path: &str) -> Self {
        self.push(path, Scripted::Fail)
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn paths(&self) -> Vec<String> {
        self.calls()
            .iter()
            .filter_map(|c| url::Url::parse(&c.url).ok())
            .map(|u| u.path().to_string())
            .collect()
    }
}

#[async_trait]
impl HttpTransport for StubTransport {
    async fn send(&self, url: &str, headers: &Headers, _options: &Options) -> Result<RawResponse> {
        let path = url::Url::parse(url)?.path().to_string();
        let mut state = self.state.lock().unwrap();
        state.calls.push(RecordedCall {
            url: url.to_string(),
            headers: headers.clone(),
        });

        if let Some(next) = state.routes.get_mut(&path).and_then(VecDeque::pop_front) {
            return match next {
                Scripted::Respond(response) => Ok(response),
                Scripted::Fail => Err(ContentApiError::InvalidArgument(format!(
                    "connection refused: {url}"
                ))),
            };
        }
        if let Some(response) = state.sticky.get(&path) {
            return Ok(response.clone());
        }
        Ok(RawResponse {
            status: 404,
            body: r#"{"_message": "not found"}"#.to_string(),
            headers: Headers::new(),
        })
    }
}

/// Authenticator handing out `token-1`, `token-2`, ... on each fetch.
#[derive(Clone, Default)]
pub struct StubAuthenticator {
    fetches: Arc<AtomicUsize>,
    base_url: Arc<Mutex<Option<String>>>,
    token: Option<String>,
    fail_from: Option<usize>,
}

impl StubAuthenticator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self::failing_from(1)
    }

    /// Hand out tokens until the `nth` fetch, which fails along with every
    /// fetch after it.
    pub fn failing_from(nth: usize) -> Self {
        Self {
            fail_from: Some(nth),
            ..Self::default()
        }
    }

    pub fn with_token(token: &str) -> Self {
        Self {
            token: Some(token.to_string()),
            ..Self::default()
        }
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    pub fn base_url(&self) -> Option<String> {
        self.base_url.lock().unwrap().clone()
    }
}

#[async_trait]
impl Authenticator for StubAuthenticator {
    fn access_token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    fn set_base_url(&mut self, base_url: &str) {
        *self.base_url.lock().unwrap() = Some(base_url.to_string());
    }

    async fn fetch_tokens(&mut self) -> Result<()> {
        let n = self.fetches.fetch_add(1, Ordering::SeqCst) + 1;
        if self.fail_from.is_some_and(|nth| n >= nth) {
            return Err(ContentApiError::Authentication("invalid credentials".to_string()));
        }
        self.token = Some(format!("token-{n}"));
        Ok(())
    }
}
