//! Shared test helpers: a recording transport with scripted responses.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use artrm_core::auth::AuthDetails;
use artrm_core::config::ServiceConfig;
use artrm_core::service::ServiceManager;
use artrm_core::transport::{HttpResponse, Transport, TransportError};
use async_trait::async_trait;
use reqwest::StatusCode;
use reqwest::header::HeaderMap;

pub const BASE_URL: &str = "https://artifactory.example.com/artifactory/";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Delete,
}

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: Method,
    pub url: String,
    pub headers: HeaderMap,
    pub body: Option<String>,
}

type Scripted = Result<HttpResponse, TransportError>;

#[derive(Debug, Default)]
struct State {
    requests: Vec<RecordedRequest>,
    get: VecDeque<Scripted>,
    post: VecDeque<Scripted>,
    delete: VecDeque<Scripted>,
}

/// Records every request. Deletes default to 204; GET/POST need a scripted
/// response.
#[derive(Debug, Default)]
pub struct MockTransport {
    state: Mutex<State>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_get(&self, status: StatusCode, body: &str) -> &Self {
        self.state
            .lock()
            .unwrap()
            .get
            .push_back(Ok(HttpResponse::new(status, body)));
        self
    }

    pub fn on_post(&self, status: StatusCode, body: &str) -> &Self {
        self.state
            .lock()
            .unwrap()
            .post
            .push_back(Ok(HttpResponse::new(status, body)));
        self
    }

    pub fn on_post_error(&self, error: TransportError) -> &Self {
        self.state.lock().unwrap().post.push_back(Err(error));
        self
    }

    pub fn on_delete(&self, status: StatusCode, body: &str) -> &Self {
        self.state
            .lock()
            .unwrap()
            .delete
            .push_back(Ok(HttpResponse::new(status, body)));
        self
    }

    pub fn on_delete_error(&self, error: TransportError) -> &Self {
        self.state.lock().unwrap().delete.push_back(Err(error));
        self
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.lock().unwrap().requests.clone()
    }

    pub fn requests_of(&self, method: Method) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.method == method)
            .collect()
    }

    pub fn deleted_urls(&self) -> Vec<String> {
        self.requests_of(Method::Delete)
            .into_iter()
            .map(|r| r.url)
            .collect()
    }

    fn record(&self, method: Method, url: &str, headers: &HeaderMap, body: Option<String>) -> Scripted {
        let mut state = self.state.lock().unwrap();
        state.requests.push(RecordedRequest {
            method,
            url: url.to_string(),
            headers: headers.clone(),
            body,
        });
        let queue = match method {
            Method::Get => &mut state.get,
            Method::Post => &mut state.post,
            Method::Delete => &mut state.delete,
        };
        match queue.pop_front() {
            Some(scripted) => scripted,
            None if method == Method::Delete => Ok(HttpResponse::new(StatusCode::NO_CONTENT, "")),
            None => Err(TransportError::request(url, "no scripted response")),
        }
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send_get(&self, url: &str, headers: &HeaderMap) -> Result<HttpResponse, TransportError> {
        self.record(Method::Get, url, headers, None)
    }

    async fn send_post(
        &self,
        url: &str,
        headers: &HeaderMap,
        body: String,
    ) -> Result<HttpResponse, TransportError> {
        self.record(Method::Post, url, headers, Some(body))
    }

    async fn send_delete(
        &self,
        url: &str,
        headers: &HeaderMap,
    ) -> Result<HttpResponse, TransportError> {
        self.record(Method::Delete, url, headers, None)
    }
}

pub fn config(dry_run: bool) -> ServiceConfig {
    ServiceConfig::builder()
        .url(BASE_URL)
        .auth(AuthDetails::basic("admin", "password"))
        .dry_run(dry_run)
        .build()
        .expect("valid test config")
}

pub fn manager(dry_run: bool) -> (Arc<MockTransport>, ServiceManager) {
    let transport = Arc::new(MockTransport::new());
    let manager = ServiceManager::with_transport(config(dry_run), transport.clone());
    (transport, manager)
}

/// AQL response body for `(repo, path, name, type)` tuples.
pub fn aql_body(entries: &[(&str, &str, &str, &str)]) -> String {
    let results: Vec<serde_json::Value> = entries
        .iter()
        .map(|(repo, path, name, kind)| {
            serde_json::json!({
                "repo": repo,
                "path": path,
                "name": name,
                "type": kind,
                "size": 1,
            })
        })
        .collect();
    serde_json::json!({ "results": results }).to_string()
}
