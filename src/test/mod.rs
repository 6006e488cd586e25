
use std::sync::{Arc, Mutex};
use async_trait::async_trait;
use axum::http::StatusCode;
use axum::routing::get;
use tokio::task::JoinHandle;
use crate::domain::TransportError;
use crate::fetcher::{ConfigTransport, TransportResponse};
use crate::sources::{ConfigProvider, ConfigurationSource, PageContext};

const STUB_REQUESTS_POISONED_MSG: &str = "StubTransport request log was poisoned";

/// Replays the same response for every request and remembers the requested URLs.
#[derive(Clone, Debug)]
pub struct StubTransport {
    response: Result<TransportResponse, String>,
    requests: Arc<Mutex<Vec<String>>>,
}

impl StubTransport {
    pub fn ok(body: &str) -> Self {
        Self::status(200, body)
    }

    pub fn status(status: u16, body: &str) -> Self {
        Self::with_response(Ok(TransportResponse::new(status, body.to_owned())))
    }

    pub fn unreachable() -> Self {
        Self::with_response(Err("connection refused".to_owned()))
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().expect(STUB_REQUESTS_POISONED_MSG).clone()
    }

    fn with_response(response: Result<TransportResponse, String>) -> Self {
        Self {
            response,
            requests: Default::default(),
        }
    }
}

#[async_trait]
impl ConfigTransport for StubTransport {
    async fn get(&self, url: &str) -> Result<TransportResponse, TransportError> {
        self.requests.lock().expect(STUB_REQUESTS_POISONED_MSG).push(url.to_owned());
        self.response.clone().map_err(TransportError::message)
    }
}

pub struct FixedProvider(pub ConfigurationSource);

impl ConfigProvider for FixedProvider {
    fn name(&self) -> &'static str {
        "fixed"
    }

    fn provide(&self, _: &PageContext) -> Option<ConfigurationSource> {
        Some(self.0.clone())
    }
}

/// Starts a local server answering every GET of `/config.json` with the given status and body.
pub async fn serve_json(status: StatusCode, body: &'static str) -> (String, JoinHandle<()>) {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await.expect("couldn't bind a local port");
    let addr = listener.local_addr().expect("couldn't get the local address");
    let app = axum::Router::new()
        .route("/config.json", get(move || async move { (status, body) }));
    let handle = tokio::spawn(async move {
        axum::serve(listener, app).await.expect("test server failed");
    });
    (format!("http://{addr}/config.json"), handle)
}
