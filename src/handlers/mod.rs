mod page;
mod dismiss;

pub use page::*;
pub use dismiss::*;

use std::sync::Arc;
use axum::http::header::COOKIE;
use axum::http::HeaderMap;
use axum::routing::{get, post};
use axum::Router;
use crate::config::AppConfig;
use crate::fetcher::{ConfigTransport, RemoteConfigFetcher};
use crate::render::{Renderer, DISMISS_ACTION};
use crate::sources::Resolver;

/// Shared by every page load. Only immutable settings and the HTTP client live here.
pub struct AppState<T> {
    inner: Arc<Dependencies<T>>,
}

struct Dependencies<T> {
    config: AppConfig,
    resolver: Resolver,
    fetcher: RemoteConfigFetcher<T>,
    renderer: Renderer,
}

impl<T> Clone for AppState<T> {
    fn clone(&self) -> Self {
        Self { inner: self.inner.clone() }
    }
}

impl<T: ConfigTransport> AppState<T> {
    pub fn new(config: AppConfig, transport: T) -> Self {
        log::info!("embedding script is matched by '{}'", config.script_filename_fragment);
        let resolver = Resolver::standard(&config.script_filename_fragment);
        Self {
            inner: Arc::new(Dependencies {
                config,
                resolver,
                fetcher: RemoteConfigFetcher::new(transport),
                renderer: Renderer::default(),
            })
        }
    }
}

pub fn router<T: ConfigTransport + 'static>(state: AppState<T>) -> Router {
    Router::new()
        .route("/", get(page_handler::<T>))
        .route(DISMISS_ACTION, post(dismiss_handler::<T>))
        .with_state(state)
}

fn cookie_header(headers: &HeaderMap) -> String {
    headers.get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str()
            .inspect_err(|e| log::warn!("skipping a non-ASCII Cookie header: {e}"))
            .ok())
        .collect::<Vec<_>>()
        .join("; ")
}
