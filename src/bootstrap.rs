use derive_more::Display;
use tokio::sync::watch;
use crate::domain::{normalize_or_fallback, AnnouncementConfig};
use crate::fetcher::{ConfigTransport, RemoteConfigFetcher};
use crate::metrics;
use crate::render::{MountedBanner, PresentationSurface, Renderer};
use crate::sources::{ConfigurationSource, PageContext, Resolver};
use crate::store::KeyValueStore;

#[derive(Copy, Clone, Debug, Display, PartialEq, Eq)]
pub enum ReadyState {
    Loading,
    Ready,
}

#[derive(Debug)]
pub enum Outcome {
    Rendered(MountedBanner),
    Skipped,
}

impl Outcome {
    pub fn mounted(self) -> Option<MountedBanner> {
        match self {
            Outcome::Rendered(banner) => Some(banner),
            Outcome::Skipped => None,
        }
    }
}

impl From<Option<MountedBanner>> for Outcome {
    fn from(value: Option<MountedBanner>) -> Self {
        value.map_or(Outcome::Skipped, Outcome::Rendered)
    }
}

/// Everything a single page load needs. `run` takes `self`, so the pipeline
/// resolves and renders at most once.
#[derive(Debug)]
pub struct Bootstrap<'a, T> {
    resolver: &'a Resolver,
    fetcher: &'a RemoteConfigFetcher<T>,
    renderer: &'a Renderer,
}

impl<'a, T: ConfigTransport> Bootstrap<'a, T> {
    pub fn new(resolver: &'a Resolver, fetcher: &'a RemoteConfigFetcher<T>, renderer: &'a Renderer) -> Self {
        Self { resolver, fetcher, renderer }
    }

    pub async fn run(self, readiness: watch::Receiver<ReadyState>, page: &PageContext,
                     surface: &mut impl PresentationSurface, store: &impl KeyValueStore) -> Outcome {
        wait_until_ready(readiness).await;
        let config = self.resolve_config(page).await;
        self.renderer.render(&config, surface, store).into()
    }

    async fn resolve_config(&self, page: &PageContext) -> AnnouncementConfig {
        let source = self.resolver.resolve(page);
        metrics::CONFIG_SOURCE_COUNTER.for_kind(source.kind()).inc();
        match source {
            ConfigurationSource::Absent => {
                log::info!("no config found, using fallback");
                AnnouncementConfig::fallback()
            }
            ConfigurationSource::Inline(raw) => {
                log::info!("using inline config {raw}");
                let config = normalize_or_fallback(&raw);
                log::info!("using config {config:?}");
                config
            }
            ConfigurationSource::RemoteUrl(url) => self.fetcher.fetch_config(&url).await,
        }
    }
}

async fn wait_until_ready(mut readiness: watch::Receiver<ReadyState>) {
    if *readiness.borrow_and_update() == ReadyState::Ready {
        return
    }
    log::debug!("the document is still loading, deferring until it's ready");
    if readiness.wait_for(|state| *state == ReadyState::Ready).await.is_err() {
        log::warn!("the readiness signal is gone, treating the document as ready");
    }
}
