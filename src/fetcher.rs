use async_trait::async_trait;
use derive_more::Constructor;
use crate::domain::{normalize, AnnouncementConfig, AnnouncementError, TransportError};
use crate::metrics;

#[derive(Clone, Debug, Constructor)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
}

impl TransportResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// A single GET of the configuration document, nothing else.
#[async_trait]
pub trait ConfigTransport: Send + Sync {
    async fn get(&self, url: &str) -> Result<TransportResponse, TransportError>;
}

#[async_trait]
impl ConfigTransport for reqwest::Client {
    async fn get(&self, url: &str) -> Result<TransportResponse, TransportError> {
        let response = reqwest::Client::get(self, url)
            .send()
            .await
            .map_err(TransportError::message)?;
        let status = response.status().as_u16();
        let body = response.text()
            .await
            .map_err(TransportError::message)?;
        Ok(TransportResponse { status, body })
    }
}

#[derive(Clone, Debug, Constructor)]
pub struct RemoteConfigFetcher<T> {
    transport: T,
}

impl<T: ConfigTransport> RemoteConfigFetcher<T> {
    /// Always yields something displayable: any failure turns into the fallback configuration.
    pub async fn fetch_config(&self, url: &str) -> AnnouncementConfig {
        log::info!("fetching config from {url}");
        match self.try_fetch(url).await {
            Ok(config) => {
                log::info!("using config {config:?}");
                config
            }
            Err(e) => {
                log::error!("{e}");
                metrics::CONFIG_FALLBACK_COUNTER.inc();
                AnnouncementConfig::fallback()
            }
        }
    }

    async fn try_fetch(&self, url: &str) -> Result<AnnouncementConfig, AnnouncementError> {
        let response = self.transport.get(url).await?;
        if !response.is_success() {
            return Err(AnnouncementError::FetchFailure { status: response.status })
        }
        let raw: serde_json::Value = serde_json::from_str(&response.body)?;
        log::debug!("loaded config {raw}");
        Ok(normalize(&raw)?)
    }
}
