mod page;
mod providers;

pub use page::*;
pub use providers::*;

use serde_json::Value;
use strum_macros::IntoStaticStr;

pub const DEFAULT_SCRIPT_FILENAME_FRAGMENT: &str = "announcementbar.js";

#[derive(Clone, Debug, PartialEq, IntoStaticStr)]
#[strum(serialize_all = "lowercase")]
pub enum ConfigurationSource {
    Inline(Value),
    #[strum(serialize = "url")]
    RemoteUrl(String),
    #[strum(serialize = "none")]
    Absent,
}

impl ConfigurationSource {
    pub fn kind(&self) -> &'static str {
        self.into()
    }
}

/// One discovery strategy. Returning `None` passes the turn to the next provider.
pub trait ConfigProvider: Send + Sync {
    fn name(&self) -> &'static str;
    fn provide(&self, page: &PageContext) -> Option<ConfigurationSource>;
}

pub struct Resolver {
    providers: Vec<Box<dyn ConfigProvider>>,
}

impl Resolver {
    pub fn new(providers: Vec<Box<dyn ConfigProvider>>) -> Self {
        Self { providers }
    }

    /// Inline object, then the global URL, then the `data-config` attribute of the embedding script.
    pub fn standard(script_filename_fragment: &str) -> Self {
        Self::new(vec![
            Box::new(InlineObjectProvider),
            Box::new(GlobalUrlProvider),
            Box::new(ScriptAttributeProvider::new(script_filename_fragment.to_owned())),
        ])
    }

    pub fn resolve(&self, page: &PageContext) -> ConfigurationSource {
        self.providers.iter()
            .find_map(|provider| provider.provide(page)
                .inspect(|_| log::debug!("configuration provided by '{}'", provider.name())))
            .unwrap_or_else(|| {
                log::info!("no config found");
                ConfigurationSource::Absent
            })
    }
}

impl std::fmt::Debug for Resolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.providers.iter().map(|provider| provider.name()))
            .finish()
    }
}
