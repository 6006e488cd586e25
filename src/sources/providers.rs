use derive_more::Constructor;
use crate::domain::is_object_like;
use crate::sources::{ConfigProvider, ConfigurationSource, PageContext};

#[derive(Debug)]
pub struct InlineObjectProvider;

impl ConfigProvider for InlineObjectProvider {
    fn name(&self) -> &'static str {
        "inline-object"
    }

    fn provide(&self, page: &PageContext) -> Option<ConfigurationSource> {
        page.inline_config.as_ref()
            .filter(|value| is_object_like(value))
            .map(|value| {
                log::info!("found inline config object");
                ConfigurationSource::Inline(value.clone())
            })
    }
}

#[derive(Debug)]
pub struct GlobalUrlProvider;

impl ConfigProvider for GlobalUrlProvider {
    fn name(&self) -> &'static str {
        "global-url"
    }

    fn provide(&self, page: &PageContext) -> Option<ConfigurationSource> {
        page.config_url.as_ref()
            .filter(|url| !url.is_empty())
            .map(|url| {
                log::info!("using global config URL: {url}");
                ConfigurationSource::RemoteUrl(url.clone())
            })
    }
}

/// Looks for the `data-config` attribute on the script tag that embeds the banner.
#[derive(Debug, Constructor)]
pub struct ScriptAttributeProvider {
    filename_fragment: String,
}

impl ConfigProvider for ScriptAttributeProvider {
    fn name(&self) -> &'static str {
        "script-attribute"
    }

    fn provide(&self, page: &PageContext) -> Option<ConfigurationSource> {
        page.scripts.iter()
            .filter(|script| script.src.as_deref()
                .is_some_and(|src| src.contains(self.filename_fragment.as_str())))
            .find_map(|script| script.data_config.as_ref().filter(|url| !url.is_empty()))
            .map(|url| {
                log::info!("using data-config: {url}");
                ConfigurationSource::RemoteUrl(url.clone())
            })
    }
}
