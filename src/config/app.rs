use std::path::PathBuf;
use anyhow::Context;
use serde_json::Value;
use crate::config::env::*;
use crate::sources::{PageContext, DEFAULT_SCRIPT_FILENAME_FRAGMENT};

static DEMO_PAGE: &str = include_str!("demo.html");

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub inline_config: Option<Value>,
    pub config_url: Option<String>,
    pub host_page: String,
    pub script_filename_fragment: String,
    pub listen_port: u16,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            inline_config: None,
            config_url: None,
            host_page: DEMO_PAGE.to_owned(),
            script_filename_fragment: DEFAULT_SCRIPT_FILENAME_FRAGMENT.to_owned(),
            listen_port: 8080,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let inline_config = get_optional_env_string("ANNOUNCEMENT_CONFIG")?
            .map(|raw| parse_inline_config(&raw));
        let config_url = get_optional_env_string("ANNOUNCEMENT_CONFIG_URL")?;
        let host_page = match get_optional_env_string("HOST_PAGE_PATH")? {
            Some(path) => {
                let path = PathBuf::from(path);
                std::fs::read_to_string(&path)
                    .with_context(|| format!("couldn't read the host page from {}", path.display()))?
            }
            None => {
                log::info!("HOST_PAGE_PATH is not set, serving the demo page");
                DEMO_PAGE.to_owned()
            }
        };
        Ok(Self {
            inline_config,
            config_url,
            host_page,
            script_filename_fragment: get_env_value_or_default("SCRIPT_FILENAME_FRAGMENT",
                                                               DEFAULT_SCRIPT_FILENAME_FRAGMENT.to_owned()),
            listen_port: get_env_value_or_default("LISTEN_PORT", 8080),
        })
    }

    /// The ambient state of the host page as of this page load.
    pub fn page_context(&self) -> PageContext {
        PageContext {
            inline_config: self.inline_config.clone(),
            config_url: self.config_url.clone(),
            scripts: Vec::new(),
        }.with_scripts_from_html(&self.host_page)
    }
}

/// Anything that isn't valid JSON is kept as a plain string, which no provider accepts as an object.
fn parse_inline_config(raw: &str) -> Value {
    serde_json::from_str(raw)
        .unwrap_or_else(|e| {
            log::warn!("ANNOUNCEMENT_CONFIG is not valid JSON ({e}), ignoring it");
            Value::String(raw.to_owned())
        })
}

#[cfg(test)]
mod test {
    use serde_json::json;
    use crate::sources::ScriptTag;
    use super::*;

    #[test]
    fn inline_config_parsing() {
        assert_eq!(parse_inline_config(r#"{"enabled": true, "message": "hi"}"#), json!({"enabled": true, "message": "hi"}));
        assert_eq!(parse_inline_config("enabled=true"), json!("enabled=true"));
    }

    #[test]
    fn demo_page_context() {
        let context = AppConfig::default().page_context();
        assert_eq!(context.inline_config, None);
        assert_eq!(context.config_url, None);
        assert_eq!(context.scripts, vec![ScriptTag {
            src: Some("/utilities/announcementbar.js".to_owned()),
            data_config: None,
        }]);
    }
}
