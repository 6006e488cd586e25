use scraper::{Html, Selector};
use serde_json::Value;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ScriptTag {
    pub src: Option<String>,
    pub data_config: Option<String>,
}

/// Everything the host page exposes to the banner, captured once per page load.
#[derive(Clone, Debug, Default)]
pub struct PageContext {
    pub inline_config: Option<Value>,
    pub config_url: Option<String>,
    pub scripts: Vec<ScriptTag>,
}

impl PageContext {
    pub fn with_scripts_from_html(mut self, html: &str) -> Self {
        self.scripts = extract_script_tags(html);
        self
    }
}

/// Script elements as a browser would see them: commented-out markup is skipped and attribute entities are decoded.
pub fn extract_script_tags(html: &str) -> Vec<ScriptTag> {
    let selector = match Selector::parse("script") {
        Ok(selector) => selector,
        Err(e) => {
            log::error!("couldn't build the script selector: {e}");
            return Vec::new()
        }
    };
    Html::parse_document(html)
        .select(&selector)
        .map(|element| ScriptTag {
            src: element.value().attr("src").map(str::to_owned),
            data_config: element.value().attr("data-config").map(str::to_owned),
        })
        .collect()
}
