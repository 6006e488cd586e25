use std::borrow::Cow;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde::Serialize;
use tinytemplate::TinyTemplate;
use crate::render::{Banner, BannerId, PresentationSurface};

pub const DISMISS_ACTION: &str = "/announcement/dismiss";

static BANNER_TEMPLATE: &str = include_str!("banner.html");
const BANNER_TEMPLATE_NAME: &str = "banner";

static HEAD_CLOSE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)</head\s*>").expect("invalid head regex"));
static BODY_OPEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?is)<body\b([^>]*)>").expect("invalid body regex"));
static BODY_CLOSE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)</body\s*>").expect("invalid body regex"));
static CLASS_ATTR: Lazy<Regex> = Lazy::new(|| Regex::new(r#"(?i)(^|\s)class\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'>]+))"#)
    .expect("invalid class regex"));
static DOCTYPE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^\s*<!doctype[^>]*>").expect("invalid doctype regex"));

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PageBanner {
    pub id: BannerId,
    pub banner: Banner,
    pub hidden: bool,
}

/// A host HTML document together with the changes made to it during the current page load.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HtmlPage {
    source: String,
    stylesheets: Vec<String>,
    banners: Vec<PageBanner>,
    body_classes: Vec<String>,
}

#[derive(Serialize)]
struct BannerContext<'a> {
    id: String,
    message: &'a str,
    hidden: bool,
    dismiss: Option<DismissContext<'a>>,
}

#[derive(Serialize)]
struct DismissContext<'a> {
    action: &'a str,
    label: &'a str,
    symbol: &'a str,
}

impl HtmlPage {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            stylesheets: Vec::new(),
            banners: Vec::new(),
            body_classes: Vec::new(),
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn stylesheets(&self) -> &[String] {
        &self.stylesheets
    }

    pub fn banners(&self) -> &[PageBanner] {
        &self.banners
    }

    pub fn has_body_class(&self, class: &str) -> bool {
        self.body_classes.iter().any(|c| c == class)
    }

    pub fn is_untouched(&self) -> bool {
        self.stylesheets.is_empty() && self.banners.is_empty() && self.body_classes.is_empty()
    }

    pub fn to_html(&self) -> Result<String, tinytemplate::error::Error> {
        if self.is_untouched() {
            return Ok(self.source.clone())
        }
        let html = self.with_body_classes(&self.source);
        let html = insert_before_last(&html, &BODY_CLOSE, &self.render_banners()?);
        let styles: String = self.stylesheets.iter()
            .map(|css| format!("<style>\n{css}</style>\n"))
            .collect();
        Ok(insert_stylesheets(&html, &styles))
    }

    fn render_banners(&self) -> Result<String, tinytemplate::error::Error> {
        let mut tt = TinyTemplate::new();
        tt.add_template(BANNER_TEMPLATE_NAME, BANNER_TEMPLATE)?;
        self.banners.iter()
            .map(|page_banner| {
                let context = BannerContext {
                    id: format!("announcement-bar-{}", page_banner.id.0),
                    message: &page_banner.banner.message,
                    hidden: page_banner.hidden,
                    dismiss: page_banner.banner.dismiss.as_ref().map(|control| DismissContext {
                        action: DISMISS_ACTION,
                        label: &control.label,
                        symbol: &control.symbol,
                    }),
                };
                tt.render(BANNER_TEMPLATE_NAME, &context)
            })
            .collect()
    }

    fn with_body_classes<'a>(&self, html: &'a str) -> Cow<'a, str> {
        if self.body_classes.is_empty() {
            return Cow::Borrowed(html)
        }
        if !BODY_OPEN.is_match(html) {
            log::debug!("the host page has no <body> tag, classes {:?} are dropped", self.body_classes);
        }
        BODY_OPEN.replacen(html, 1, |caps: &Captures| {
            let attrs = &caps[1];
            match CLASS_ATTR.captures(attrs) {
                Some(class_caps) => {
                    let existing = class_caps.get(2).or(class_caps.get(3)).or(class_caps.get(4))
                        .map_or("", |m| m.as_str());
                    let mut classes: Vec<&str> = existing.split_whitespace().collect();
                    for class in &self.body_classes {
                        if !classes.contains(&class.as_str()) {
                            classes.push(class);
                        }
                    }
                    let whole = class_caps.get(0).map_or(0..0, |m| m.range());
                    format!("<body{}{}class=\"{}\"{}>", &attrs[..whole.start], &class_caps[1],
                            classes.join(" "), &attrs[whole.end..])
                }
                None => format!("<body{attrs} class=\"{}\">", self.body_classes.join(" ")),
            }
        })
    }
}

impl PresentationSurface for HtmlPage {
    fn inject_stylesheet(&mut self, css: &str) {
        self.stylesheets.push(css.to_owned());
    }

    fn mount_banner(&mut self, banner: Banner) -> BannerId {
        let id = BannerId(self.banners.len());
        self.banners.push(PageBanner { id, banner, hidden: false });
        id
    }

    fn hide_banner(&mut self, id: BannerId) {
        match self.banners.iter_mut().find(|page_banner| page_banner.id == id) {
            Some(page_banner) => page_banner.hidden = true,
            None => log::warn!("{id} is not mounted on this page"),
        }
    }

    fn add_body_class(&mut self, class: &str) {
        if !self.has_body_class(class) {
            self.body_classes.push(class.to_owned());
        }
    }

    fn remove_body_class(&mut self, class: &str) {
        self.body_classes.retain(|c| c != class);
    }
}

/// Styles go into the head; without one they follow the doctype so the page keeps its rendering mode.
fn insert_stylesheets(html: &str, styles: &str) -> String {
    if let Some(m) = HEAD_CLOSE.find(html) {
        format!("{}{styles}{}", &html[..m.start()], &html[m.start()..])
    } else if let Some(m) = DOCTYPE.find(html) {
        format!("{}\n{styles}{}", &html[..m.end()], &html[m.end()..])
    } else {
        format!("{styles}{html}")
    }
}

fn insert_before_last(html: &str, tag: &Regex, fragment: &str) -> String {
    match tag.find_iter(html).last() {
        Some(m) => format!("{}{fragment}{}", &html[..m.start()], &html[m.start()..]),
        None => format!("{html}{fragment}"),
    }
}
