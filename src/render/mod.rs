mod html;

pub use html::*;

use derive_more::Display;
use crate::domain::AnnouncementConfig;
use crate::metrics;
use crate::store::{DismissalFlag, KeyValueStore};

pub const BODY_MARKER_CLASS: &str = "has-announcement";
const DISMISS_LABEL: &str = "Close announcement";
const DISMISS_SYMBOL: &str = "✕";
static STYLESHEET: &str = include_str!("announcement.css");

#[derive(Copy, Clone, Debug, Display, PartialEq, Eq, Hash)]
#[display("BannerId({_0})")]
pub struct BannerId(pub(crate) usize);

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DismissControl {
    pub label: String,
    pub symbol: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Banner {
    pub message: String,
    pub dismiss: Option<DismissControl>,
}

/// The page capabilities the renderer needs. Implementations must treat the message as literal text.
pub trait PresentationSurface {
    fn inject_stylesheet(&mut self, css: &str);
    fn mount_banner(&mut self, banner: Banner) -> BannerId;
    fn hide_banner(&mut self, id: BannerId);
    fn add_body_class(&mut self, class: &str);
    fn remove_body_class(&mut self, class: &str);
}

#[derive(Clone, Debug, Default)]
pub struct Renderer {
    flag: DismissalFlag,
}

impl Renderer {
    /// The server side of a dismissal: the banner is already gone with the page that posted it,
    /// so only the preference is stored.
    pub fn record_dismissal(&self, store: &mut impl KeyValueStore) {
        record_dismissal(&self.flag, store)
    }

    pub fn render(&self, config: &AnnouncementConfig,
                  surface: &mut impl PresentationSurface, store: &impl KeyValueStore) -> Option<MountedBanner> {
        if !config.enabled {
            log::info!("announcement bar disabled");
            metrics::BANNER_RENDER_COUNTER.disabled.inc();
            return None
        }
        if config.hideable && self.flag.is_set(store) {
            log::info!("announcement bar hidden by user preference");
            metrics::BANNER_RENDER_COUNTER.dismissed.inc();
            return None
        }

        log::info!("showing announcement bar");
        surface.inject_stylesheet(STYLESHEET);
        let dismiss = config.hideable.then(|| DismissControl {
            label: DISMISS_LABEL.to_owned(),
            symbol: DISMISS_SYMBOL.to_owned(),
        });
        let id = surface.mount_banner(Banner {
            message: config.message.clone(),
            dismiss,
        });
        surface.add_body_class(BODY_MARKER_CLASS);
        metrics::BANNER_RENDER_COUNTER.shown.inc();

        Some(MountedBanner {
            id,
            hideable: config.hideable,
            flag: self.flag.clone(),
        })
    }
}

/// A banner that is on the page right now.
#[derive(Clone, Debug)]
pub struct MountedBanner {
    id: BannerId,
    hideable: bool,
    flag: DismissalFlag,
}

impl MountedBanner {
    pub fn id(&self) -> BannerId {
        self.id
    }

    pub fn is_hideable(&self) -> bool {
        self.hideable
    }

    /// What activating the dismiss control does. Repeating it changes nothing visible.
    pub fn dismiss(&self, surface: &mut impl PresentationSurface, store: &mut impl KeyValueStore) {
        if !self.hideable {
            log::warn!("{} has no dismiss control", self.id);
            return
        }
        surface.hide_banner(self.id);
        surface.remove_body_class(BODY_MARKER_CLASS);
        record_dismissal(&self.flag, store);
    }
}

fn record_dismissal(flag: &DismissalFlag, store: &mut impl KeyValueStore) {
    flag.set(store);
    metrics::BANNER_DISMISS_COUNTER.inc();
}

#[cfg(test)]
mod test {
    use chrono::Utc;
    use crate::store::CookieJar;
    use super::*;

    const HOST: &str = "<html><head><title>t</title></head><body><p>content</p></body></html>";

    fn config(enabled: bool, hideable: bool) -> AnnouncementConfig {
        AnnouncementConfig::new(enabled, "Hello & welcome".to_owned(), hideable)
    }

    fn dismissed_jar() -> CookieJar {
        CookieJar::from_header("lyrdy_announcement_hide=true", Utc::now())
    }

    #[test]
    fn disabled_is_noop() {
        let renderer = Renderer::default();
        for hideable in [false, true] {
            for jar in [CookieJar::new(Utc::now()), dismissed_jar()] {
                let mut page = HtmlPage::new(HOST);
                assert!(renderer.render(&config(false, hideable), &mut page, &jar).is_none());
                assert!(page.is_untouched());
                assert_eq!(page.to_html().expect("render failed"), HOST);
            }
        }
    }

    #[test]
    fn dismissed_hideable_is_noop() {
        let mut page = HtmlPage::new(HOST);
        assert!(Renderer::default().render(&config(true, true), &mut page, &dismissed_jar()).is_none());
        assert!(page.is_untouched());
    }

    #[test]
    fn dismissal_ignored_for_permanent_banners() {
        let mut page = HtmlPage::new(HOST);
        let mounted = Renderer::default().render(&config(true, false), &mut page, &dismissed_jar())
            .expect("banner must be shown");
        assert!(!mounted.is_hideable());
        assert_eq!(page.banners()[0].banner.dismiss, None);
    }

    #[test]
    fn shown_with_marker() {
        let mut page = HtmlPage::new(HOST);
        let mounted = Renderer::default().render(&config(true, true), &mut page, &CookieJar::new(Utc::now()))
            .expect("banner must be shown");
        assert_eq!(page.banners().len(), 1);
        let mounted_banner = &page.banners()[0];
        assert_eq!(mounted_banner.banner.message, "Hello & welcome");
        assert_eq!(mounted_banner.banner.dismiss.as_ref().map(|d| d.label.as_str()), Some("Close announcement"));
        assert!(!mounted_banner.hidden);
        assert_eq!(page.stylesheets().len(), 1);
        assert!(page.has_body_class(BODY_MARKER_CLASS));
        assert_eq!(mounted.id(), mounted_banner.id);
    }

    #[test]
    fn dismiss_is_idempotent() {
        let mut page = HtmlPage::new(HOST);
        let mut jar = CookieJar::new(Utc::now());
        let renderer = Renderer::default();
        let mounted = renderer.render(&config(true, true), &mut page, &jar)
            .expect("banner must be shown");

        mounted.dismiss(&mut page, &mut jar);
        let after_first = page.clone();
        mounted.dismiss(&mut page, &mut jar);

        assert_eq!(page, after_first);
        assert!(page.banners()[0].hidden);
        assert!(!page.has_body_class(BODY_MARKER_CLASS));
        assert!(DismissalFlag::default().is_set(&jar));
        assert_eq!(jar.set_cookie_headers().len(), 1);

        let mut next_page = HtmlPage::new(HOST);
        assert!(renderer.render(&config(true, true), &mut next_page, &jar.reopen_at(Utc::now())).is_none());
        assert!(next_page.is_untouched());
    }

    #[test]
    fn recorded_dismissal_hides_next_render() {
        let renderer = Renderer::default();
        let mut jar = CookieJar::new(Utc::now());
        let dismissals_before = metrics::BANNER_DISMISS_COUNTER.get();

        renderer.record_dismissal(&mut jar);

        assert!(metrics::BANNER_DISMISS_COUNTER.get() > dismissals_before);
        assert_eq!(jar.set_cookie_headers().len(), 1);
        let mut page = HtmlPage::new(HOST);
        assert!(renderer.render(&config(true, true), &mut page, &jar.reopen_at(Utc::now())).is_none());
        assert!(page.is_untouched());
    }

    #[test]
    fn permanent_banner_cannot_be_dismissed() {
        let mut page = HtmlPage::new(HOST);
        let mut jar = CookieJar::new(Utc::now());
        let mounted = Renderer::default().render(&config(true, false), &mut page, &jar)
            .expect("banner must be shown");
        mounted.dismiss(&mut page, &mut jar);
        assert!(!page.banners()[0].hidden);
        assert!(jar.set_cookie_headers().is_empty());
    }
}
