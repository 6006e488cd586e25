use derive_more::Constructor;

const FALLBACK_MESSAGE: &str = "You haven't configured your announcement bar yet! Add data-config attribute to your script tag.";

/// Display settings of the banner after all coercions have been applied.
#[derive(Clone, Debug, PartialEq, Eq, Constructor)]
pub struct AnnouncementConfig {
    pub enabled: bool,
    pub message: String,
    pub hideable: bool,
}

impl AnnouncementConfig {
    /// Shown whenever no valid configuration can be determined.
    pub fn fallback() -> Self {
        Self {
            enabled: true,
            message: FALLBACK_MESSAGE.to_owned(),
            hideable: true,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn fallback_is_visible_and_hideable() {
        let config = AnnouncementConfig::fallback();
        assert!(config.enabled);
        assert!(config.hideable);
        assert!(config.message.contains("data-config"));
    }
}
