mod cookies;

pub use cookies::*;

use chrono::Duration;

pub const DISMISSAL_COOKIE_NAME: &str = "lyrdy_announcement_hide";
const DISMISSAL_VALUE: &str = "true";
const DISMISSAL_TTL_DAYS: i64 = 30;

/// Minimal persisted key-value capability the renderer needs.
pub trait KeyValueStore {
    fn get(&self, name: &str) -> Option<String>;
    fn set(&mut self, name: &str, value: &str, ttl: Duration);
}

/// The persisted "user has dismissed the banner" signal.
#[derive(Clone, Debug)]
pub struct DismissalFlag {
    name: String,
    ttl: Duration,
}

impl Default for DismissalFlag {
    fn default() -> Self {
        Self {
            name: DISMISSAL_COOKIE_NAME.to_owned(),
            ttl: Duration::days(DISMISSAL_TTL_DAYS),
        }
    }
}

impl DismissalFlag {
    pub fn is_set(&self, store: &impl KeyValueStore) -> bool {
        store.get(&self.name).is_some_and(|value| value == DISMISSAL_VALUE)
    }

    pub fn set(&self, store: &mut impl KeyValueStore) {
        log::debug!("setting the dismissal flag '{}' for {} days", self.name, self.ttl.num_days());
        store.set(&self.name, DISMISSAL_VALUE, self.ttl)
    }
}

#[cfg(test)]
mod test {
    use chrono::{DateTime, Utc};
    use super::*;

    fn page_load_time() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2024-03-01T12:00:00+00:00")
            .expect("invalid datetime string")
            .into()
    }

    #[test]
    fn absent_by_default() {
        let jar = CookieJar::new(page_load_time());
        assert!(!DismissalFlag::default().is_set(&jar));
    }

    #[test]
    fn only_true_counts() {
        for (header, expected) in [
            ("lyrdy_announcement_hide=true", true),
            ("lyrdy_announcement_hide=false", false),
            ("lyrdy_announcement_hide=", false),
            ("lyrdy_announcement_hide=TRUE", false),
            ("other=1; lyrdy_announcement_hide=true", true),
        ] {
            let jar = CookieJar::from_header(header, page_load_time());
            assert_eq!(DismissalFlag::default().is_set(&jar), expected, "Case: {header}")
        }
    }

    #[test]
    fn set_for_thirty_days() {
        let mut jar = CookieJar::new(page_load_time());
        let flag = DismissalFlag::default();
        flag.set(&mut jar);
        assert!(flag.is_set(&jar));
        assert_eq!(jar.set_cookie_headers(),
                   vec!["lyrdy_announcement_hide=true; expires=Sun, 31 Mar 2024 12:00:00 GMT; path=/"]);

        let later = jar.reopen_at(page_load_time() + Duration::days(29));
        assert!(flag.is_set(&later));
        let expired = jar.reopen_at(page_load_time() + Duration::days(30) + Duration::seconds(1));
        assert!(!flag.is_set(&expired));
    }
}
