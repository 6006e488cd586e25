use std::collections::HashMap;
use chrono::{DateTime, Duration, Utc};
use crate::store::KeyValueStore;

const EXPIRES_FORMAT: &str = "%a, %d %b %Y %H:%M:%S GMT";

#[derive(Clone, Debug, PartialEq)]
struct Cookie {
    value: String,
    expires: Option<DateTime<Utc>>,
}

/// Cookies visible to a single page load.
///
/// Cookies sent by the browser carry no expiration. The ones set during the load
/// remember it and are reported back by [`CookieJar::set_cookie_headers`].
#[derive(Clone, Debug)]
pub struct CookieJar {
    now: DateTime<Utc>,
    cookies: HashMap<String, Cookie>,
    pending: Vec<String>,
}

impl CookieJar {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            now,
            cookies: HashMap::new(),
            pending: Vec::new(),
        }
    }

    pub fn from_header(header: &str, now: DateTime<Utc>) -> Self {
        let mut jar = Self::new(now);
        let pairs = header.split(';')
            .map(str::trim)
            .filter_map(|pair| pair.split_once('='))
            .filter(|(name, _)| !name.is_empty());
        for (name, value) in pairs {
            jar.cookies.entry(name.to_owned())
                .or_insert_with(|| Cookie { value: value.to_owned(), expires: None });
        }
        jar
    }

    /// Same cookies as seen by a later page load.
    pub fn reopen_at(&self, now: DateTime<Utc>) -> Self {
        Self {
            now,
            cookies: self.cookies.clone(),
            pending: Vec::new(),
        }
    }

    pub fn set_cookie_headers(&self) -> Vec<String> {
        self.pending.iter()
            .filter_map(|name| self.cookies.get(name).map(|cookie| (name, cookie)))
            .map(|(name, cookie)| match cookie.expires {
                Some(expires) => format!("{name}={}; expires={}; path=/", cookie.value, expires.format(EXPIRES_FORMAT)),
                None => format!("{name}={}; path=/", cookie.value),
            })
            .collect()
    }

    fn is_alive(&self, cookie: &Cookie) -> bool {
        cookie.expires.map_or(true, |expires| self.now < expires)
    }
}

impl KeyValueStore for CookieJar {
    fn get(&self, name: &str) -> Option<String> {
        self.cookies.get(name)
            .filter(|cookie| self.is_alive(cookie))
            .map(|cookie| cookie.value.clone())
    }

    fn set(&mut self, name: &str, value: &str, ttl: Duration) {
        self.cookies.insert(name.to_owned(), Cookie {
            value: value.to_owned(),
            expires: Some(self.now + ttl),
        });
        if !self.pending.iter().any(|pending| pending == name) {
            self.pending.push(name.to_owned());
        }
    }
}
