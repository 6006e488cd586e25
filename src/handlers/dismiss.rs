use axum::extract::State;
use axum::http::header::{REFERER, SET_COOKIE};
use axum::http::{HeaderMap, HeaderValue};
use axum::response::{IntoResponse, Redirect, Response};
use chrono::Utc;
use reqwest::Url;
use crate::fetcher::ConfigTransport;
use crate::handlers::{cookie_header, AppState};
use crate::store::CookieJar;

/// The dismiss control posts here; the page it came from is shown again without the banner.
pub async fn dismiss_handler<T>(State(state): State<AppState<T>>, headers: HeaderMap) -> Response
where T: ConfigTransport + 'static
{
    let mut jar = CookieJar::from_header(&cookie_header(&headers), Utc::now());
    state.inner.renderer.record_dismissal(&mut jar);

    let mut response = Redirect::to(&return_path(&headers)).into_response();
    for cookie in jar.set_cookie_headers() {
        match HeaderValue::from_str(&cookie) {
            Ok(value) => {
                response.headers_mut().append(SET_COOKIE, value);
            }
            Err(e) => log::error!("couldn't set the cookie '{cookie}': {e}"),
        }
    }
    response
}

/// Only the path of the referring page is kept so the redirect never leaves the site.
fn return_path(headers: &HeaderMap) -> String {
    headers.get(REFERER)
        .and_then(|value| value.to_str().ok())
        .and_then(|referer| Url::parse(referer)
            .inspect_err(|e| log::debug!("ignoring the invalid Referer '{referer}': {e}"))
            .ok())
        .map(|url| match url.query() {
            Some(query) => format!("{}?{query}", url.path()),
            None => url.path().to_owned(),
        })
        .unwrap_or_else(|| "/".to_owned())
}
