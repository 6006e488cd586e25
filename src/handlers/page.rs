use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::Html;
use chrono::Utc;
use tokio::sync::watch;
use crate::bootstrap::{Bootstrap, ReadyState};
use crate::fetcher::ConfigTransport;
use crate::handlers::{cookie_header, AppState};
use crate::render::HtmlPage;
use crate::store::CookieJar;

/// One request is one page load: the whole pipeline runs for it exactly once.
pub async fn page_handler<T>(State(state): State<AppState<T>>, headers: HeaderMap) -> Html<String>
where T: ConfigTransport + 'static
{
    let deps = &state.inner;
    let jar = CookieJar::from_header(&cookie_header(&headers), Utc::now());
    let context = deps.config.page_context();
    let mut page = HtmlPage::new(deps.config.host_page.as_str());
    // the host page is complete before it's served
    let (_ready_tx, readiness) = watch::channel(ReadyState::Ready);

    Bootstrap::new(&deps.resolver, &deps.fetcher, &deps.renderer)
        .run(readiness, &context, &mut page, &jar)
        .await;

    let html = page.to_html()
        .unwrap_or_else(|e| {
            log::error!("couldn't render the announcement bar: {e}");
            page.source().to_owned()
        });
    Html(html)
}
