use axum::routing::get;
use axum_prometheus::PrometheusMetricLayer;
use once_cell::sync::Lazy;
use prometheus::{Encoder, Opts, TextEncoder};

/// Register additional metrics of our own structs by using this registry instance.
static REGISTRY: Lazy<Registry> = Lazy::new(|| Registry(prometheus::Registry::new()));

pub static CONFIG_SOURCE_COUNTER: Lazy<ConfigSourceCounters> = Lazy::new(|| {
    let opts = Opts::new("config_source_total", "count of page loads by the configuration source used");
    ConfigSourceCounters {
        inline: Counter::new("config_source (inline)", opts.clone().const_label("source", "inline")),
        url: Counter::new("config_source (url)", opts.clone().const_label("source", "url")),
        none: Counter::new("config_source (none)", opts.const_label("source", "none")),
    }
});
pub static CONFIG_FALLBACK_COUNTER: Lazy<Counter> = Lazy::new(|| {
    Counter::new("config_fallback", Opts::new("config_fallback_total", "count of fallback configurations used instead of broken ones"))
});
pub static BANNER_RENDER_COUNTER: Lazy<RenderCounters> = Lazy::new(|| {
    let opts = Opts::new("banner_render_total", "count of render decisions");
    RenderCounters {
        shown: Counter::new("banner_render (shown)", opts.clone().const_label("outcome", "shown")),
        disabled: Counter::new("banner_render (disabled)", opts.clone().const_label("outcome", "disabled")),
        dismissed: Counter::new("banner_render (dismissed)", opts.const_label("outcome", "dismissed")),
    }
});
pub static BANNER_DISMISS_COUNTER: Lazy<Counter> = Lazy::new(|| {
    Counter::new("banner_dismiss", Opts::new("banner_dismiss_total", "count of dismiss control activations"))
});


pub fn init() -> axum::Router {
    let prometheus = REGISTRY
        .register(&CONFIG_SOURCE_COUNTER.inline)
        .register(&CONFIG_SOURCE_COUNTER.url)
        .register(&CONFIG_SOURCE_COUNTER.none)
        .register(&CONFIG_FALLBACK_COUNTER)
        .register(&BANNER_RENDER_COUNTER.shown)
        .register(&BANNER_RENDER_COUNTER.disabled)
        .register(&BANNER_RENDER_COUNTER.dismissed)
        .register(&BANNER_DISMISS_COUNTER)
        .unwrap();

    let (prometheus_layer, metric_handle) = PrometheusMetricLayer::pair();
    axum::Router::new()
        .route("/metrics", get(|| async move {
            let mut buffer = vec![];
            let metrics = prometheus.gather();
            if let Err(e) = TextEncoder::new().encode(&metrics, &mut buffer) {
                log::error!("couldn't encode custom metrics: {e}");
            }
            let custom_metrics = String::from_utf8_lossy(&buffer);

            metric_handle.render() + custom_metrics.as_ref()
        }))
        .layer(prometheus_layer)
}

pub struct Counter {
    inner: prometheus::Counter,
    name: String
}
pub struct ConfigSourceCounters {
    pub inline: Counter,
    pub url: Counter,
    pub none: Counter,
}
pub struct RenderCounters {
    pub shown: Counter,
    pub disabled: Counter,
    pub dismissed: Counter,
}
struct Registry(prometheus::Registry);

impl Counter {
    fn new(name: &str, opts: Opts) -> Counter {
        let c = prometheus::Counter::with_opts(opts)
            .unwrap_or_else(|e| panic!("unable to create {name} counter: {e}"));
        Counter { inner: c, name: name.to_string() }
    }

    pub fn inc(&self) {
        self.inner.inc()
    }

    #[cfg(test)]
    pub fn get(&self) -> f64 {
        self.inner.get()
    }
}

impl ConfigSourceCounters {
    pub fn for_kind(&self, kind: &str) -> &Counter {
        match kind {
            "inline" => &self.inline,
            "url" => &self.url,
            _ => &self.none,
        }
    }
}

impl Registry {
    fn register(&self, counter: &Counter) -> &Self {
        self.0.register(Box::new(counter.inner.clone()))
            .unwrap_or_else(|e| panic!("unable to register the {} counter: {e}", counter.name));
        self
    }

    fn unwrap(&self) -> prometheus::Registry {
        self.0.clone()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[tokio::test]
    async fn exposes_counters() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await.expect("couldn't bind a local port");
        let addr = listener.local_addr().expect("couldn't get the local address");
        let app = init();
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("metrics server failed");
        });
        BANNER_DISMISS_COUNTER.inc();

        let body = reqwest::get(format!("http://{addr}/metrics"))
            .await.expect("metrics request failed")
            .text()
            .await.expect("couldn't read the metrics");
        for family in ["config_source_total", "config_fallback_total", "banner_render_total", "banner_dismiss_total"] {
            assert!(body.contains(&format!("# TYPE {family} counter")), "{family} is missing:\n{body}");
        }
        for labels in [r#"source="inline""#, r#"source="url""#, r#"source="none""#,
                       r#"outcome="shown""#, r#"outcome="disabled""#, r#"outcome="dismissed""#] {
            assert!(body.contains(labels), "{labels} is missing:\n{body}");
        }
    }
}
