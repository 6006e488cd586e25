mod domain;
mod sources;
mod fetcher;
mod store;
mod render;
mod bootstrap;
mod handlers;
mod metrics;
mod config;

#[cfg(test)]
mod test;

use std::net::SocketAddr;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    #[cfg(debug_assertions)]
    if let Err(e) = dotenvy::dotenv() {
        eprintln!("no .env file was loaded: {e}");
    }

    pretty_env_logger::init();

    let app_config = config::AppConfig::from_env()?;
    let addr = SocketAddr::from(([0, 0, 0, 0], app_config.listen_port));
    let state = handlers::AppState::new(app_config, reqwest::Client::new());

    let app = axum::Router::new()
        .merge(metrics::init())
        .merge(handlers::router(state));

    log::info!("serving the announcement bar on {addr}");
    let tcp_listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(tcp_listener, app)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                log::error!("failed to install CTRL+C signal handler: {e}");
                futures::future::pending::<()>().await;
            }
            log::info!("shutdown of the server")
        })
        .await?;
    Ok(())
}
