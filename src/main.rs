mod api;
mod config;
mod error;
mod form;
mod models;
mod pages;
mod routes;
mod session;
mod templates;
#[cfg(test)]
mod test_support;

use std::sync::Arc;

use crate::{api::ApiClient, config::Config, session::SessionStore};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub api: Arc<ApiClient>,
    pub sessions: SessionStore,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,cinehub=debug".to_string()),
        )
        .init();

    let config = Arc::new(Config::from_env()?);

    let http = wreq::Client::builder().build()?;
    let api = ApiClient::new(http, config.api_base_url.clone());
    let sessions = SessionStore::new(config.session_idle_minutes);

    let state = Arc::new(AppState { config: config.clone(), api: Arc::new(api), sessions });
    let app = routes::router(state);

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    tracing::info!(addr = %config.addr, api = %config.api_base_url, "listening");
    axum::serve(listener, app).await?;

    Ok(())
}
