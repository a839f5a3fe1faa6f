use std::net::SocketAddr;

use anyhow::Context;

pub const DEFAULT_API_URL: &str = "http://localhost:5000/api";

#[derive(Clone, Debug)]
pub struct Config {
    pub addr: SocketAddr,
    pub api_base_url: String,
    pub session_idle_minutes: i64,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port: u16 =
            std::env::var("PORT").unwrap_or_else(|_| "3000".to_string()).parse().context("PORT")?;

        let api_base_url = std::env::var("MOVIES_API_URL")
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        let session_idle_minutes: i64 = std::env::var("SESSION_IDLE_MINUTES")
            .ok()
            .and_then(|s| s.parse().ok())
            .filter(|m| *m > 0)
            .unwrap_or(30);

        Ok(Self {
            addr: format!("{host}:{port}").parse().context("HOST/PORT")?,
            api_base_url,
            session_idle_minutes,
        })
    }
}
