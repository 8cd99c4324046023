//! HTTP API for DataHopper (axum).
//!
//! Listens on http://127.0.0.1:8000 by default and serves `POST /research` and
//! `GET /health`, also mounted under `/api` for the web frontend.
//!
//! **Public API**: [`run_serve`], [`run_serve_on_listener`], [`ServeOptions`].

mod app;
mod handlers;
mod response;

use std::future::Future;

use datahopper::ResearchRunner;
use tokio::net::TcpListener;
use tracing::info;

use app::{router, AppState};

pub use handlers::{HealthResponse, ResearchRequest, ResearchResponse};
pub use response::ApiError;

/// Address used when neither `--addr` nor `DATAHOPPER_ADDR` is given.
pub const DEFAULT_ADDR: &str = "127.0.0.1:8000";

/// Origins allowed by CORS when `SERVE_CORS_ORIGINS` is unset.
pub const DEFAULT_CORS_ORIGINS: [&str; 2] = ["http://localhost:3000", "http://127.0.0.1:3000"];

/// Server options that do not belong to the research pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServeOptions {
    /// Browser origins allowed to call the API.
    pub cors_origins: Vec<String>,
}

impl Default for ServeOptions {
    fn default() -> Self {
        Self {
            cors_origins: DEFAULT_CORS_ORIGINS.iter().map(|o| o.to_string()).collect(),
        }
    }
}

impl ServeOptions {
    /// Reads `SERVE_CORS_ORIGINS` (comma-separated); blank or unset keeps the defaults.
    pub fn from_env() -> Self {
        Self::from_origins(std::env::var("SERVE_CORS_ORIGINS").ok().as_deref())
    }

    fn from_origins(raw: Option<&str>) -> Self {
        let origins: Vec<String> = raw
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|o| !o.is_empty())
            .map(String::from)
            .collect();
        if origins.is_empty() {
            Self::default()
        } else {
            Self {
                cors_origins: origins,
            }
        }
    }
}

/// Resolves the listen address: explicit `addr`, else `DATAHOPPER_ADDR`, else [`DEFAULT_ADDR`].
pub fn resolve_addr(addr: Option<&str>) -> String {
    addr.map(String::from)
        .or_else(|| {
            std::env::var("DATAHOPPER_ADDR")
                .ok()
                .filter(|a| !a.trim().is_empty())
        })
        .unwrap_or_else(|| DEFAULT_ADDR.to_string())
}

/// Serves on an existing listener until `shutdown` resolves. Used by tests (bind to
/// 127.0.0.1:0 then pass the listener).
pub async fn run_serve_on_listener<F>(
    listener: TcpListener,
    runner: ResearchRunner,
    options: ServeOptions,
    shutdown: F,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr = listener.local_addr()?;
    info!(%addr, origins = ?options.cors_origins, "DataHopper API listening on http://{}", addr);

    let app = router(AppState::new(runner), &options.cors_origins);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;
    info!("DataHopper API shut down");
    Ok(())
}

/// Binds `addr` (see [`resolve_addr`]) and serves until Ctrl-C.
pub async fn run_serve(
    addr: Option<&str>,
    runner: ResearchRunner,
    options: ServeOptions,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let addr = resolve_addr(addr);
    let listener = TcpListener::bind(&addr).await?;
    run_serve_on_listener(listener, runner, options, async {
        let _ = tokio::signal::ctrl_c().await;
    })
    .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cors_origins_default_when_blank() {
        assert_eq!(ServeOptions::from_origins(None), ServeOptions::default());
        assert_eq!(ServeOptions::from_origins(Some(" , ")), ServeOptions::default());
    }

    #[test]
    fn cors_origins_parse_comma_list() {
        let opts = ServeOptions::from_origins(Some("https://a.example, https://b.example"));
        assert_eq!(
            opts.cors_origins,
            vec!["https://a.example".to_string(), "https://b.example".to_string()]
        );
    }

    #[test]
    fn explicit_addr_wins() {
        assert_eq!(resolve_addr(Some("0.0.0.0:9000")), "0.0.0.0:9000");
    }
}
