mod handlers;
pub mod routes;
mod state;
pub mod v1;


use std::env;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use miette::Diagnostic;
use thiserror::Error;
use tower_http::trace::TraceLayer;
use tracing::{debug, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub use state::AppState;

use crate::db::Database;

/// Port used when neither `--port` nor `PORT` is given.
pub const DEFAULT_PORT: u16 = 8080;

/// Storage used when neither `--database-url` nor `DATABASE_URL` is given.
pub const DEFAULT_DATABASE_URL: &str = "sqlite://rss_aggregator.db";

/// API server errors
#[derive(Error, Diagnostic, Debug)]
pub enum ApiError {
    #[error("Failed to bind {addr}: {source}")]
    #[diagnostic(
        code(rss_aggregator::api::bind),
        help("Is another process already listening on this port? Set PORT or pass --port.")
    )]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("Server error: {0}")]
    #[diagnostic(code(rss_aggregator::api::serve))]
    Serve(#[source] std::io::Error),
}

/// API server configuration
///
/// Precedence: CLI flag (`with_*`) > environment (`Config::new`) > default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Host address to bind to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// SQLite connection string
    pub database_url: String,
    /// Log verbosity: 0 = info, 1 = debug, 2+ = trace
    pub verbosity: u8,
    /// Serve the Scalar API viewer at /docs
    pub enable_docs: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: DEFAULT_PORT,
            database_url: DEFAULT_DATABASE_URL.to_string(),
            verbosity: 0,
            enable_docs: false,
        }
    }
}

impl Config {
    /// Defaults overlaid with `HOST`, `PORT` and `DATABASE_URL`.
    ///
    /// Unset or empty variables keep the default; unparsable ones are logged
    /// and ignored.
    pub fn new() -> Self {
        let mut config = Self::default();

        if let Some(host) = non_empty_var("HOST") {
            match host.parse() {
                Ok(host) => config.host = host,
                Err(_) => warn!(%host, "Ignoring invalid HOST"),
            }
        }

        match non_empty_var("PORT") {
            Some(port) => match port.parse() {
                Ok(port) => config.port = port,
                Err(_) => warn!(%port, "Ignoring invalid PORT, using {}", DEFAULT_PORT),
            },
            None => debug!("PORT not set, using default: {}", DEFAULT_PORT),
        }

        if let Some(url) = non_empty_var("DATABASE_URL") {
            config.database_url = url;
        }

        config
    }

    pub fn with_host(mut self, host: IpAddr) -> Self {
        self.host = host;
        self
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn with_database_url(mut self, url: impl Into<String>) -> Self {
        self.database_url = url.into();
        self
    }

    pub fn with_verbosity(mut self, verbosity: u8) -> Self {
        self.verbosity = verbosity;
        self
    }

    pub fn with_docs(mut self, enable_docs: bool) -> Self {
        self.enable_docs = enable_docs;
        self
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Default log filter for a verbosity level. `RUST_LOG` takes precedence.
pub fn default_log_filter(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "rss_aggregator=info,tower_http=info",
        1 => "rss_aggregator=debug,tower_http=debug,sqlx=info",
        _ => "rss_aggregator=trace,tower_http=trace,sqlx=debug",
    }
}

/// Initialize tracing subscriber with env filter
///
/// Logs go to stderr so command output on stdout stays machine-readable.
pub fn init_tracing(verbosity: u8) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_log_filter(verbosity).into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Resolve once Ctrl-C (or SIGTERM on unix) is received.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to install Ctrl-C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}

/// Run the API server until a shutdown signal arrives.
///
/// The schema must already be migrated. The database is closed once the
/// server stops, including when binding or serving fails.
pub async fn run<D: Database + 'static>(config: Config, db: D) -> Result<(), ApiError> {
    let state = AppState::new(db);
    let app =
        routes::create_router(state.clone(), config.enable_docs).layer(TraceLayer::new_for_http());

    let addr = config.socket_addr();
    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(source) => {
            state.db().close().await;
            return Err(ApiError::Bind { addr, source });
        }
    };
    info!("API server listening on http://{}", addr);

    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await;

    // Close the pool whether or not the server exited cleanly
    state.db().close().await;
    served.map_err(ApiError::Serve)?;

    info!("API server stopped");
    Ok(())
}
