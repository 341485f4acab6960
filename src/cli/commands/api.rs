//! API server command

use tracing::error;

use crate::api::{self, Config};
use crate::cli::error::CliResult;
use crate::db::{Database, SqliteDatabase};

/// Lines printed before the server starts listening.
pub fn startup_banner(config: &Config) -> String {
    let addr = config.socket_addr();
    let mut lines = vec![
        "RSS aggregator API server starting...".to_string(),
        format!("   API:      http://{}/v1", addr),
        format!("   Health:   http://{}/health", addr),
    ];
    if config.enable_docs {
        lines.push(format!("   Docs:     http://{}/docs", addr));
    }
    lines.push(format!("   Database: {}", config.database_url));
    lines.join("\n")
}

/// Run the API server
///
/// Schema setup failures abort before the listener is bound.
pub async fn run(config: Config) -> CliResult<()> {
    let db = SqliteDatabase::connect(&config.database_url).await?;

    if let Err(e) = db.migrate().await {
        error!(error = %e, "Schema setup failed");
        db.close().await;
        return Err(e.into());
    }

    println!("{}\n", startup_banner(&config));

    api::run(config, db).await?;
    Ok(())
}
