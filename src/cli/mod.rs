mod commands;
pub mod error;


use std::net::IpAddr;

use clap::{Parser, Subcommand};

use crate::api::{self, Config};
use crate::db::utils::current_timestamp;
use crate::db::{Database, NewArticle};
use error::CliResult;

#[derive(Parser)]
#[command(name = "rss-aggregator")]
#[command(author, version, about = "RSS aggregator API server and admin CLI", long_about = None)]
pub struct Cli {
    /// SQLite connection string (default: DATABASE_URL env or sqlite://rss_aggregator.db)
    #[arg(long, global = true)]
    pub database_url: Option<String>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API server
    Api {
        /// Host address to bind to (default: HOST env or 0.0.0.0)
        #[arg(long)]
        host: Option<IpAddr>,
        /// Port to listen on (default: PORT env or 8080)
        #[arg(short, long)]
        port: Option<u16>,
        /// Serve the OpenAPI viewer at /docs
        #[arg(long)]
        docs: bool,
    },
    /// User management commands
    User {
        #[command(subcommand)]
        command: UserCommands,
    },
    /// Article management commands
    Article {
        #[command(subcommand)]
        command: ArticleCommands,
    },
}

#[derive(Subcommand)]
enum UserCommands {
    /// Register a user
    Add {
        /// Display name
        #[arg(long)]
        name: String,
        /// API key (generated when omitted)
        #[arg(long)]
        api_key: Option<String>,
    },
    /// List users
    List {
        /// Output format (table or json)
        #[arg(long, default_value = "table")]
        format: String,
    },
    /// Update a user; omitted flags keep the stored value
    Update {
        /// User ID
        id: i64,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        api_key: Option<String>,
    },
    /// Delete a user
    Delete {
        /// User ID
        id: i64,
    },
}

#[derive(Subcommand)]
enum ArticleCommands {
    /// Store an article for an existing feed
    Add {
        /// Owning feed ID
        #[arg(long)]
        feed_id: i64,
        #[arg(long)]
        title: String,
        #[arg(long)]
        url: String,
        #[arg(long, default_value = "")]
        description: String,
        /// Publication time in ms since epoch (default: now)
        #[arg(long)]
        published_at: Option<i64>,
    },
    /// List articles
    List {
        /// Only list articles of this feed
        #[arg(long)]
        feed_id: Option<i64>,
        /// Output format (table or json)
        #[arg(long, default_value = "table")]
        format: String,
    },
    /// Delete an article
    Delete {
        /// Article ID
        id: i64,
    },
}

/// Load `.env` from the working directory if present.
///
/// Variables already set in the process are not overridden.
fn load_dotenv() {
    match dotenvy::dotenv() {
        Ok(_) => {}
        Err(e) if e.not_found() => {}
        Err(e) => eprintln!("Warning: ignoring unreadable .env file: {}", e),
    }
}

/// Resolve configuration: CLI flags over environment over defaults.
fn resolve_config(database_url: Option<String>, verbosity: u8) -> Config {
    let config = Config::new().with_verbosity(verbosity);
    match database_url {
        Some(url) => config.with_database_url(url),
        None => config,
    }
}

pub async fn run() -> CliResult<()> {
    load_dotenv();
    let cli = Cli::parse();

    let Some(command) = cli.command else {
        // Show help when no command provided
        let _ = Cli::parse_from(["rss-aggregator", "--help"]);
        return Ok(());
    };

    api::init_tracing(cli.verbose);
    let config = resolve_config(cli.database_url, cli.verbose);

    match command {
        Commands::Api { host, port, docs } => {
            let mut config = config.with_docs(docs);
            if let Some(host) = host {
                config = config.with_host(host);
            }
            if let Some(port) = port {
                config = config.with_port(port);
            }
            commands::api::run(config).await
        }
        Commands::User { command } => {
            let db = commands::open_database(&config.database_url).await?;
            let output = user_command(&db, command).await;
            db.close().await;
            println!("{}", output?);
            Ok(())
        }
        Commands::Article { command } => {
            let db = commands::open_database(&config.database_url).await?;
            let output = article_command(&db, command).await;
            db.close().await;
            println!("{}", output?);
            Ok(())
        }
    }
}

async fn user_command<D: Database>(db: &D, command: UserCommands) -> CliResult<String> {
    match command {
        UserCommands::Add { name, api_key } => {
            commands::user::add_user(db, &name, api_key.as_deref()).await
        }
        UserCommands::List { format } => commands::user::list_users(db, &format).await,
        UserCommands::Update { id, name, api_key } => {
            commands::user::update_user(db, id, name, api_key).await
        }
        UserCommands::Delete { id } => commands::user::delete_user(db, id).await,
    }
}

async fn article_command<D: Database>(db: &D, command: ArticleCommands) -> CliResult<String> {
    match command {
        ArticleCommands::Add {
            feed_id,
            title,
            url,
            description,
            published_at,
        } => {
            let article = NewArticle {
                title,
                description,
                url,
                published_at: published_at.unwrap_or_else(current_timestamp),
                feed_id,
            };
            commands::article::add_article(db, &article).await
        }
        ArticleCommands::List { feed_id, format } => {
            commands::article::list_articles(db, feed_id, &format).await
        }
        ArticleCommands::Delete { id } => commands::article::delete_article(db, id).await,
    }
}
