use miette::Diagnostic;
use thiserror::Error;

use crate::api::ApiError;
use crate::db::DbError;

#[derive(Error, Diagnostic, Debug)]
pub enum CliError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Database(#[from] DbError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Api(#[from] ApiError),

    #[error("Failed to render output: {0}")]
    #[diagnostic(code(rss_aggregator::cli::output))]
    Output(#[from] serde_json::Error),

    #[error("Invalid argument: {message}")]
    #[diagnostic(
        code(rss_aggregator::cli::invalid_argument),
        help("Run with --help to see the accepted flags.")
    )]
    InvalidArgument { message: String },
}

pub type CliResult<T> = Result<T, CliError>;
