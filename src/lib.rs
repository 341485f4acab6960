pub mod api;
pub mod cli;
pub mod db;

/// Banner served at `/`.
pub fn banner() -> &'static str {
    "Welcome to RSS Aggregator API\n"
}
