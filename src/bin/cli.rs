use miette::Result;

#[tokio::main]
async fn main() -> Result<()> {
    Ok(rss_aggregator::cli::run().await?)
}
