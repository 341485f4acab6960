use tabled::{Table, Tabled, settings::Style};

use crate::cli::error::CliResult;
use crate::db::{Article, ArticleQuery, ArticleRepository, Database, Id, NewArticle};

use super::{format_timestamp, truncate};

#[derive(Tabled)]
struct ArticleDisplay {
    #[tabled(rename = "ID")]
    id: Id,
    #[tabled(rename = "Feed")]
    feed_id: Id,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "URL")]
    url: String,
    #[tabled(rename = "Published")]
    published_at: String,
}

impl From<&Article> for ArticleDisplay {
    fn from(article: &Article) -> Self {
        Self {
            id: article.id,
            feed_id: article.feed_id,
            title: truncate(&article.title, 40),
            url: truncate(&article.url, 50),
            published_at: format_timestamp(article.published_at),
        }
    }
}

/// Store an article for an existing feed
pub async fn add_article<D: Database>(db: &D, article: &NewArticle) -> CliResult<String> {
    let article = db.articles().create(article).await?;
    Ok(format!(
        "✓ Created article: {} (id {}, feed {})",
        article.title, article.id, article.feed_id
    ))
}

/// List articles, optionally restricted to one feed
pub async fn list_articles<D: Database>(
    db: &D,
    feed_id: Option<Id>,
    format: &str,
) -> CliResult<String> {
    let query = feed_id.map(ArticleQuery::for_feed);
    let articles = db.articles().list(query.as_ref()).await?;

    match format {
        "json" => Ok(serde_json::to_string_pretty(&articles)?),
        _ => Ok(format_table(&articles)),
    }
}

fn format_table(articles: &[Article]) -> String {
    if articles.is_empty() {
        return "No articles found.".to_string();
    }

    let display_articles: Vec<ArticleDisplay> =
        articles.iter().map(ArticleDisplay::from).collect();
    let mut table = Table::new(display_articles);
    table.with(Style::rounded());
    table.to_string()
}

/// Delete an article
pub async fn delete_article<D: Database>(db: &D, id: Id) -> CliResult<String> {
    if db.articles().delete(id).await? {
        Ok(format!("✓ Deleted article {}", id))
    } else {
        Ok(format!("No article with id {}; nothing deleted", id))
    }
}
