use crate::types::{CourierError, RawEntry, RawFeedDocument, Result};
use async_trait::async_trait;
use chrono::Utc;
use feed_rs::parser;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, info};

#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub user_agent: String,
    pub timeout_seconds: u64,
    pub max_redirects: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: "rss-courier/0.1".to_string(),
            timeout_seconds: 30,
            max_redirects: 5,
        }
    }
}

/// Fetch-and-parse collaborator: turns a feed URL into a structured
/// document. The rest of the pipeline never sees HTTP or XML.
#[async_trait]
pub trait FeedFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<RawFeedDocument>;
}

pub struct HttpFeedFetcher {
    client: Client,
}

impl HttpFeedFetcher {
    pub fn new(config: FetchConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(config.timeout_seconds))
            .gzip(true)
            .deflate(true)
            .brotli(true)
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl FeedFetcher for HttpFeedFetcher {
    async fn fetch(&self, url: &str) -> Result<RawFeedDocument> {
        debug!("Fetching feed: {}", url);
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(CourierError::Fetch(format!(
                "HTTP {} for {}",
                status, url
            )));
        }

        let body = response.text().await?;
        let document = parse_document(&body)?;
        info!(
            "Fetched feed {} with {} entries",
            url,
            document.entries.len()
        );
        Ok(document)
    }
}

/// Parses raw RSS/Atom bytes into the document shape the poller consumes.
pub fn parse_document(content: &str) -> Result<RawFeedDocument> {
    let feed = parser::parse(content.as_bytes())
        .map_err(|e| CourierError::Parse(format!("failed to parse feed: {e}")))?;

    let title = feed.title.map(|t| t.content);
    let entries = feed.entries.into_iter().map(raw_entry).collect();

    Ok(RawFeedDocument { title, entries })
}

fn raw_entry(entry: feed_rs::model::Entry) -> RawEntry {
    let id = if entry.id.is_empty() {
        None
    } else {
        Some(entry.id)
    };

    RawEntry {
        id,
        link: entry.links.first().map(|l| l.href.clone()),
        title: entry.title.map(|t| t.content),
        published: entry.published.map(|dt| dt.with_timezone(&Utc)),
        updated: entry.updated.map(|dt| dt.with_timezone(&Utc)),
        content: entry.content.and_then(|c| c.body),
        summary: entry.summary.map(|s| s.content),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ATOM_FEED: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <title>Example Blog</title>
  <id>urn:feed:example</id>
  <updated>2024-03-02T09:00:00Z</updated>
  <entry>
    <id>urn:post:2</id>
    <title>Second post</title>
    <link href="https://example.com/2"/>
    <published>2024-03-02T09:00:00Z</published>
    <updated>2024-03-02T09:00:00Z</updated>
    <content type="html">&lt;p&gt;newer&lt;/p&gt;</content>
  </entry>
  <entry>
    <id>urn:post:1</id>
    <title>First post</title>
    <link href="https://example.com/1"/>
    <published>2024-03-01T09:00:00Z</published>
    <updated>2024-03-01T09:00:00Z</updated>
    <summary>older</summary>
  </entry>
</feed>"#;

    #[test]
    fn parses_atom_into_document() {
        let document = parse_document(ATOM_FEED).unwrap();
        assert_eq!(document.title.as_deref(), Some("Example Blog"));
        assert_eq!(document.entries.len(), 2);

        let newest = &document.entries[0];
        assert_eq!(newest.id.as_deref(), Some("urn:post:2"));
        assert_eq!(newest.link.as_deref(), Some("https://example.com/2"));
        assert_eq!(newest.content.as_deref(), Some("<p>newer</p>"));

        let oldest = &document.entries[1];
        assert!(oldest.content.is_none());
        assert_eq!(oldest.summary.as_deref(), Some("older"));
    }

    #[test]
    fn rejects_non_feed_content() {
        assert!(matches!(
            parse_document("<html><body>not a feed</body></html>"),
            Err(CourierError::Parse(_))
        ));
    }
}
