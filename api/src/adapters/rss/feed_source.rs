//! RSS/Atom feed source over HTTP

use async_trait::async_trait;
use feed_rs::model::Entry;
use feed_rs::parser;
use reqwest::Client;

use crate::domain::ports::{FeedSource, RawEntry};
use crate::error::FeedError;

/// Downloads one feed URL on every call
#[derive(Debug, Clone)]
pub struct HttpFeedSource {
    http: Client,
    url: String,
}

impl HttpFeedSource {
    pub fn new(url: String) -> Self {
        Self {
            http: Client::new(),
            url,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl FeedSource for HttpFeedSource {
    async fn fetch_entries(&self) -> Result<Vec<RawEntry>, FeedError> {
        tracing::info!("Fetching feed {}", self.url);

        let resp = self.http.get(&self.url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(FeedError::Status {
                status: status.as_u16(),
            });
        }

        let bytes = resp.bytes().await?;
        let entries = parse_feed(&bytes)?;
        tracing::info!("Feed {} returned {} entries", self.url, entries.len());
        Ok(entries)
    }
}

/// Parse a feed document into raw entries, preserving document order.
///
/// Every entry needs a title, a link and a publish (or update) date; one
/// entry without them fails the whole feed. The link is the first one with
/// no `rel` or `rel="alternate"`, falling back to the first link listed.
pub fn parse_feed(bytes: &[u8]) -> Result<Vec<RawEntry>, FeedError> {
    let feed = parser::parse(bytes).map_err(|e| FeedError::Parse(e.to_string()))?;
    feed.entries.into_iter().map(to_raw_entry).collect()
}

fn to_raw_entry(entry: Entry) -> Result<RawEntry, FeedError> {
    let missing = |field| FeedError::MissingField {
        entry: entry.id.clone(),
        field,
    };

    let title = entry
        .title
        .as_ref()
        .map(|t| t.content.trim().to_string())
        .ok_or_else(|| missing("title"))?;
    // Atom entries may list replies/edit links first; the article is the alternate one
    let link = entry
        .links
        .iter()
        .find(|l| matches!(l.rel.as_deref(), None | Some("alternate")))
        .or_else(|| entry.links.first())
        .map(|l| l.href.clone())
        .ok_or_else(|| missing("link"))?;
    let published = entry
        .published
        .or(entry.updated)
        .ok_or_else(|| missing("published"))?;
    let summary = entry
        .summary
        .as_ref()
        .map(|s| s.content.clone())
        .or_else(|| entry.content.as_ref().and_then(|c| c.body.clone()))
        .unwrap_or_default();

    Ok(RawEntry {
        title,
        summary,
        link,
        published: published.to_rfc2822(),
    })
}
