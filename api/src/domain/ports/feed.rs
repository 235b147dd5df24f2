//! Feed source port

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::FeedError;

/// A feed item as published, before normalization into an `Original`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawEntry {
    pub title: String,
    /// HTML-ish body, possibly starting with an inline image tag
    pub summary: String,
    pub link: String,
    /// RFC 2822 publish date
    pub published: String,
}

#[async_trait]
pub trait FeedSource: Send + Sync {
    /// Download and parse the whole feed
    async fn fetch_entries(&self) -> Result<Vec<RawEntry>, FeedError>;
}
