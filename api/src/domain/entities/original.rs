//! Original article domain entity
//!
//! A satirical news item as published by the upstream feed, before rewriting.
//! Its identity is derived from the link, so the same article fetched twice
//! always maps to the same `OriginalId`.

use std::sync::LazyLock;

use chrono::{DateTime, Timelike, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::domain::ports::RawEntry;
use crate::error::FeedError;

/// Leading inline image at the very start of a summary
static LEADING_IMAGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"^<img src="(?P<img>.+?)""#).expect("valid regex"));

/// Any inline image tag, removed once a leading image has been lifted out
static IMAGE_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<img src=.+?>").expect("valid regex"));

/// SHA-256 hex digest of an article link
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OriginalId(pub String);

impl OriginalId {
    pub fn from_link(link: &str) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(link.as_bytes());
        Self(hex::encode(hasher.finalize()))
    }
}

impl std::fmt::Display for OriginalId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An upstream article
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "StoredOriginal")]
pub struct Original {
    pub id: OriginalId,
    pub title: String,
    pub summary: String,
    pub link: String,
    pub date: DateTime<Utc>,
    pub image_link: Option<String>,
}

impl Original {
    /// Build an Original from freshly fetched fields.
    ///
    /// Derives the id from `link` and lifts a leading `<img src="...">` out of
    /// the summary into `image_link`. Dates are truncated to whole seconds.
    pub fn new(
        title: impl Into<String>,
        summary: impl Into<String>,
        link: impl Into<String>,
        date: DateTime<Utc>,
    ) -> Self {
        let summary = summary.into();
        let (image_link, summary) = match extract_leading_image(&summary) {
            Some((image, rest)) => (Some(image), rest),
            None => (None, summary),
        };
        Self::restore(title, summary, link, date, image_link)
    }

    /// Rebuild an Original from stored fields without touching the summary.
    pub fn restore(
        title: impl Into<String>,
        summary: impl Into<String>,
        link: impl Into<String>,
        date: DateTime<Utc>,
        image_link: Option<String>,
    ) -> Self {
        let link = link.into();
        Self {
            id: OriginalId::from_link(&link),
            title: title.into(),
            summary: summary.into(),
            link,
            date: truncate_to_seconds(date),
            image_link: image_link.filter(|l| !l.is_empty()),
        }
    }

    /// Build an Original from a raw feed entry, parsing its RFC 2822 date.
    pub fn from_entry(entry: RawEntry) -> Result<Self, FeedError> {
        let date = parse_published(&entry.published)?;
        Ok(Self::new(entry.title, entry.summary, entry.link, date))
    }

    /// Re-run image extraction on a stored Original.
    ///
    /// Returns `None` when the summary carries no leading image, i.e. the
    /// record is already in its migrated shape.
    pub fn reextract_image(&self) -> Option<Self> {
        let (image, rest) = extract_leading_image(&self.summary)?;
        Some(Self {
            summary: rest,
            image_link: Some(image),
            ..self.clone()
        })
    }
}

/// Serialized shape of an Original. The id is never trusted from storage.
#[derive(Deserialize)]
struct StoredOriginal {
    title: String,
    summary: String,
    link: String,
    date: DateTime<Utc>,
    #[serde(default)]
    image_link: Option<String>,
}

impl From<StoredOriginal> for Original {
    fn from(stored: StoredOriginal) -> Self {
        Original::restore(
            stored.title,
            stored.summary,
            stored.link,
            stored.date,
            stored.image_link,
        )
    }
}

/// Parse an RFC 2822 publish date into UTC
pub fn parse_published(value: &str) -> Result<DateTime<Utc>, FeedError> {
    DateTime::parse_from_rfc2822(value.trim())
        .map(|d| d.with_timezone(&Utc))
        .map_err(|e| FeedError::InvalidDate {
            value: value.to_string(),
            reason: e.to_string(),
        })
}

/// Split a summary into (image url, remaining text) if it starts with an image.
///
/// Best effort: anything that does not look like a leading image tag with a
/// non-empty source leaves the summary alone.
fn extract_leading_image(summary: &str) -> Option<(String, String)> {
    let image = LEADING_IMAGE
        .captures(summary)?
        .name("img")
        .map(|m| m.as_str().to_string())
        .filter(|img| !img.is_empty())?;
    let rest = IMAGE_TAG.replace_all(summary, "").into_owned();
    Some((image, rest))
}

fn truncate_to_seconds(date: DateTime<Utc>) -> DateTime<Utc> {
    date.with_nanosecond(0).unwrap_or(date)
}
