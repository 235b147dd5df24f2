//! HTML renderer
//!
//! Renders stored Improvements as htmx card fragments. Every interpolated
//! value is escaped. Summaries may carry markup from the feed, so they are
//! reduced to their text content before escaping.

use html_escape::{encode_double_quoted_attribute, encode_text};
use scraper::Html;

use crate::domain::entities::{sort_newest_first, Improvement};

pub const PLACEHOLDER_IMAGE: &str = "https://placehold.co/300x200";

/// Which side of each Improvement a fragment shows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardSide {
    Improved,
    Original,
}

impl CardSide {
    /// The endpoint and label of the button that flips to the other side
    fn toggle(self) -> (&'static str, &'static str) {
        match self {
            CardSide::Improved => ("/originals", "Originals"),
            CardSide::Original => ("/improvements", "Improvements"),
        }
    }
}

/// Improved headlines, newest original first
pub fn render_improvements(improvements: Vec<Improvement>) -> String {
    render_cards(improvements, CardSide::Improved)
}

/// Upstream headlines of the same records, newest first
pub fn render_originals(improvements: Vec<Improvement>) -> String {
    render_cards(improvements, CardSide::Original)
}

fn render_cards(mut improvements: Vec<Improvement>, side: CardSide) -> String {
    sort_newest_first(&mut improvements);

    let (target, label) = side.toggle();
    let mut buf = format!(
        "<button hx-get=\"{}\" hx-target=\"#content\">{}</button>\n",
        target, label
    );

    for improvement in &improvements {
        buf.push_str(&render_card(improvement, side));
    }

    buf
}

fn render_card(improvement: &Improvement, side: CardSide) -> String {
    let image = improvement
        .original
        .image_link
        .as_deref()
        .unwrap_or(PLACEHOLDER_IMAGE);
    let (title, summary) = match side {
        CardSide::Improved => (&improvement.title, &improvement.summary),
        CardSide::Original => (&improvement.original.title, &improvement.original.summary),
    };

    let mut buf = String::new();
    buf.push_str("<div class=\"card\">\n");
    buf.push_str(&format!(
        "  <div class=\"card-img\"><img src=\"{}\" width=\"600\"></div>\n",
        encode_double_quoted_attribute(image)
    ));
    buf.push_str(&format!(
        "  <div class=\"card-title\">{}</div>\n",
        encode_text(title)
    ));
    buf.push_str(&format!(
        "  <div class=\"card-summary\">{}</div>\n",
        encode_text(&plain_text(summary))
    ));
    buf.push_str("</div>\n");
    buf
}

/// Text content of an HTML fragment with whitespace runs collapsed
fn plain_text(fragment: &str) -> String {
    let doc = Html::parse_fragment(fragment);
    let text = doc.root_element().text().collect::<String>();
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Root page; loads the improved list into `#content` on page load
pub fn render_index() -> String {
    let mut buf = String::new();
    buf.push_str("<!DOCTYPE html>\n<html>\n<head>\n");
    buf.push_str("  <meta charset=\"utf-8\">\n");
    buf.push_str("  <title>The Pollen Prophet</title>\n");
    buf.push_str("  <script src=\"https://unpkg.com/htmx.org@1.9.12\"></script>\n");
    buf.push_str("  <link href=\"/static/style.css\" rel=\"stylesheet\">\n");
    buf.push_str("</head>\n<body>\n");
    buf.push_str("  <h1>The Pollen Prophet</h1>\n");
    buf.push_str("  <h2>Making funny since 2025 what ought not bee.</h2>\n");
    buf.push_str(
        "  <div id=\"content\" hx-get=\"/improvements\" hx-target=\"#content\" hx-trigger=\"load\"></div>\n",
    );
    buf.push_str("</body>\n</html>\n");
    buf
}
