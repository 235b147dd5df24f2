//! Test fixtures
//!
//! Factory functions for creating test data with sensible defaults.

use chrono::{DateTime, TimeZone, Utc};

use crate::domain::entities::{Improvement, Original};
use crate::domain::ports::RawEntry;

/// Noon UTC on the given day of July 2025
pub fn test_date(day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 7, day, 12, 0, 0)
        .single()
        .expect("valid fixture date")
}

/// Create a test original without an image
pub fn test_original(link: &str) -> Original {
    test_original_dated(link, 1)
}

pub fn test_original_dated(link: &str, day: u32) -> Original {
    Original::new(
        format!("Original headline for {}", link),
        "Scientists confirm water is wet.",
        link,
        test_date(day),
    )
}

/// Create a test improvement whose original was published on `day`
pub fn test_improvement_dated(link: &str, day: u32) -> Improvement {
    Improvement::new(
        test_original_dated(link, day),
        format!("Improved headline for {}", link),
        "Scientists confirm water is, in fact, wetter than expected.",
    )
}

/// Create a test improvement whose original carries a leading image
pub fn test_improvement_with_image(link: &str) -> Improvement {
    let original = Original::new(
        "Man Buys Boat",
        r#"<img src="https://img.example.com/boat.jpg" alt="boat" />He says it floats."#,
        link,
        test_date(3),
    );
    Improvement::new(original, "Man Buys Boat, Boat Unavailable for Comment", "It floats.")
}

/// Create a raw feed entry published at noon on July 1st 2025
pub fn test_entry(title: &str, link: &str) -> RawEntry {
    RawEntry {
        title: title.to_string(),
        summary: format!("Story behind {}", title),
        link: link.to_string(),
        published: "Tue, 01 Jul 2025 12:00:00 +0000".to_string(),
    }
}
