//! Badge records and the browser-independent half of a scrape.
//!
//! A page reader hands over [`RawBadge`] values in document order; everything
//! from there on (normalization, numbering, serialization) is pure and lives
//! here so it can be exercised without a browser.

pub mod normalize;
pub mod output;

use serde::{Deserialize, Serialize};

pub use normalize::{NamePolicy, SIZE_PLACEHOLDER, normalize_url};

/// Attribute values read from one badge image, before any cleanup.
///
/// `None` means the attribute was absent on the element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawBadge {
    pub alt: Option<String>,
    pub src: Option<String>,
}

impl RawBadge {
    pub fn new(alt: impl Into<String>, src: impl Into<String>) -> Self {
        Self {
            alt: Some(alt.into()),
            src: Some(src.into()),
        }
    }
}

/// One entry of the badge file.
///
/// Field order is the serialized key order: `index`, `name`, `url`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BadgeRecord {
    /// 1-based position in scan order.
    pub index: usize,
    pub name: String,
    /// Image URL with the trailing size segment replaced by `/{SIZE}`.
    pub url: String,
}

/// Turn raw page values into numbered, normalized records.
///
/// Order is preserved and indices are exactly `1..=raw.len()`. Missing
/// attributes become empty strings.
pub fn build_records(raw: Vec<RawBadge>, policy: NamePolicy) -> Vec<BadgeRecord> {
    raw.into_iter()
        .enumerate()
        .map(|(position, badge)| BadgeRecord {
            index: position + 1,
            name: policy.apply(badge.alt.as_deref().unwrap_or_default()),
            url: normalize_url(badge.src.as_deref().unwrap_or_default()),
        })
        .collect()
}
