//! Reading a badge file back and resolving chat badges to image URLs.
//!
//! Chat messages carry a `badges` tag such as `moderator/1,subscriber/12`.
//! The part before the slash is matched against badge names from the file,
//! and the `{SIZE}` placeholder in the URL is filled with the requested size.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::{debug, trace};

use crate::badges::SIZE_PLACEHOLDER;
use crate::json::parse_json_with_context;

/// Size used when a caller does not pick one (the largest Twitch rendition).
pub const DEFAULT_SIZE: &str = "3";

/// A badge as read back from a badge file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CatalogBadge {
    #[serde(default)]
    pub index: Option<usize>,
    pub name: String,
    pub url: String,
}

impl CatalogBadge {
    /// The image URL for one size, e.g. `"3"`.
    pub fn url_for_size(&self, size: &str) -> String {
        self.url.replace(SIZE_PLACEHOLDER, size)
    }
}

/// A chat badge matched to its image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedBadge {
    pub name: String,
    pub url: String,
}

/// The badges of one badge file, in file order.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    badges: Vec<CatalogBadge>,
}

impl Catalog {
    pub fn from_json_str(body: &str) -> Result<Self> {
        let badges: Vec<CatalogBadge> =
            parse_json_with_context(body).context("Failed to parse badge file")?;
        Ok(Self { badges })
    }

    pub fn load(path: &Path) -> Result<Self> {
        let body = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read badge file {}", path.display()))?;
        let catalog = Self::from_json_str(&body)
            .with_context(|| format!("Invalid badge file {}", path.display()))?;
        debug!(path = %path.display(), badges = catalog.len(), "badge catalog loaded");
        Ok(catalog)
    }

    pub fn len(&self) -> usize {
        self.badges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.badges.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CatalogBadge> {
        self.badges.iter()
    }

    /// First badge with exactly this name.
    pub fn find(&self, name: &str) -> Option<&CatalogBadge> {
        self.badges.iter().find(|badge| badge.name == name)
    }

    /// Resolve every badge of a chat `badges` tag, keeping tag order.
    ///
    /// Names missing from the catalog are skipped.
    pub fn resolve_tag(&self, tag: &str, size: &str) -> Vec<ResolvedBadge> {
        badge_names_from_tag(tag)
            .into_iter()
            .filter_map(|name| match self.find(name) {
                Some(badge) => Some(ResolvedBadge {
                    name: badge.name.clone(),
                    url: badge.url_for_size(size),
                }),
                None => {
                    trace!(name, "badge not in catalog");
                    None
                }
            })
            .collect()
    }
}

/// Badge names of a chat `badges` tag value.
///
/// `"moderator/1,subscriber/12"` -> `["moderator", "subscriber"]`. Entries
/// without a `/` are ignored.
pub fn badge_names_from_tag(tag: &str) -> Vec<&str> {
    tag.split(',')
        .filter_map(|entry| entry.split_once('/').map(|(name, _)| name))
        .collect()
}
