//! Name and URL cleanup for scraped badges.

use regex::{NoExpand, Regex};
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// Placeholder written in place of the image size so consumers can pick one.
pub const SIZE_PLACEHOLDER: &str = "{SIZE}";

/// How badge names are derived from image alt text.
///
/// Which of these should be the default is still an open product question;
/// `Basic` reproduces the names existing badge files were built with.
///
/// Config and environment values are matched in lowercase, capitalized or
/// uppercase form (`strict`, `Strict`, `STRICT`).
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum NamePolicy {
    /// Lowercase, then remove every space.
    #[default]
    #[serde(alias = "Basic", alias = "BASIC")]
    Basic,
    /// Lowercase identifier restricted to `[a-z0-9_]`, with `-` mapped to `_`,
    /// runs of `_` collapsed and edge underscores trimmed.
    #[serde(alias = "Strict", alias = "STRICT")]
    Strict,
}

impl NamePolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Basic => "basic",
            Self::Strict => "strict",
        }
    }

    /// Derive a badge name from alt text under this policy.
    pub fn apply(self, alt: &str) -> String {
        match self {
            Self::Basic => basic_name(alt),
            Self::Strict => strict_name(alt),
        }
    }
}

/// `"Twitch VIP"` -> `"twitchvip"`
fn basic_name(alt: &str) -> String {
    alt.to_lowercase().replace(' ', "")
}

/// `"Sub-Gifter  Lead!"` -> `"sub_gifterlead"`
fn strict_name(alt: &str) -> String {
    let mut name = String::with_capacity(alt.len());
    for ch in basic_name(alt).chars() {
        let ch = if ch == '-' { '_' } else { ch };
        if ch == '_' {
            if !name.ends_with('_') {
                name.push('_');
            }
        } else if ch.is_ascii_lowercase() || ch.is_ascii_digit() {
            name.push(ch);
        }
    }
    name.trim_matches('_').to_string()
}

/// Replace a trailing `/<digits>` segment with `/{SIZE}`.
///
/// Only the end of the string is considered; numeric segments elsewhere in
/// the path are left alone, as is any URL without a numeric tail.
pub fn normalize_url(src: &str) -> String {
    static TRAILING_SIZE_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"/\d+$").unwrap());

    TRAILING_SIZE_RE
        .replace(src, NoExpand(&format!("/{SIZE_PLACEHOLDER}")))
        .into_owned()
}
