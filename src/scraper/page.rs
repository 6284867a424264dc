//! streamdatabase.com page reader.
//!
//! All knowledge of the listing page's markup lives in this file. Each badge
//! is an `a.relative` anchor wrapping an `<img>` whose `alt` is the badge
//! title and whose `src` is the CDN image URL.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use fantoccini::elements::Element;
use fantoccini::error::CmdError;
use fantoccini::{Client, Locator};
use tracing::{debug, info, trace};

use super::{BadgeSource, ScrapeError};
use crate::badges::RawBadge;
use crate::utils::{fmt_duration, log_if_slow};

/// Global badge listing, oldest first.
pub const LISTING_URL: &str =
    "https://www.streamdatabase.com/twitch/global-badges?sort_by=added_at&sort_direction=ascending";

/// One match per badge tile.
pub const BADGE_SELECTOR: &str = "a.relative";

const IMAGE_SELECTOR: &str = "img";

/// Reads badge tiles from a page loaded in a live browser session.
pub struct PageReader {
    client: Client,
}

impl PageReader {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Load `url` and block until the first badge tile is present.
    ///
    /// Fails with [`ScrapeError::ReadinessTimeout`] if no tile shows up within
    /// `timeout`.
    pub async fn open(&self, url: &str, timeout: Duration) -> Result<(), ScrapeError> {
        let start = Instant::now();
        self.client
            .goto(url)
            .await
            .map_err(|source| ScrapeError::Navigation {
                url: url.to_owned(),
                source,
            })?;
        debug!(url, duration = fmt_duration(start.elapsed()), "page loaded");

        let waited = Instant::now();
        match self
            .client
            .wait()
            .at_most(timeout)
            .for_element(Locator::Css(BADGE_SELECTOR))
            .await
        {
            Ok(_) => {}
            Err(CmdError::WaitTimeout) => {
                return Err(ScrapeError::ReadinessTimeout {
                    selector: BADGE_SELECTOR.to_owned(),
                    timeout,
                });
            }
            Err(source) => return Err(ScrapeError::browser("waiting for badge tiles")(source)),
        }
        log_if_slow(waited, timeout / 2, "waiting for badge tiles");

        info!(
            url,
            selector = BADGE_SELECTOR,
            duration = fmt_duration(start.elapsed()),
            "listing ready"
        );
        Ok(())
    }

    async fn read_tile(tile: &Element) -> Result<RawBadge, ScrapeError> {
        let img = tile
            .find(Locator::Css(IMAGE_SELECTOR))
            .await
            .map_err(ScrapeError::browser("locating a badge image"))?;

        // The `src` property is the resolved absolute URL, unlike the raw attribute
        let src = img
            .prop("src")
            .await
            .map_err(ScrapeError::browser("reading a badge image src"))?;
        let alt = img
            .attr("alt")
            .await
            .map_err(ScrapeError::browser("reading a badge image alt"))?;

        Ok(RawBadge { alt, src })
    }
}

#[async_trait]
impl BadgeSource for PageReader {
    async fn wait_ready(&self, url: &str, timeout: Duration) -> Result<(), ScrapeError> {
        self.open(url, timeout).await
    }

    async fn read_badges(&self) -> Result<Vec<RawBadge>, ScrapeError> {
        let tiles = self
            .client
            .find_all(Locator::Css(BADGE_SELECTOR))
            .await
            .map_err(ScrapeError::browser("collecting badge tiles"))?;
        debug!(count = tiles.len(), "badge tiles collected");

        let mut badges = Vec::with_capacity(tiles.len());
        for (position, tile) in tiles.iter().enumerate() {
            let badge = Self::read_tile(tile).await?;
            trace!(position, alt = ?badge.alt, src = ?badge.src, "badge tile read");
            badges.push(badge);
        }
        Ok(badges)
    }
}
