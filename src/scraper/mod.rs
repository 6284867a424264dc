//! One end-to-end scrape of the badge listing.

pub mod errors;
pub mod page;

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tracing::info;

use crate::badges::output::write_records;
use crate::badges::{BadgeRecord, NamePolicy, RawBadge, build_records};
use crate::browser::{SessionOptions, with_session};

pub use errors::ScrapeError;
pub use page::{BADGE_SELECTOR, LISTING_URL, PageReader};

/// A badge listing page that can be loaded and then read.
#[async_trait]
pub trait BadgeSource: Send + Sync {
    /// Load `url` and block until badges are present, failing with
    /// [`ScrapeError::ReadinessTimeout`] once `timeout` has passed.
    async fn wait_ready(&self, url: &str, timeout: Duration) -> Result<(), ScrapeError>;

    /// One [`RawBadge`] per badge on the ready page, in document order. An
    /// empty list is a valid answer.
    async fn read_badges(&self) -> Result<Vec<RawBadge>, ScrapeError>;
}

/// Everything a scrape run needs to know.
#[derive(Debug, Clone)]
pub struct ScrapeOptions {
    pub session: SessionOptions,
    pub listing_url: String,
    pub ready_timeout: Duration,
    pub output_path: PathBuf,
    pub policy: NamePolicy,
}

/// Summary of a successful run.
#[derive(Debug, Clone)]
pub struct ScrapeReport {
    pub count: usize,
    pub output_path: PathBuf,
    pub duration: Duration,
}

/// Read badges from `source`, normalize them and write the badge file.
pub async fn extract_to_file(
    source: &dyn BadgeSource,
    policy: NamePolicy,
    output_path: &Path,
) -> Result<Vec<BadgeRecord>, ScrapeError> {
    let raw = source.read_badges().await?;
    let records = build_records(raw, policy);
    write_records(output_path, &records).await?;
    Ok(records)
}

/// Wait for the listing to become ready, then extract it to the badge file.
///
/// Nothing is read or written if the readiness wait fails.
pub async fn run_extraction(
    source: &dyn BadgeSource,
    options: &ScrapeOptions,
) -> Result<Vec<BadgeRecord>, ScrapeError> {
    source
        .wait_ready(&options.listing_url, options.ready_timeout)
        .await?;
    extract_to_file(source, options.policy, &options.output_path).await
}

/// Run a full scrape: open a session, load the listing, wait for it, extract,
/// write the badge file, and close the session.
pub async fn scrape(options: &ScrapeOptions) -> Result<ScrapeReport, ScrapeError> {
    let start = Instant::now();

    let records = with_session(&options.session, |client| async move {
        let reader = PageReader::new(client);
        run_extraction(&reader, options).await
    })
    .await?;

    let report = ScrapeReport {
        count: records.len(),
        output_path: options.output_path.clone(),
        duration: start.elapsed(),
    };
    info!(
        count = report.count,
        policy = options.policy.as_str(),
        path = %report.output_path.display(),
        "badges scraped"
    );
    Ok(report)
}
