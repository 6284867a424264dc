//! Extraction from a page reader through to the badge file on disk.
//!
//! A fixed in-memory reader stands in for the browser so the whole
//! normalize-number-write path runs without a WebDriver server.

use async_trait::async_trait;
use badge_scraper::badges::{NamePolicy, RawBadge};
use badge_scraper::catalog::Catalog;
use badge_scraper::browser::{SessionOptions, run_scoped};
use badge_scraper::scraper::{
    BADGE_SELECTOR, BadgeSource, ScrapeError, ScrapeOptions, extract_to_file, run_extraction,
};
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Serves a fixed listing and counts how often it was read.
struct FixedListing {
    badges: Vec<RawBadge>,
    reads: AtomicUsize,
}

impl FixedListing {
    fn new(badges: Vec<RawBadge>) -> Self {
        Self {
            badges,
            reads: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl BadgeSource for FixedListing {
    async fn wait_ready(&self, _url: &str, _timeout: Duration) -> Result<(), ScrapeError> {
        Ok(())
    }

    async fn read_badges(&self) -> Result<Vec<RawBadge>, ScrapeError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        Ok(self.badges.clone())
    }
}

/// A reader that fails as if the page went away mid-scan.
struct BrokenListing;

#[async_trait]
impl BadgeSource for BrokenListing {
    async fn wait_ready(&self, _url: &str, _timeout: Duration) -> Result<(), ScrapeError> {
        Ok(())
    }

    async fn read_badges(&self) -> Result<Vec<RawBadge>, ScrapeError> {
        Err(ScrapeError::Output {
            path: PathBuf::from("listing"),
            source: std::io::Error::other("page unloaded"),
        })
    }
}

/// A page whose badge tiles never show up.
#[derive(Default)]
struct StalledListing {
    reads: AtomicUsize,
}

#[async_trait]
impl BadgeSource for StalledListing {
    async fn wait_ready(&self, _url: &str, timeout: Duration) -> Result<(), ScrapeError> {
        Err(ScrapeError::ReadinessTimeout {
            selector: BADGE_SELECTOR.to_owned(),
            timeout,
        })
    }

    async fn read_badges(&self) -> Result<Vec<RawBadge>, ScrapeError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        Ok(Vec::new())
    }
}

fn options(output_path: &Path) -> ScrapeOptions {
    ScrapeOptions {
        session: SessionOptions {
            webdriver_url: "http://localhost:4444".into(),
            headless: true,
        },
        listing_url: "https://badges.example/listing".into(),
        ready_timeout: Duration::from_secs(5),
        output_path: output_path.to_path_buf(),
        policy: NamePolicy::Basic,
    }
}

fn listing() -> Vec<RawBadge> {
    vec![
        RawBadge::new(
            "Staff",
            "https://static-cdn.jtvnw.net/badges/v1/d97c37bd-a6f5-4c38-8f57-4e4bef88af34/1",
        ),
        RawBadge::new(
            "Twitch VIP",
            "https://static-cdn.jtvnw.net/badges/v1/b817aba4-fad8-49e2-b88a-7cc744dfa6ec/3",
        ),
        RawBadge {
            alt: None,
            src: Some("https://cdn.example/badge/icon.svg".into()),
        },
        RawBadge {
            alt: Some("GlitchCon 2020".into()),
            src: None,
        },
    ]
}

fn read_json(path: &std::path::Path) -> Value {
    serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
}

#[tokio::test]
async fn writes_numbered_normalized_records() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("twitch/json/twitch_badges.json");
    let source = FixedListing::new(listing());

    let records = extract_to_file(&source, NamePolicy::Basic, &path)
        .await
        .unwrap();
    assert_eq!(records.len(), 4);
    assert_eq!(source.reads.load(Ordering::SeqCst), 1);

    let json = read_json(&path);
    let entries = json.as_array().unwrap();
    let indices: Vec<u64> = entries.iter().map(|e| e["index"].as_u64().unwrap()).collect();
    assert_eq!(indices, vec![1, 2, 3, 4]);

    assert_eq!(entries[0]["name"], "staff");
    assert_eq!(
        entries[0]["url"],
        "https://static-cdn.jtvnw.net/badges/v1/d97c37bd-a6f5-4c38-8f57-4e4bef88af34/{SIZE}"
    );
    assert_eq!(entries[1]["name"], "twitchvip");
    assert_eq!(entries[2]["name"], "");
    assert_eq!(entries[2]["url"], "https://cdn.example/badge/icon.svg");
    assert_eq!(entries[3]["name"], "glitchcon2020");
    assert_eq!(entries[3]["url"], "");

    for entry in entries {
        let keys: Vec<&String> = entry.as_object().unwrap().keys().collect();
        assert_eq!(keys.len(), 3);
        let name = entry["name"].as_str().unwrap();
        assert!(!name.contains(' '));
        assert_eq!(name, name.to_lowercase());
    }
}

#[tokio::test]
async fn empty_listing_writes_empty_array() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("badges.json");

    let records = extract_to_file(&FixedListing::new(Vec::new()), NamePolicy::Basic, &path)
        .await
        .unwrap();

    assert!(records.is_empty());
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "[]");
}

#[tokio::test]
async fn repeated_runs_are_byte_identical() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("badges.json");
    let source = FixedListing::new(listing());

    extract_to_file(&source, NamePolicy::Basic, &path).await.unwrap();
    let first = std::fs::read(&path).unwrap();
    extract_to_file(&source, NamePolicy::Basic, &path).await.unwrap();
    let second = std::fs::read(&path).unwrap();

    assert_eq!(first, second);
}

#[tokio::test]
async fn previous_file_is_replaced() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("badges.json");
    std::fs::write(&path, "[{\"index\": 99, \"name\": \"stale\", \"url\": \"\"}]").unwrap();

    extract_to_file(&FixedListing::new(listing()), NamePolicy::Basic, &path)
        .await
        .unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    assert!(!text.contains("stale"));
}

#[tokio::test]
async fn non_ascii_names_written_literally() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("badges.json");
    let source = FixedListing::new(vec![RawBadge::new("Überraschung Ei", "x/72")]);

    extract_to_file(&source, NamePolicy::Basic, &path).await.unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.contains("\"überraschungei\""), "{text}");
    assert!(text.contains("\"x/{SIZE}\""), "{text}");
}

#[tokio::test]
async fn strict_policy_restricts_names() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("badges.json");
    let source = FixedListing::new(vec![RawBadge::new("Sub-Gifter Leader!", "x/1")]);

    let records = extract_to_file(&source, NamePolicy::Strict, &path).await.unwrap();
    assert_eq!(records[0].name, "sub_gifterleader");
}

#[tokio::test]
async fn reader_failure_leaves_no_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("badges.json");

    let result = extract_to_file(&BrokenListing, NamePolicy::Basic, &path).await;

    assert!(result.is_err());
    assert!(!path.exists());
}

#[tokio::test]
async fn written_file_feeds_the_catalog() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("badges.json");
    extract_to_file(&FixedListing::new(listing()), NamePolicy::Basic, &path)
        .await
        .unwrap();

    let catalog = Catalog::load(&path).unwrap();
    let resolved = catalog.resolve_tag("twitchvip/1,unknown/1,staff/1", "3");

    let urls: Vec<&str> = resolved.iter().map(|b| b.url.as_str()).collect();
    assert_eq!(
        urls,
        vec![
            "https://static-cdn.jtvnw.net/badges/v1/b817aba4-fad8-49e2-b88a-7cc744dfa6ec/3",
            "https://static-cdn.jtvnw.net/badges/v1/d97c37bd-a6f5-4c38-8f57-4e4bef88af34/3",
        ]
    );
}

#[tokio::test]
async fn ready_listing_is_extracted() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("badges.json");
    let source = FixedListing::new(listing());

    let records = run_extraction(&source, &options(&path)).await.unwrap();

    assert_eq!(records.len(), 4);
    assert!(path.exists());
}

#[tokio::test]
async fn readiness_timeout_stops_before_extraction() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("badges.json");
    let source = StalledListing::default();

    let err = run_extraction(&source, &options(&path)).await.unwrap_err();

    match err {
        ScrapeError::ReadinessTimeout { selector, timeout } => {
            assert_eq!(selector, "a.relative");
            assert_eq!(timeout, Duration::from_secs(5));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(source.reads.load(Ordering::SeqCst), 0);
    assert!(!path.exists());
}

#[tokio::test]
async fn readiness_timeout_still_releases_the_session() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("badges.json");
    let source = StalledListing::default();
    let options = options(&path);
    let released = Arc::new(AtomicUsize::new(0));

    let result = run_scoped(
        released.clone(),
        |_| run_extraction(&source, &options),
        |counter| async move {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(())
        },
    )
    .await;

    assert!(matches!(result, Err(ScrapeError::ReadinessTimeout { .. })));
    assert_eq!(released.load(Ordering::SeqCst), 1);
    assert!(!path.exists());
}
