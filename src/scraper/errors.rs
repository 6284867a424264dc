//! Error types for a scrape run.

use std::path::PathBuf;
use std::time::Duration;

use fantoccini::error::{CmdError, NewSessionError};

#[derive(Debug, thiserror::Error)]
pub enum ScrapeError {
    #[error("Failed to start a browser session via {webdriver_url}")]
    Session {
        webdriver_url: String,
        #[source]
        source: NewSessionError,
    },
    #[error("Failed to load {url}")]
    Navigation {
        url: String,
        #[source]
        source: CmdError,
    },
    #[error("Timed out after {timeout:?} waiting for `{selector}`")]
    ReadinessTimeout { selector: String, timeout: Duration },
    #[error("Browser command failed while {action}")]
    Browser {
        action: &'static str,
        #[source]
        source: CmdError,
    },
    #[error("Failed to close the browser session")]
    Teardown(#[source] CmdError),
    #[error("Failed to write badge file {}", .path.display())]
    Output {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ScrapeError {
    pub(crate) fn browser(action: &'static str) -> impl FnOnce(CmdError) -> Self {
        move |source| Self::Browser { action, source }
    }
}
