//! WebDriver session lifecycle.
//!
//! A session is opened per run and always closed again, whichever step of the
//! run failed. Callers get the session through [`with_session`] rather than
//! holding a [`Client`] of their own.

use std::future::Future;
use std::panic::{AssertUnwindSafe, resume_unwind};

use futures::FutureExt;

use fantoccini::{Client, ClientBuilder};
use serde_json::json;
use tracing::{debug, info, warn};

use crate::scraper::ScrapeError;

/// How to reach and configure the WebDriver server.
#[derive(Debug, Clone)]
pub struct SessionOptions {
    /// e.g. `http://localhost:4444` for a local geckodriver
    pub webdriver_url: String,
    pub headless: bool,
}

impl SessionOptions {
    fn capabilities(&self) -> serde_json::Map<String, serde_json::Value> {
        let mut caps = serde_json::Map::new();
        caps.insert("browserName".to_owned(), json!("firefox"));
        if self.headless {
            caps.insert(
                "moz:firefoxOptions".to_owned(),
                json!({ "args": ["-headless"] }),
            );
        }
        caps
    }
}

/// Open a fresh, isolated browser session.
pub async fn connect(options: &SessionOptions) -> Result<Client, ScrapeError> {
    debug!(
        webdriver_url = %options.webdriver_url,
        headless = options.headless,
        "starting browser session"
    );

    let client = ClientBuilder::native()
        .capabilities(options.capabilities())
        .connect(&options.webdriver_url)
        .await
        .map_err(|source| ScrapeError::Session {
            webdriver_url: options.webdriver_url.clone(),
            source,
        })?;

    info!(webdriver_url = %options.webdriver_url, "browser session started");
    Ok(client)
}

/// Run `body` against a new session and close the session afterwards.
///
/// The session is closed on every exit path of `body`. If `body` fails, its
/// error is returned and a close failure is only logged.
pub async fn with_session<T, Body, BodyFut>(
    options: &SessionOptions,
    body: Body,
) -> Result<T, ScrapeError>
where
    Body: FnOnce(Client) -> BodyFut,
    BodyFut: Future<Output = Result<T, ScrapeError>>,
{
    let client = connect(options).await?;
    run_scoped(client, body, |client| async move {
        let closed = client.close().await.map_err(ScrapeError::Teardown);
        if closed.is_ok() {
            debug!("browser session closed");
        }
        closed
    })
    .await
}

/// Pair a resource with a guaranteed release step.
///
/// `release` runs after `body` regardless of its outcome, including a panic,
/// which is resumed once the resource has been released. The body's error
/// takes precedence over a release error.
pub async fn run_scoped<S, T, Body, BodyFut, Release, ReleaseFut>(
    resource: S,
    body: Body,
    release: Release,
) -> Result<T, ScrapeError>
where
    S: Clone,
    Body: FnOnce(S) -> BodyFut,
    BodyFut: Future<Output = Result<T, ScrapeError>>,
    Release: FnOnce(S) -> ReleaseFut,
    ReleaseFut: Future<Output = Result<(), ScrapeError>>,
{
    let outcome = AssertUnwindSafe(body(resource.clone()))
        .catch_unwind()
        .await;
    let released = release(resource).await;

    let outcome = match outcome {
        Ok(outcome) => outcome,
        Err(panic) => {
            if let Err(release_err) = released {
                warn!(error = %release_err, "failed to release browser session after a panic");
            }
            resume_unwind(panic);
        }
    };

    match (outcome, released) {
        (Ok(value), Ok(())) => Ok(value),
        (Ok(_), Err(release_err)) => Err(release_err),
        (Err(err), Ok(())) => Err(err),
        (Err(err), Err(release_err)) => {
            warn!(error = %release_err, "failed to release browser session after an error");
            Err(err)
        }
    }
}
