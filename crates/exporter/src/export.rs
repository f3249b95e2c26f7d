//! Pagination over the registry and the per-feed export driver.
//!
//! Each feed is collected page by page, following continuation tokens
//! until the registry returns none, and then written once to
//! `<output_dir>/<label>.json`. A failed page request ends that feed's
//! pagination: the records gathered so far are still written and the
//! error is kept on the [`FeedResult`]. Feeds run one after another.

use std::path::{Path, PathBuf};
use std::time::Duration;

use inventory_core::feed::{validate_feed, FeedSpec};
use inventory_core::record::ExportedRecord;
use inventory_registry::api::{RegistryClient, RegistryError};

use crate::config::ExporterConfig;
use crate::error::ExportError;
use crate::output::{prepare_output_dir, write_records};

// ---------------------------------------------------------------------------
// Results
// ---------------------------------------------------------------------------

/// Exit status of a run that reached every feed.
pub const EXIT_OK: u8 = 0;

/// Exit status when feeds were truncated and `NEXUS_FAIL_ON_PARTIAL` is set.
pub const EXIT_PARTIAL: u8 = 2;

/// Records gathered from one repository, and the error that stopped
/// pagination early, if any.
#[derive(Debug, Default)]
pub struct Collection {
    pub records: Vec<ExportedRecord>,
    pub pages_fetched: usize,
    pub error: Option<RegistryError>,
}

/// Outcome of exporting a single feed.
#[derive(Debug)]
pub struct FeedResult {
    pub feed: FeedSpec,
    pub records: Vec<ExportedRecord>,
    pub pages_fetched: usize,
    pub output_path: PathBuf,
    /// Set when a page request failed; `records` then holds only the
    /// pages before the failure.
    pub error: Option<RegistryError>,
}

impl FeedResult {
    pub fn is_complete(&self) -> bool {
        self.error.is_none()
    }
}

/// Outcome of a full run over all configured feeds.
#[derive(Debug, Default)]
pub struct RunSummary {
    pub results: Vec<FeedResult>,
}

impl RunSummary {
    /// Feeds whose export was cut short by a registry error.
    pub fn failed_feeds(&self) -> Vec<&FeedSpec> {
        self.results
            .iter()
            .filter(|r| !r.is_complete())
            .map(|r| &r.feed)
            .collect()
    }

    pub fn total_records(&self) -> usize {
        self.results.iter().map(|r| r.records.len()).sum()
    }

    pub fn is_complete(&self) -> bool {
        self.results.iter().all(FeedResult::is_complete)
    }

    /// Process exit status for a finished run.
    ///
    /// Truncated feeds still exit `0` unless `fail_on_partial` is set, in
    /// which case they exit [`EXIT_PARTIAL`].
    pub fn exit_code(&self, fail_on_partial: bool) -> u8 {
        if fail_on_partial && !self.is_complete() {
            EXIT_PARTIAL
        } else {
            EXIT_OK
        }
    }
}

// ---------------------------------------------------------------------------
// Pagination
// ---------------------------------------------------------------------------

/// Page through every component of `repository`.
///
/// Starts without a continuation token and feeds each returned token into
/// the next request until the registry answers with none. Registry errors
/// are logged and returned inside the [`Collection`], never propagated.
pub async fn collect_feed(client: &RegistryClient, repository: &str) -> Collection {
    let mut collection = Collection::default();
    let mut token: Option<String> = None;

    loop {
        match client.list_components(repository, token.as_deref()).await {
            Ok(page) => {
                collection.pages_fetched += 1;
                tracing::debug!(
                    repository,
                    page = collection.pages_fetched,
                    items = page.items.len(),
                    has_next = page.continuation_token.is_some(),
                    "Fetched component page",
                );
                collection
                    .records
                    .extend(page.items.iter().map(|item| item.to_record()));

                match page.continuation_token {
                    Some(next) => token = Some(next),
                    None => break,
                }
            }
            Err(e) => {
                tracing::error!(
                    repository,
                    page = collection.pages_fetched + 1,
                    records = collection.records.len(),
                    error = %e,
                    "Component listing failed",
                );
                collection.error = Some(e);
                break;
            }
        }
    }

    collection
}

// ---------------------------------------------------------------------------
// Export
// ---------------------------------------------------------------------------

/// Collect one feed and write it to `<output_dir>/<label>.json`.
///
/// Only filesystem and serialization failures are returned as `Err`.
pub async fn export_feed(
    client: &RegistryClient,
    output_dir: &Path,
    feed: &FeedSpec,
) -> Result<FeedResult, ExportError> {
    let Collection {
        records,
        pages_fetched,
        error,
    } = collect_feed(client, &feed.repository).await;

    let output_path = output_dir.join(feed.file_name());
    write_records(&output_path, &records)?;

    tracing::info!(
        repository = %feed.repository,
        records = records.len(),
        pages = pages_fetched,
        complete = error.is_none(),
        path = %output_path.display(),
        "Feed exported",
    );

    Ok(FeedResult {
        feed: feed.clone(),
        records,
        pages_fetched,
        output_path,
        error,
    })
}

/// Build the registry client described by `config`.
pub fn build_client(config: &ExporterConfig) -> Result<RegistryClient, ExportError> {
    let mut builder = reqwest::Client::builder();
    if let Some(secs) = config.request_timeout_secs {
        builder = builder.timeout(Duration::from_secs(secs));
    }

    Ok(RegistryClient::with_client(
        builder.build()?,
        &config.base_url,
        config.credential.clone(),
    ))
}

/// Export every configured feed, in order.
///
/// Feed validation and output directory preparation happen first, so a
/// bad configuration or an existing directory (in
/// [`OutputDirMode::Fresh`](crate::output::OutputDirMode::Fresh)) aborts
/// before any request is made. A registry failure on one feed does not
/// stop the remaining feeds.
pub async fn run(config: &ExporterConfig) -> Result<RunSummary, ExportError> {
    for feed in &config.feeds {
        validate_feed(feed)?;
    }

    prepare_output_dir(&config.output_dir, config.output_dir_mode)?;
    let client = build_client(config)?;

    tracing::info!(
        registry = %client.rest_root(),
        feeds = config.feeds.len(),
        output_dir = %config.output_dir.display(),
        "Starting inventory export",
    );

    let mut summary = RunSummary::default();
    for feed in &config.feeds {
        let result = export_feed(&client, &config.output_dir, feed).await?;
        summary.results.push(result);
    }

    Ok(summary)
}
