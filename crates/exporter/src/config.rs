use std::fmt;
use std::path::PathBuf;

use inventory_core::feed::{default_feeds, parse_feed_list, FeedSpec};

use crate::output::OutputDirMode;

/// Default output directory, relative to the working directory.
pub const DEFAULT_OUTPUT_DIR: &str = "nexus";

/// Exporter configuration, built once at process start.
///
/// Nothing below reads the environment; tests construct this struct
/// directly.
#[derive(Clone)]
pub struct ExporterConfig {
    /// Registry base URL (the REST root is `<base_url>/service/rest`).
    pub base_url: String,
    /// Opaque pre-encoded credential sent after `Basic `.
    pub credential: String,
    /// Directory receiving one `<label>.json` per feed.
    pub output_dir: PathBuf,
    /// Whether an existing output directory is an error.
    pub output_dir_mode: OutputDirMode,
    /// Feeds to export, in order.
    pub feeds: Vec<FeedSpec>,
    /// Per-request timeout. `None` leaves requests unbounded.
    pub request_timeout_secs: Option<u64>,
    /// Exit non-zero when any feed export was cut short.
    pub fail_on_partial: bool,
}

impl ExporterConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                      | Default                        |
    /// |------------------------------|--------------------------------|
    /// | `NEXUS_URL`                  | empty (not validated)          |
    /// | `NEXUS_LOGIN_BASE64`         | empty (not validated)          |
    /// | `NEXUS_OUTPUT_DIR`           | `nexus`                        |
    /// | `NEXUS_OUTPUT_DIR_MODE`      | `fresh`                        |
    /// | `NEXUS_FEEDS`                | npm-proxy, docker-hub, helm-proxy |
    /// | `NEXUS_REQUEST_TIMEOUT_SECS` | unset                          |
    /// | `NEXUS_FAIL_ON_PARTIAL`      | `false`                        |
    pub fn from_env() -> Self {
        let base_url = std::env::var("NEXUS_URL").unwrap_or_else(|_| {
            tracing::warn!("NEXUS_URL is not set; registry requests will fail");
            String::new()
        });

        let credential = std::env::var("NEXUS_LOGIN_BASE64").unwrap_or_else(|_| {
            tracing::warn!("NEXUS_LOGIN_BASE64 is not set; registry requests will be unauthorized");
            String::new()
        });

        let output_dir = std::env::var("NEXUS_OUTPUT_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_OUTPUT_DIR));

        let output_dir_mode = std::env::var("NEXUS_OUTPUT_DIR_MODE")
            .ok()
            .map(|raw| {
                OutputDirMode::from_name(&raw).unwrap_or_else(|| {
                    tracing::warn!(value = %raw, "Unknown NEXUS_OUTPUT_DIR_MODE, using 'fresh'");
                    OutputDirMode::Fresh
                })
            })
            .unwrap_or_default();

        let feeds = feeds_from(std::env::var("NEXUS_FEEDS").ok().as_deref());

        let request_timeout_secs = std::env::var("NEXUS_REQUEST_TIMEOUT_SECS")
            .ok()
            .and_then(|raw| match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => Some(secs),
                _ => {
                    tracing::warn!(value = %raw, "Ignoring invalid NEXUS_REQUEST_TIMEOUT_SECS");
                    None
                }
            });

        let fail_on_partial = std::env::var("NEXUS_FAIL_ON_PARTIAL")
            .map(|raw| parse_flag(&raw))
            .unwrap_or(false);

        Self {
            base_url,
            credential,
            output_dir,
            output_dir_mode,
            feeds,
            request_timeout_secs,
            fail_on_partial,
        }
    }
}

impl fmt::Debug for ExporterConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExporterConfig")
            .field("base_url", &self.base_url)
            .field("credential", &"<redacted>")
            .field("output_dir", &self.output_dir)
            .field("output_dir_mode", &self.output_dir_mode)
            .field("feeds", &self.feeds)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("fail_on_partial", &self.fail_on_partial)
            .finish()
    }
}

/// Resolve the feed list from an optional `NEXUS_FEEDS` value.
///
/// An unparseable override is logged and replaced by the default feeds.
fn feeds_from(raw: Option<&str>) -> Vec<FeedSpec> {
    match raw {
        None => default_feeds(),
        Some(raw) => parse_feed_list(raw).unwrap_or_else(|e| {
            tracing::error!(error = %e, "Invalid NEXUS_FEEDS, using default feeds");
            default_feeds()
        }),
    }
}

fn parse_flag(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
