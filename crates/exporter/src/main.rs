//! `nexus-inventory` -- exports component inventories from a registry.
//!
//! For each configured feed, pages through the registry's component
//! listing and writes `<output-dir>/<label>.json`.
//!
//! # Environment variables
//!
//! | Variable                     | Required | Default  | Description                              |
//! |------------------------------|----------|----------|------------------------------------------|
//! | `NEXUS_URL`                  | yes      | --       | Registry base URL                        |
//! | `NEXUS_LOGIN_BASE64`         | yes      | --       | Pre-encoded credential sent after `Basic ` |
//! | `NEXUS_OUTPUT_DIR`           | no       | `nexus`  | Output directory                         |
//! | `NEXUS_OUTPUT_DIR_MODE`      | no       | `fresh`  | `fresh` or `reuse`                       |
//! | `NEXUS_FEEDS`                | no       | built-in | `repository=label,...`                   |
//! | `NEXUS_REQUEST_TIMEOUT_SECS` | no       | none     | Per-request timeout                      |
//! | `NEXUS_FAIL_ON_PARTIAL`      | no       | `false`  | Exit 2 when any feed was truncated       |

use std::process::ExitCode;

use inventory_exporter::config::ExporterConfig;
use inventory_exporter::export;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "nexus_inventory=info,inventory_exporter=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ExporterConfig::from_env();
    tracing::debug!(?config, "Configuration loaded");

    let summary = match export::run(&config).await {
        Ok(summary) => summary,
        Err(e) => {
            tracing::error!(error = %e, "Inventory export aborted");
            return ExitCode::FAILURE;
        }
    };

    let failed: Vec<&str> = summary
        .failed_feeds()
        .into_iter()
        .map(|feed| feed.repository.as_str())
        .collect();

    if failed.is_empty() {
        tracing::info!(
            feeds = summary.results.len(),
            records = summary.total_records(),
            "Inventory export finished",
        );
    } else {
        tracing::warn!(
            feeds = summary.results.len(),
            records = summary.total_records(),
            failed = ?failed,
            "Inventory export finished with truncated feeds",
        );
    }

    ExitCode::from(summary.exit_code(config.fail_on_partial))
}
