use std::path::PathBuf;

use inventory_core::error::CoreError;

/// Errors that abort an export run.
///
/// Registry failures during pagination are not in this list: they are
/// recorded per feed in [`FeedResult`](crate::export::FeedResult).
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("Output directory already exists: {}", .0.display())]
    OutputDirExists(PathBuf),

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize records: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid feed configuration: {0}")]
    InvalidFeed(#[from] CoreError),

    #[error("Failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}
