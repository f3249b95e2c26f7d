//! Feed definitions: which registry repositories to export and under which
//! output file stem.

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Feeds exported when no override is configured, as
/// `(repository, output_label)` pairs in export order.
pub const DEFAULT_FEEDS: &[(&str, &str)] = &[
    ("npm-proxy", "npm_packages"),
    ("docker-hub", "docker_images"),
    ("helm-proxy", "helm_charts"),
];

/// Separator between entries of a feed list string.
const ENTRY_SEPARATOR: char = ',';

/// Separator between repository and label inside one entry.
const LABEL_SEPARATOR: char = '=';

// ---------------------------------------------------------------------------
// FeedSpec
// ---------------------------------------------------------------------------

/// A registry repository paired with the stem of its output file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedSpec {
    /// Repository name as known to the registry (e.g. `npm-proxy`).
    pub repository: String,
    /// Used verbatim as `<output_label>.json` inside the output directory.
    pub output_label: String,
}

impl FeedSpec {
    pub fn new(repository: impl Into<String>, output_label: impl Into<String>) -> Self {
        Self {
            repository: repository.into(),
            output_label: output_label.into(),
        }
    }

    /// File name of this feed's export, e.g. `npm_packages.json`.
    pub fn file_name(&self) -> String {
        format!("{}.json", self.output_label)
    }
}

/// The built-in feed list.
pub fn default_feeds() -> Vec<FeedSpec> {
    DEFAULT_FEEDS
        .iter()
        .map(|(repository, label)| FeedSpec::new(*repository, *label))
        .collect()
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Validate a feed before it is exported.
///
/// - `repository` must be non-empty after trimming.
/// - `output_label` must be non-empty, must not be `.` or `..`, and must
///   not contain a path separator.
pub fn validate_feed(feed: &FeedSpec) -> Result<(), CoreError> {
    if feed.repository.trim().is_empty() {
        return Err(CoreError::Validation(
            "Feed repository must not be empty".into(),
        ));
    }

    let label = feed.output_label.as_str();
    if label.trim().is_empty() {
        return Err(CoreError::Validation(format!(
            "Feed '{}' has an empty output label",
            feed.repository
        )));
    }
    if label == "." || label == ".." || label.contains(['/', '\\']) {
        return Err(CoreError::Validation(format!(
            "Output label '{label}' must be a plain file stem"
        )));
    }

    Ok(())
}

/// Parse a comma-separated `repository=label` list.
///
/// An entry without `=` uses the repository name as its label. Blank
/// entries (e.g. from a trailing comma) are skipped, but the list as a
/// whole must contain at least one feed.
pub fn parse_feed_list(raw: &str) -> Result<Vec<FeedSpec>, CoreError> {
    let mut feeds = Vec::new();

    for entry in raw.split(ENTRY_SEPARATOR).map(str::trim) {
        if entry.is_empty() {
            continue;
        }
        let feed = match entry.split_once(LABEL_SEPARATOR) {
            Some((repository, label)) => FeedSpec::new(repository.trim(), label.trim()),
            None => FeedSpec::new(entry, entry),
        };
        validate_feed(&feed)?;
        feeds.push(feed);
    }

    if feeds.is_empty() {
        return Err(CoreError::Validation("Feed list is empty".into()));
    }

    Ok(feeds)
}
