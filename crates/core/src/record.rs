//! The three-field projection written to disk for every registry component.

use serde::Serialize;

/// One exported inventory entry.
///
/// Serializes with exactly the keys `repository`, `name` and `version`, in
/// that order. `version` is `null` when the registry reported none.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportedRecord {
    pub repository: String,
    pub name: String,
    pub version: Option<String>,
}

impl ExportedRecord {
    pub fn from_parts(
        repository: impl Into<String>,
        name: impl Into<String>,
        version: Option<String>,
    ) -> Self {
        Self {
            repository: repository.into(),
            name: name.into(),
            version,
        }
    }
}
