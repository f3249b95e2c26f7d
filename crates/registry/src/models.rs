//! Wire types for the registry's `/v1/components` endpoint.
//!
//! Only the fields the exporter projects are decoded; registry metadata
//! such as `id`, `format`, `group` and `assets` is ignored whatever its
//! shape.

use inventory_core::record::ExportedRecord;
use serde::Deserialize;

/// One component as reported by the registry.
#[derive(Debug, Clone, Deserialize)]
pub struct Component {
    pub repository: String,
    pub name: String,
    #[serde(default)]
    pub version: Option<String>,
}

impl Component {
    /// Project to the exported `(repository, name, version)` record.
    pub fn to_record(&self) -> ExportedRecord {
        ExportedRecord::from_parts(
            self.repository.clone(),
            self.name.clone(),
            self.version.clone(),
        )
    }
}

/// One page of the component listing.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentPage {
    #[serde(default)]
    pub items: Vec<Component>,
    /// Cursor for the next page; `None` means this was the last page.
    #[serde(default)]
    pub continuation_token: Option<String>,
}
