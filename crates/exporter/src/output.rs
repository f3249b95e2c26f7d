//! Output directory preparation and export file writing.

use std::path::Path;

use inventory_core::record::ExportedRecord;

use crate::error::ExportError;

/// How an already-existing output directory is treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputDirMode {
    /// The directory must not exist yet. Protects a previous run's files.
    #[default]
    Fresh,
    /// Create the directory if absent, otherwise use it as is.
    Reuse,
}

impl OutputDirMode {
    /// Parse from the `NEXUS_OUTPUT_DIR_MODE` value (case-insensitive).
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "fresh" => Some(Self::Fresh),
            "reuse" => Some(Self::Reuse),
            _ => None,
        }
    }
}

/// Make the output directory ready before any feed is exported.
pub fn prepare_output_dir(path: &Path, mode: OutputDirMode) -> Result<(), ExportError> {
    let result = match mode {
        OutputDirMode::Fresh => std::fs::create_dir(path),
        OutputDirMode::Reuse => std::fs::create_dir_all(path),
    };

    match result {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
            Err(ExportError::OutputDirExists(path.to_path_buf()))
        }
        Err(source) => Err(ExportError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Write `records` as one JSON array, replacing any existing file.
pub fn write_records(path: &Path, records: &[ExportedRecord]) -> Result<(), ExportError> {
    let json = serde_json::to_vec(records)?;
    std::fs::write(path, json).map_err(|source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    })
}
