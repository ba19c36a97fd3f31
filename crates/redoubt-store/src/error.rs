//! Error types for the store layer.

use std::path::PathBuf;

use redoubt_record::RecordError;

/// Errors that can occur while persisting session files.
///
/// Only writes surface errors. Reads never do: an absent, empty,
/// unreadable, or unparseable file all mean "no stored session", and
/// the store reports that as `None` (logging the unparseable case so
/// operators can tell discarded data from missing data).
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The record could not be turned into a document.
    #[error("could not encode session document: {0}")]
    Encode(#[from] RecordError),

    /// The filesystem rejected the write.
    #[error("could not write {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}
