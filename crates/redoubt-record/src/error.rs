//! Error types for the record layer.

/// Errors that can occur while converting records to/from documents.
///
/// Note what is NOT here: a missing or mistyped individual field is not
/// an error. Decoding only fails when the bytes don't form a JSON
/// object at all — everything short of that degrades per-field through
/// the sparse-update merge.
#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    /// Serialization failed (turning a record into document bytes).
    #[error("encode failed: {0}")]
    Encode(serde_json::Error),

    /// The stored bytes don't parse as a JSON object.
    #[error("decode failed: {0}")]
    Decode(serde_json::Error),
}
