//! Per-slot client session files.
//!
//! Each roster slot owns exactly one file, named after the slot index:
//! `<base>/session/client<NN>.json`. The name is a pure function of the
//! slot, so the same slot finds its own record again after a restart.

use std::fs;
use std::path::{Path, PathBuf};

use redoubt_record::{decode, encode, SessionRecord, SessionUpdate, SlotId};

use crate::{StoreError, SESSION_DIR};

/// Durable storage for one record per roster slot.
///
/// Reads are infallible by design: whatever is wrong with a slot's file
/// — missing, empty, unreadable, unparseable — the answer is "no stored
/// session" and the caller falls back to defaults. Writes report
/// failure so the caller can log it, but a failed write never leaves a
/// file handle open: each call opens, writes, and closes within its own
/// scope.
#[derive(Debug, Clone)]
pub struct ClientSessionStore {
    dir: PathBuf,
}

impl ClientSessionStore {
    /// Creates a store rooted at `<base>/session/`.
    ///
    /// The directory itself is created lazily, on the first write.
    pub fn new(base: impl AsRef<Path>) -> Self {
        Self {
            dir: base.as_ref().join(SESSION_DIR),
        }
    }

    /// The file owned by `slot`: `client<NN>.json`, zero-padded to two
    /// digits, stable across restarts.
    pub fn path_for(&self, slot: SlotId) -> PathBuf {
        self.dir.join(format!("client{slot}.json"))
    }

    /// Reads the stored update for `slot`, or `None` if there is no
    /// usable stored session.
    ///
    /// A file that exists but doesn't parse is discarded — same result
    /// as no file, but logged at `warn` with the slot index so the
    /// discard is visible to operators.
    pub fn read(&self, slot: SlotId) -> Option<SessionUpdate> {
        let path = self.path_for(slot);

        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(err) => {
                tracing::debug!(
                    %slot,
                    path = %path.display(),
                    error = %err,
                    "no client session file"
                );
                return None;
            }
        };

        if bytes.is_empty() {
            tracing::debug!(%slot, "client session file is empty");
            return None;
        }

        match decode(&bytes) {
            Ok(update) => Some(update),
            Err(err) => {
                tracing::warn!(
                    %slot,
                    error = %err,
                    "discarding unparseable client session data"
                );
                None
            }
        }
    }

    /// Encodes `record` and replaces the entire contents of the slot's
    /// file. No partial or append writes.
    pub fn write(
        &self,
        slot: SlotId,
        record: &SessionRecord,
    ) -> Result<(), StoreError> {
        let bytes = encode(record)?;
        let path = self.path_for(slot);

        fs::create_dir_all(&self.dir).map_err(|source| StoreError::Io {
            path: self.dir.clone(),
            source,
        })?;

        tracing::debug!(
            %slot,
            path = %path.display(),
            "writing client session file"
        );
        fs::write(&path, bytes)
            .map_err(|source| StoreError::Io { path, source })
    }
}

// =========================================================================
// Tests
// =========================================================================
