//! The world meta file: one global value gating every client record.
//!
//! `<base>/session/meta.json` records the game mode the server was
//! running when the client files were last written. On the next world
//! load that stored mode is compared against the configured one; a
//! mismatch (or no readable meta at all) means every client file on
//! disk belongs to a dead session epoch.

use std::fs;
use std::path::{Path, PathBuf};

use redoubt_record::{decode_meta, encode_meta, GameType};

use crate::{StoreError, SESSION_DIR};

/// Returns `true` only when a stored game mode exists and matches the
/// configured one. `None` (no meta, or meta that didn't parse) always
/// fails the check — with no readable epoch marker, stored sessions
/// can't be trusted.
pub fn is_valid(stored: Option<GameType>, configured: GameType) -> bool {
    stored == Some(configured)
}

/// Durable storage for the world meta document.
///
/// Same read/write discipline as the client store: reads degrade to
/// `None`, writes report failure, file handles never outlive the call.
#[derive(Debug, Clone)]
pub struct WorldMetaStore {
    dir: PathBuf,
}

impl WorldMetaStore {
    /// Creates a store rooted at `<base>/session/`.
    pub fn new(base: impl AsRef<Path>) -> Self {
        Self {
            dir: base.as_ref().join(SESSION_DIR),
        }
    }

    /// The meta file path: `<base>/session/meta.json`.
    pub fn path(&self) -> PathBuf {
        self.dir.join("meta.json")
    }

    /// Reads the stored game mode, or `None` if the meta file is
    /// missing, empty, unreadable, or unparseable. The unparseable case
    /// is logged so a discarded file is distinguishable from an absent
    /// one.
    pub fn read(&self) -> Option<GameType> {
        let path = self.path();

        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(err) => {
                tracing::debug!(
                    path = %path.display(),
                    error = %err,
                    "no session meta file"
                );
                return None;
            }
        };

        if bytes.is_empty() {
            tracing::debug!("session meta file is empty");
            return None;
        }

        match decode_meta(&bytes) {
            Ok(gametype) => Some(gametype),
            Err(err) => {
                tracing::warn!(
                    error = %err,
                    "discarding unparseable session meta"
                );
                None
            }
        }
    }

    /// Overwrites the meta file with a document containing only the
    /// given game mode.
    pub fn write(&self, gametype: GameType) -> Result<(), StoreError> {
        let bytes = encode_meta(gametype)?;
        let path = self.path();

        fs::create_dir_all(&self.dir).map_err(|source| StoreError::Io {
            path: self.dir.clone(),
            source,
        })?;

        tracing::debug!(
            %gametype,
            path = %path.display(),
            "writing session meta file"
        );
        fs::write(&path, bytes)
            .map_err(|source| StoreError::Io { path, source })
    }
}

// =========================================================================
// Tests
// =========================================================================
