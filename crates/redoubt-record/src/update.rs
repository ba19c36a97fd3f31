//! Sparse session updates and the field-presence merge.
//!
//! A stored document may come from an older schema or a partially
//! written file, so decoding never produces a full record directly.
//! Instead it produces a [`SessionUpdate`]: one `Option` per wire field,
//! `Some` only where the document actually carried the key. [`merge`]
//! then lays the update over a baseline record, and any field the
//! document did not mention keeps the baseline's value.

use crate::types::{
    ClassId, SessionRecord, SpectatorState, Team, MAX_GUID_LEN,
};

// ---------------------------------------------------------------------------
// SessionUpdate
// ---------------------------------------------------------------------------

/// The set of fields a stored document provided.
///
/// The two ignore-mask words travel as separate wire keys
/// (`ignoreClients0` / `ignoreClients1`), so each is independently
/// optional here.
///
/// String fields are owned copies — nothing in an update borrows from
/// the parsed document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionUpdate {
    pub spectator_time: Option<i64>,
    pub spectator_state: Option<SpectatorState>,
    pub spectator_client: Option<i32>,
    pub class: Option<ClassId>,
    pub team: Option<Team>,
    pub admin_level: Option<i32>,
    pub muted: Option<bool>,
    pub shoutcaster: Option<bool>,
    pub ignore_mask_lo: Option<u32>,
    pub ignore_mask_hi: Option<u32>,
    /// `Some("")` means the document explicitly carried an empty
    /// address, which clears the baseline's `ip` on merge.
    pub ip: Option<String>,
    pub guid: Option<String>,
}

impl SessionUpdate {
    /// Returns `true` if no field is present.
    pub fn is_empty(&self) -> bool {
        *self == SessionUpdate::default()
    }
}

// ---------------------------------------------------------------------------
// merge
// ---------------------------------------------------------------------------

/// Lays `update` over `baseline` and returns the result.
///
/// The contract: every `Some` field overwrites the baseline; every
/// absent field passes through unchanged. Pure — no I/O, no logging,
/// no clock.
///
/// Two fields get normalized on the way in:
/// - `ip`: an empty string clears the address to `None` (the encoder
///   writes `""` for "no address", so that's what it means coming back).
/// - `guid`: truncated to [`MAX_GUID_LEN`] bytes.
pub fn merge(
    mut baseline: SessionRecord,
    update: &SessionUpdate,
) -> SessionRecord {
    if let Some(time) = update.spectator_time {
        baseline.spectator_time = time;
    }
    if let Some(state) = update.spectator_state {
        baseline.spectator_state = state;
    }
    if let Some(target) = update.spectator_client {
        baseline.spectator_client = target;
    }
    if let Some(class) = update.class {
        baseline.class = class;
    }
    if let Some(team) = update.team {
        baseline.team = team;
    }
    if let Some(level) = update.admin_level {
        baseline.admin_level = level;
    }
    if let Some(muted) = update.muted {
        baseline.muted = muted;
    }
    if let Some(shoutcaster) = update.shoutcaster {
        baseline.shoutcaster = shoutcaster;
    }
    if let Some(lo) = update.ignore_mask_lo {
        baseline.ignore_clients[0] = lo;
    }
    if let Some(hi) = update.ignore_mask_hi {
        baseline.ignore_clients[1] = hi;
    }
    if let Some(ip) = &update.ip {
        baseline.ip = if ip.is_empty() {
            None
        } else {
            Some(ip.clone())
        };
    }
    if let Some(guid) = &update.guid {
        let mut guid = guid.clone();
        guid.truncate(MAX_GUID_LEN);
        baseline.guid = guid;
    }

    baseline
}

// =========================================================================
// Tests
// =========================================================================
