//! JSON codec for session documents.
//!
//! Two document shapes live on disk:
//! - the per-slot record (`client<NN>.json`) — every field of
//!   [`SessionRecord`], numbers for numbers, 0/1 for booleans,
//!   strings for `ipStr`/`guidStr` (empty when unknown);
//! - the world meta (`meta.json`) — a single `gametype` number.
//!
//! Encoding is total: a record always serializes to the full key set.
//! Decoding is deliberately lopsided: the only hard failure is bytes
//! that aren't a JSON object at all. Individual keys that are missing,
//! mistyped, or out of range simply don't make it into the
//! [`SessionUpdate`] — the merge baseline covers for them. A
//! half-written or older-schema file must never zero out state it
//! doesn't mention.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::RecordError;
use crate::types::{
    ClassId, GameType, SessionRecord, SpectatorState, Team,
};
use crate::update::SessionUpdate;

// ---------------------------------------------------------------------------
// Encoding
// ---------------------------------------------------------------------------

/// The on-disk shape of a per-slot record. Field names here ARE the
/// wire keys (via `rename_all`), so this struct is the format contract.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct WireRecord<'a> {
    spectator_time: i64,
    spectator_state: i64,
    spectator_client: i32,
    session_class: i32,
    session_team: i64,
    admin_level: i32,
    muted: u8,
    shoutcaster: u8,
    ignore_clients0: u32,
    ignore_clients1: u32,
    ip_str: &'a str,
    guid_str: &'a str,
}

/// Serializes a record to its full JSON document.
pub fn encode(record: &SessionRecord) -> Result<Vec<u8>, RecordError> {
    let wire = WireRecord {
        spectator_time: record.spectator_time,
        spectator_state: record.spectator_state.as_raw(),
        spectator_client: record.spectator_client,
        session_class: record.class.0,
        session_team: record.team.as_raw(),
        admin_level: record.admin_level,
        muted: record.muted as u8,
        shoutcaster: record.shoutcaster as u8,
        ignore_clients0: record.ignore_clients[0],
        ignore_clients1: record.ignore_clients[1],
        ip_str: record.ip.as_deref().unwrap_or(""),
        guid_str: &record.guid,
    };

    serde_json::to_vec_pretty(&wire).map_err(RecordError::Encode)
}

// ---------------------------------------------------------------------------
// Decoding
// ---------------------------------------------------------------------------

/// Parses a stored document into the sparse set of fields it carries.
///
/// # Errors
/// [`RecordError::Decode`] only when the bytes aren't a JSON object.
/// Anything salvageable decodes; see the module docs for the contract.
pub fn decode(bytes: &[u8]) -> Result<SessionUpdate, RecordError> {
    let doc: Map<String, Value> =
        serde_json::from_slice(bytes).map_err(RecordError::Decode)?;

    Ok(SessionUpdate {
        spectator_time: int(&doc, "spectatorTime"),
        spectator_state: int(&doc, "spectatorState")
            .map(SpectatorState::from_raw),
        spectator_client: int_as(&doc, "spectatorClient"),
        class: int_as(&doc, "sessionClass").map(ClassId),
        team: int(&doc, "sessionTeam").map(Team::from_raw),
        admin_level: int_as(&doc, "adminLevel"),
        muted: int(&doc, "muted").map(|v| v != 0),
        shoutcaster: int(&doc, "shoutcaster").map(|v| v != 0),
        ignore_mask_lo: int_as(&doc, "ignoreClients0"),
        ignore_mask_hi: int_as(&doc, "ignoreClients1"),
        ip: str_field(&doc, "ipStr"),
        guid: str_field(&doc, "guidStr"),
    })
}

/// Reads a numeric field. A missing key or a non-numeric value both
/// read as absent.
fn int(doc: &Map<String, Value>, key: &str) -> Option<i64> {
    doc.get(key).and_then(Value::as_i64)
}

/// Reads a numeric field into a narrower integer type. Values that
/// don't fit read as absent.
fn int_as<T: TryFrom<i64>>(
    doc: &Map<String, Value>,
    key: &str,
) -> Option<T> {
    int(doc, key).and_then(|v| T::try_from(v).ok())
}

/// Reads a string field into owned storage. The document's lifetime
/// ends with this call, so the value is copied out.
fn str_field(doc: &Map<String, Value>, key: &str) -> Option<String> {
    doc.get(key).and_then(Value::as_str).map(str::to_owned)
}

// ---------------------------------------------------------------------------
// World meta document
// ---------------------------------------------------------------------------

/// `meta.json` carries exactly one value.
#[derive(Serialize, Deserialize)]
struct WireMeta {
    gametype: GameType,
}

/// Serializes the world meta document for the given game mode.
pub fn encode_meta(gametype: GameType) -> Result<Vec<u8>, RecordError> {
    serde_json::to_vec_pretty(&WireMeta { gametype })
        .map_err(RecordError::Encode)
}

/// Parses a world meta document.
///
/// # Errors
/// [`RecordError::Decode`] if the bytes aren't a JSON object or the
/// `gametype` key is missing — a meta file without a game mode says
/// nothing about whether stored sessions are still valid.
pub fn decode_meta(bytes: &[u8]) -> Result<GameType, RecordError> {
    let meta: WireMeta =
        serde_json::from_slice(bytes).map_err(RecordError::Decode)?;
    Ok(meta.gametype)
}

// =========================================================================
// Tests
// =========================================================================
