//! Record types: the per-slot state that survives map changes.
//!
//! A "session record" is the slice of a player's state the server keeps
//! across level loads, tournament restarts, and reconnects. It tracks:
//! - WHERE the player sits (`SlotId`)
//! - WHAT side they're on (`Team`, `ClassId`)
//! - HOW they're spectating, if they are (`SpectatorState`, follow target)
//! - WHO they've muted/ignored, plus admin standing and identity strings

use std::fmt;

use serde::{Deserialize, Serialize};

/// Follow target meaning "spectating nobody in particular".
pub const FOLLOW_NONE: i32 = -1;

/// Longest GUID the server will keep. Longer values from a stored
/// document are truncated on merge.
pub const MAX_GUID_LEN: usize = 32;

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// A fixed roster position on the server.
///
/// Newtype wrapper so a slot index can't be confused with any other
/// integer (a class id, a follow target, ...). Slots are dense and
/// small — `usize` because they index the host's roster array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SlotId(pub usize);

/// Zero-padded to two digits, matching the on-disk file naming.
/// `tracing::warn!(%slot, ...)` will print "07", not "7".
impl fmt::Display for SlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}", self.0)
    }
}

/// The configured ruleset identifier for a server run.
///
/// A change of game mode between runs invalidates every stored session.
/// `#[serde(transparent)]` keeps it a bare number on the wire, so the
/// meta document reads `{"gametype": 5}`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct GameType(pub i32);

impl fmt::Display for GameType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A player-class identifier.
///
/// Class ids are owned by the game's class table, which this layer never
/// sees — the record carries them as opaque numbers. The one value with
/// meaning here is [`ClassId::NONE`]: the class a spectator holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClassId(pub i32);

impl ClassId {
    /// The "no class" sentinel carried by spectators.
    pub const NONE: ClassId = ClassId(0);
}

impl fmt::Display for ClassId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Team
// ---------------------------------------------------------------------------

/// Which side a player is on.
///
/// Stored documents carry teams as plain integers, so there is a raw
/// conversion in each direction. `from_raw` clamps unknown values to
/// `Spectator` — a corrupted team number must never place a player on
/// a playing team (see also [`SpectatorState::from_raw`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Team {
    /// Unassigned (free-for-all rulesets).
    Free,
    Red,
    Blue,
    /// Not playing; watching.
    Spectator,
}

impl Team {
    /// Decodes a wire integer. Unknown values read as `Spectator`.
    pub fn from_raw(raw: i64) -> Team {
        match raw {
            0 => Team::Free,
            1 => Team::Red,
            2 => Team::Blue,
            3 => Team::Spectator,
            _ => Team::Spectator,
        }
    }

    /// The wire integer for this team.
    pub fn as_raw(self) -> i64 {
        match self {
            Team::Free => 0,
            Team::Red => 1,
            Team::Blue => 2,
            Team::Spectator => 3,
        }
    }
}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Team::Free => write!(f, "free"),
            Team::Red => write!(f, "red"),
            Team::Blue => write!(f, "blue"),
            Team::Spectator => write!(f, "spectator"),
        }
    }
}

// ---------------------------------------------------------------------------
// SpectatorState
// ---------------------------------------------------------------------------

/// How a spectating player is viewing the match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpectatorState {
    /// Not spectating at all (on a playing team).
    Not,
    /// Free-flying camera.
    Free,
    /// Locked to another player's view.
    Follow,
    /// Parked on the scoreboard.
    Scoreboard,
}

impl SpectatorState {
    /// Decodes a wire integer. Unknown values read as `Free`, the state
    /// every spectator can safely hold.
    pub fn from_raw(raw: i64) -> SpectatorState {
        match raw {
            0 => SpectatorState::Not,
            1 => SpectatorState::Free,
            2 => SpectatorState::Follow,
            3 => SpectatorState::Scoreboard,
            _ => SpectatorState::Free,
        }
    }

    /// The wire integer for this state.
    pub fn as_raw(self) -> i64 {
        match self {
            SpectatorState::Not => 0,
            SpectatorState::Free => 1,
            SpectatorState::Follow => 2,
            SpectatorState::Scoreboard => 3,
        }
    }
}

// ---------------------------------------------------------------------------
// SessionRecord
// ---------------------------------------------------------------------------

/// One slot's durable session state.
///
/// This is the unit that gets encoded to a per-slot document on
/// disconnect/map change and merged back on reconnect. Everything in it
/// is owned — no references into a parsed document survive past decode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionRecord {
    /// Server time at which the current spectator state began.
    pub spectator_time: i64,

    /// How the player is spectating, if at all.
    pub spectator_state: SpectatorState,

    /// Slot being watched, or [`FOLLOW_NONE`].
    pub spectator_client: i32,

    /// Player class, or [`ClassId::NONE`] for spectators.
    pub class: ClassId,

    /// Current team.
    pub team: Team,

    /// Admin standing granted to this player.
    pub admin_level: i32,

    /// Whether the player's chat is muted.
    pub muted: bool,

    /// Whether the player has shoutcaster privileges.
    pub shoutcaster: bool,

    /// Bitmask of slots this player ignores, 32 slots per word.
    pub ignore_clients: [u32; 2],

    /// The player's IP string. Connection addresses don't survive a map
    /// change on their own, so the record carries a copy. `None` when
    /// unknown.
    pub ip: Option<String>,

    /// The player's GUID, empty when unknown. At most [`MAX_GUID_LEN`]
    /// bytes after a merge.
    pub guid: String,
}

/// The baseline every load and merge starts from: a free-flying
/// spectator with no class, no follow target, and nothing ignored.
/// Invariant-clean by construction.
impl Default for SessionRecord {
    fn default() -> Self {
        Self {
            spectator_time: 0,
            spectator_state: SpectatorState::Free,
            spectator_client: FOLLOW_NONE,
            class: ClassId::NONE,
            team: Team::Spectator,
            admin_level: 0,
            muted: false,
            shoutcaster: false,
            ignore_clients: [0, 0],
            ip: None,
            guid: String::new(),
        }
    }
}

impl SessionRecord {
    /// Strips the play-state fields a spectator must not carry:
    /// class becomes [`ClassId::NONE`], the camera goes free, and any
    /// follow target is dropped. The team itself is left alone — the
    /// caller decides team membership.
    pub fn clear_play_state(&mut self) {
        self.class = ClassId::NONE;
        self.spectator_state = SpectatorState::Free;
        self.spectator_client = FOLLOW_NONE;
    }
}

// =========================================================================
// Tests
// =========================================================================
