//! Game-policy hooks for decisions this layer doesn't own.
//!
//! Team balance, join broadcasts, and the exact definition of "is this
//! player a spectator" are game rules, not session plumbing. The
//! lifecycle defines [`GamePolicy`] as its seam: the host implements it
//! with real game logic, tests implement it with recorders and forced
//! answers, and the lifecycle stays the same code either way.

use redoubt_record::{SessionRecord, SlotId, Team};

/// Game-side decisions consumed during session initialization and
/// restore.
///
/// Only [`pick_team`](GamePolicy::pick_team) is required; the other
/// hooks default to the behavior most games want.
///
/// # Example
///
/// ```rust
/// use redoubt_session::{GamePolicy, SlotId, Team};
///
/// /// Alternates fresh joins between red and blue.
/// struct AlternatingJoin {
///     next_red: bool,
/// }
///
/// impl GamePolicy for AlternatingJoin {
///     fn pick_team(&mut self, _slot: SlotId) -> Team {
///         self.next_red = !self.next_red;
///         if self.next_red { Team::Red } else { Team::Blue }
///     }
/// }
/// ```
pub trait GamePolicy {
    /// Chooses a team for a first-time connect when auto-join is
    /// enabled. Typically balance-based.
    fn pick_team(&mut self, slot: SlotId) -> Team;

    /// Fired after [`pick_team`](GamePolicy::pick_team) assigns a
    /// team, so the game can broadcast the join. Never fired for
    /// forced-spectator joins. Default: no-op.
    fn announce_team_change(&mut self, _slot: SlotId, _team: Team) {}

    /// The spectator predicate: whether this record describes a player
    /// who is, right now, a spectator. Spectators must not carry a
    /// class, a non-free camera, or a follow target — the lifecycle
    /// strips those whenever this returns `true` (or the team itself
    /// is [`Team::Spectator`]).
    ///
    /// Override when the game has spectator-like states beyond team
    /// membership (limbo, eliminated, ...). Default: team membership.
    fn is_spectator(&self, _slot: SlotId, record: &SessionRecord) -> bool {
        record.team == Team::Spectator
    }
}

// =========================================================================
// Tests
// =========================================================================
