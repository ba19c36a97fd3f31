//! Per-world ambient state, passed explicitly.
//!
//! The host knows the configured game mode, whether the match has
//! started, whether fresh joins auto-assign a team, and what time it
//! is. None of that lives in process-wide globals here — lifecycle
//! operations take a [`WorldContext`] snapshot so every decision is
//! traceable to its inputs.

use redoubt_record::GameType;

/// A snapshot of the server state a lifecycle operation depends on.
///
/// Cheap to copy; build one per host event (world load, connect,
/// shutdown sweep) from the host's own configuration.
#[derive(Debug, Clone, Copy)]
pub struct WorldContext {
    /// The configured ruleset for this server run. Compared against
    /// the stored epoch marker at world load; written back at
    /// shutdown.
    pub gametype: GameType,

    /// Whether active gameplay has started. Before that, every
    /// restored session lands in the spectator team no matter what the
    /// stored document says.
    pub match_started: bool,

    /// Whether first-time connects are auto-assigned to a playing team
    /// (via [`GamePolicy::pick_team`](crate::GamePolicy::pick_team))
    /// instead of starting as spectators.
    pub auto_join: bool,

    /// Current server time, recorded as `spectator_time` on freshly
    /// initialized records.
    pub now: i64,
}
