//! Session lifecycle management for Redoubt.
//!
//! This crate decides when per-slot session records are initialized,
//! restored, or discarded:
//!
//! 1. **World validation** — checking the stored epoch marker against
//!    the configured game mode ([`SessionLifecycle::begin_world`],
//!    [`WorldGate`])
//! 2. **Connect handling** — fresh defaults vs. restored state
//!    ([`SessionLifecycle::connect`], [`SessionInit`])
//! 3. **Persistence sweeps** — disconnect writes and the
//!    meta-then-roster shutdown sweep ([`SessionLifecycle::persist`])
//!
//! Game rules stay on the host side of the [`GamePolicy`] trait;
//! ambient server state arrives per call in a [`WorldContext`].
//!
//! # How it fits in the stack
//!
//! ```text
//! Host lifecycle hooks (above)  ← world load, connect, disconnect, shutdown
//!     ↕
//! Session layer (this crate)    ← decides init / restore / discard
//!     ↕
//! Store + record layers (below) ← files and document merge
//! ```

mod context;
mod lifecycle;
mod policy;

pub use context::WorldContext;
pub use lifecycle::{SessionInit, SessionLifecycle, WorldGate};
pub use policy::GamePolicy;

// The record vocabulary is half of this crate's API surface; re-export
// it so hosts don't need a separate redoubt-record dependency.
pub use redoubt_record::{
    ClassId, GameType, SessionRecord, SlotId, SpectatorState, Team,
    FOLLOW_NONE,
};
