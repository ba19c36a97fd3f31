//! The session lifecycle: when records are built, loaded, or discarded.
//!
//! Of all the state a server holds about a player, the session record
//! is the one piece expected to outlive level loads and tournament
//! restarts. This module decides what happens to it at each host
//! event:
//!
//! - **world load** → validate the stored epoch against the configured
//!   game mode ([`SessionLifecycle::begin_world`])
//! - **client connect** → restore a stored record or initialize a
//!   fresh one ([`SessionLifecycle::connect`])
//! - **client disconnect** → persist that one record
//!   ([`SessionLifecycle::disconnect`])
//! - **shutdown / map change** → persist the epoch marker and the full
//!   roster ([`SessionLifecycle::persist`])
//!
//! Per slot, a connect takes one of two paths:
//!
//! ```text
//!   Unconnected ──(no stored record, or epoch invalid)──→ Fresh ──→ Active
//!   Unconnected ──(stored record, epoch valid)─────────→ Resumed ─→ Active
//! ```
//!
//! Nothing in here returns an error to the host. Losing session
//! continuity is recoverable (the player gets fresh defaults); every
//! failure is logged and degraded locally.

use std::path::Path;

use redoubt_record::{
    merge, SessionRecord, SessionUpdate, SlotId, SpectatorState, Team,
    FOLLOW_NONE,
};
use redoubt_store::{is_valid, ClientSessionStore, WorldMetaStore};

use crate::{GamePolicy, WorldContext};

// ---------------------------------------------------------------------------
// WorldGate
// ---------------------------------------------------------------------------

/// The world-level trust gate over stored client records.
///
/// Computed once per world load and held until the next one:
///
/// ```text
///   Unvalidated ──(begin_world, meta matches)────→ Validated
///   Unvalidated ──(begin_world, meta absent/stale)→ Invalidated
/// ```
///
/// - **Unvalidated**: no world load has checked the stored epoch yet.
///   Treated like Invalidated for reads — unchecked data is untrusted
///   data.
/// - **Validated**: the meta file's game mode matches the configured
///   one; per-slot files are live.
/// - **Invalidated**: the game mode changed (or no readable meta
///   exists). Every per-slot read this world load is treated as
///   absent, regardless of what the files contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorldGate {
    Unvalidated,
    Validated,
    Invalidated,
}

impl WorldGate {
    /// Returns `true` if per-slot files may be read this world load.
    pub fn trusts_stored_sessions(&self) -> bool {
        matches!(self, WorldGate::Validated)
    }
}

// ---------------------------------------------------------------------------
// SessionInit
// ---------------------------------------------------------------------------

/// How a connecting client's record came to be.
///
/// Hosts mostly just take the record, but the distinction matters for
/// greetings, first-join broadcasts, and tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionInit {
    /// First-time connect (or stored data was discarded): built from
    /// defaults and already persisted.
    Fresh(SessionRecord),

    /// Reconnect: merged from the slot's stored document. Not
    /// persisted until disconnect or the shutdown sweep.
    Resumed(SessionRecord),
}

impl SessionInit {
    /// The record, however it was produced.
    pub fn record(&self) -> &SessionRecord {
        match self {
            SessionInit::Fresh(record) => record,
            SessionInit::Resumed(record) => record,
        }
    }

    /// Consumes the init and returns the record.
    pub fn into_record(self) -> SessionRecord {
        match self {
            SessionInit::Fresh(record) => record,
            SessionInit::Resumed(record) => record,
        }
    }

    /// Returns `true` for the reconnect path.
    pub fn is_resumed(&self) -> bool {
        matches!(self, SessionInit::Resumed(_))
    }
}

// ---------------------------------------------------------------------------
// SessionLifecycle
// ---------------------------------------------------------------------------

/// Orchestrates session persistence across one server process.
///
/// Owns the two stores and the game-policy implementation; the host
/// calls in from its lifecycle hooks and keeps the returned records in
/// its own roster. Single-threaded by design — every operation is a
/// short, blocking file exchange invoked inline from a host event.
pub struct SessionLifecycle<P: GamePolicy> {
    clients: ClientSessionStore,
    meta: WorldMetaStore,
    policy: P,
    gate: WorldGate,
}

impl<P: GamePolicy> SessionLifecycle<P> {
    /// Creates a lifecycle storing session files under
    /// `<base>/session/`.
    pub fn new(base: impl AsRef<Path>, policy: P) -> Self {
        let base = base.as_ref();
        Self {
            clients: ClientSessionStore::new(base),
            meta: WorldMetaStore::new(base),
            policy,
            gate: WorldGate::Unvalidated,
        }
    }

    /// The current world gate.
    pub fn gate(&self) -> WorldGate {
        self.gate
    }

    /// The policy implementation, for hosts that need it back.
    pub fn policy(&self) -> &P {
        &self.policy
    }

    /// Called once per world load, before any client connects.
    ///
    /// Reads the stored epoch marker and decides whether the per-slot
    /// files on disk belong to this server configuration. The result
    /// holds until the next world load.
    pub fn begin_world(&mut self, ctx: &WorldContext) -> WorldGate {
        let stored = self.meta.read();

        self.gate = if is_valid(stored, ctx.gametype) {
            tracing::info!(
                gametype = %ctx.gametype,
                "session epoch matches, stored sessions are live"
            );
            WorldGate::Validated
        } else {
            match stored {
                Some(stored) => tracing::info!(
                    %stored,
                    configured = %ctx.gametype,
                    "game mode changed, discarding stored sessions"
                ),
                None => tracing::info!(
                    "no readable session meta, starting a fresh epoch"
                ),
            }
            WorldGate::Invalidated
        };

        self.gate
    }

    /// Handles a client arriving in `slot`.
    ///
    /// Reads the slot's stored document (skipped entirely while the
    /// gate distrusts stored sessions) and either resumes it or builds
    /// a fresh record. A fresh record is persisted immediately, so a
    /// server restart before the player disconnects doesn't lose it.
    pub fn connect(
        &mut self,
        slot: SlotId,
        ctx: &WorldContext,
    ) -> SessionInit {
        let stored = if self.gate.trusts_stored_sessions() {
            self.clients.read(slot)
        } else {
            None
        };

        match stored {
            Some(update) => {
                tracing::info!(%slot, "restoring stored session");
                SessionInit::Resumed(self.resume(slot, update, ctx))
            }
            None => {
                tracing::info!(%slot, "initializing fresh session");
                SessionInit::Fresh(self.first_connect(slot, ctx))
            }
        }
    }

    /// Persists one slot's record as the player leaves. Best-effort:
    /// a failed write costs that player their continuity, nothing
    /// more.
    pub fn disconnect(&mut self, slot: SlotId, record: &SessionRecord) {
        if let Err(err) = self.clients.write(slot, record) {
            tracing::warn!(
                %slot,
                error = %err,
                "could not persist session on disconnect"
            );
        }
    }

    /// The shutdown / map-change sweep.
    ///
    /// Sequencing contract: the epoch marker is written FIRST, then one
    /// file per connected slot in roster order. A crash between the two
    /// leaves the marker current and some client files stale — which is
    /// fine, because stale-but-present files still face the epoch check
    /// on the next world load. Every write is best-effort; one slot's
    /// failure never stops the sweep.
    pub fn persist<'a>(
        &mut self,
        ctx: &WorldContext,
        connected: impl IntoIterator<Item = (SlotId, &'a SessionRecord)>,
    ) {
        if let Err(err) = self.meta.write(ctx.gametype) {
            tracing::warn!(error = %err, "could not write session meta");
        }

        let mut written = 0usize;
        for (slot, record) in connected {
            match self.clients.write(slot, record) {
                Ok(()) => written += 1,
                Err(err) => tracing::warn!(
                    %slot,
                    error = %err,
                    "could not write client session"
                ),
            }
        }

        tracing::info!(written, "session sweep complete");
    }

    // -- Connect paths ----------------------------------------------------

    /// Builds and persists the defaults for a first-time connect.
    fn first_connect(
        &mut self,
        slot: SlotId,
        ctx: &WorldContext,
    ) -> SessionRecord {
        let mut record = SessionRecord::default();

        record.team = if ctx.auto_join {
            let team = self.policy.pick_team(slot);
            self.policy.announce_team_change(slot, team);
            team
        } else {
            // Without auto-join everyone spawns watching.
            Team::Spectator
        };

        if record.team == Team::Spectator
            || self.policy.is_spectator(slot, &record)
        {
            record.clear_play_state();
        } else {
            record.spectator_state = SpectatorState::Not;
        }

        record.spectator_client = FOLLOW_NONE;
        record.spectator_time = ctx.now;
        record.ignore_clients = [0, 0];
        record.muted = false;

        if let Err(err) = self.clients.write(slot, &record) {
            tracing::warn!(
                %slot,
                error = %err,
                "could not persist fresh session"
            );
        }

        record
    }

    /// Merges a stored document over fresh defaults and re-establishes
    /// the load invariants.
    ///
    /// The baseline is always `SessionRecord::default()`, never
    /// whatever record previously occupied the slot — the host may have
    /// recycled it for a different player.
    fn resume(
        &mut self,
        slot: SlotId,
        update: SessionUpdate,
        ctx: &WorldContext,
    ) -> SessionRecord {
        let mut record = merge(SessionRecord::default(), &update);

        // Before the match starts, everyone comes back as a spectator,
        // whatever the document said.
        if !ctx.match_started {
            record.team = Team::Spectator;
        }

        // Spectators carry no class, a free camera, and no follow
        // target. Checked against the post-merge team/class values.
        if record.team == Team::Spectator
            || self.policy.is_spectator(slot, &record)
        {
            record.clear_play_state();
        }

        record
    }
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    //! Lifecycle tests drive the real stores against a temp directory
    //! and a recording policy double; nothing is mocked below the
    //! policy seam.

    use super::*;
    use redoubt_record::{ClassId, GameType};
    use std::fs;
    use tempfile::TempDir;

    // -- Helpers ----------------------------------------------------------

    /// Policy double: records every call, answers from canned values.
    struct TestPolicy {
        /// What `pick_team` hands out; `None` makes a call a test
        /// failure.
        assign: Option<Team>,
        /// Forces the spectator predicate to `true` regardless of team.
        force_spectator: bool,
        picks: Vec<SlotId>,
        announced: Vec<(SlotId, Team)>,
    }

    impl TestPolicy {
        fn passive() -> Self {
            Self {
                assign: None,
                force_spectator: false,
                picks: Vec::new(),
                announced: Vec::new(),
            }
        }

        fn assigning(team: Team) -> Self {
            Self {
                assign: Some(team),
                ..Self::passive()
            }
        }
    }

    impl GamePolicy for TestPolicy {
        fn pick_team(&mut self, slot: SlotId) -> Team {
            self.picks.push(slot);
            self.assign.expect("pick_team should not have been called")
        }

        fn announce_team_change(&mut self, slot: SlotId, team: Team) {
            self.announced.push((slot, team));
        }

        fn is_spectator(
            &self,
            _slot: SlotId,
            record: &SessionRecord,
        ) -> bool {
            self.force_spectator || record.team == Team::Spectator
        }
    }

    const NOW: i64 = 120_000;

    fn ctx(gametype: i32) -> WorldContext {
        WorldContext {
            gametype: GameType(gametype),
            match_started: true,
            auto_join: false,
            now: NOW,
        }
    }

    fn lifecycle(
        dir: &TempDir,
        policy: TestPolicy,
    ) -> SessionLifecycle<TestPolicy> {
        SessionLifecycle::new(dir.path(), policy)
    }

    /// A stored record worth resuming: a red engineer with history.
    fn stored_record() -> SessionRecord {
        SessionRecord {
            spectator_time: 45_000,
            spectator_state: SpectatorState::Not,
            spectator_client: FOLLOW_NONE,
            class: ClassId(3),
            team: Team::Red,
            admin_level: 2,
            muted: true,
            shoutcaster: false,
            ignore_clients: [4, 0],
            ip: Some("192.0.2.17".to_string()),
            guid: "A1B2C3".to_string(),
        }
    }

    /// Seeds a slot's file on disk, bypassing the lifecycle.
    fn seed_client(dir: &TempDir, slot: SlotId, record: &SessionRecord) {
        ClientSessionStore::new(dir.path())
            .write(slot, record)
            .expect("seeding should succeed");
    }

    fn seed_meta(dir: &TempDir, gametype: i32) {
        WorldMetaStore::new(dir.path())
            .write(GameType(gametype))
            .expect("seeding should succeed");
    }

    // =====================================================================
    // begin_world()
    // =====================================================================

    #[test]
    fn test_begin_world_matching_meta_validates() {
        let dir = TempDir::new().unwrap();
        seed_meta(&dir, 5);
        let mut sessions = lifecycle(&dir, TestPolicy::passive());

        let gate = sessions.begin_world(&ctx(5));

        assert_eq!(gate, WorldGate::Validated);
        assert!(sessions.gate().trusts_stored_sessions());
    }

    #[test]
    fn test_begin_world_mismatched_meta_invalidates() {
        let dir = TempDir::new().unwrap();
        seed_meta(&dir, 5);
        let mut sessions = lifecycle(&dir, TestPolicy::passive());

        let gate = sessions.begin_world(&ctx(7));

        assert_eq!(gate, WorldGate::Invalidated);
    }

    #[test]
    fn test_begin_world_missing_meta_invalidates() {
        let dir = TempDir::new().unwrap();
        let mut sessions = lifecycle(&dir, TestPolicy::passive());

        assert_eq!(sessions.begin_world(&ctx(5)), WorldGate::Invalidated);
    }

    #[test]
    fn test_begin_world_unparseable_meta_invalidates() {
        let dir = TempDir::new().unwrap();
        let meta = WorldMetaStore::new(dir.path());
        fs::create_dir_all(meta.path().parent().unwrap()).unwrap();
        fs::write(meta.path(), b"}{ nope").unwrap();
        let mut sessions = lifecycle(&dir, TestPolicy::passive());

        assert_eq!(sessions.begin_world(&ctx(5)), WorldGate::Invalidated);
    }

    // =====================================================================
    // connect() — first-time path
    // =====================================================================

    #[test]
    fn test_connect_no_file_initializes_spectator_defaults() {
        // No existing file, auto-join disabled, match not started.
        let dir = TempDir::new().unwrap();
        let mut sessions = lifecycle(&dir, TestPolicy::passive());
        sessions.begin_world(&ctx(5));
        let world = WorldContext {
            match_started: false,
            ..ctx(5)
        };

        let init = sessions.connect(SlotId(3), &world);

        let SessionInit::Fresh(record) = &init else {
            panic!("expected a fresh session, got {init:?}");
        };
        assert_eq!(record.team, Team::Spectator);
        assert_eq!(record.class, ClassId::NONE);
        assert_eq!(record.spectator_state, SpectatorState::Free);
        assert_eq!(record.spectator_client, FOLLOW_NONE);
        assert_eq!(record.spectator_time, NOW);
        assert_eq!(record.ignore_clients, [0, 0]);
        assert!(!record.muted);
    }

    #[test]
    fn test_connect_fresh_session_is_persisted_immediately() {
        // A restart before the player ever disconnects must not lose
        // the freshly created record.
        let dir = TempDir::new().unwrap();
        let mut sessions = lifecycle(&dir, TestPolicy::passive());
        sessions.begin_world(&ctx(5));

        let record = sessions.connect(SlotId(3), &ctx(5)).into_record();

        let path = dir.path().join("session").join("client03.json");
        assert!(path.is_file(), "fresh session file missing");

        let doc: serde_json::Value =
            serde_json::from_slice(&fs::read(path).unwrap()).unwrap();
        assert_eq!(doc["spectatorTime"], NOW);
        assert_eq!(doc["sessionTeam"], Team::Spectator.as_raw());
        assert_eq!(doc["sessionClass"], 0);
        assert_eq!(doc["spectatorClient"], -1);
        assert_eq!(doc["ignoreClients0"], 0);
        assert_eq!(doc["ignoreClients1"], 0);
        assert_eq!(doc["muted"], 0);

        // And reading it back restores the same record.
        let update = ClientSessionStore::new(dir.path())
            .read(SlotId(3))
            .expect("file should be readable");
        assert_eq!(merge(SessionRecord::default(), &update), record);
    }

    #[test]
    fn test_connect_auto_join_assigns_team_and_announces() {
        let dir = TempDir::new().unwrap();
        let mut sessions =
            lifecycle(&dir, TestPolicy::assigning(Team::Red));
        sessions.begin_world(&ctx(5));
        let world = WorldContext {
            auto_join: true,
            ..ctx(5)
        };

        let record = sessions.connect(SlotId(1), &world).into_record();

        assert_eq!(record.team, Team::Red);
        assert_eq!(record.spectator_state, SpectatorState::Not);
        assert_eq!(record.spectator_client, FOLLOW_NONE);
        assert_eq!(sessions.policy().picks, vec![SlotId(1)]);
        assert_eq!(sessions.policy().announced, vec![(SlotId(1), Team::Red)]);
    }

    #[test]
    fn test_connect_without_auto_join_never_consults_the_picker() {
        let dir = TempDir::new().unwrap();
        // `passive` panics if pick_team fires.
        let mut sessions = lifecycle(&dir, TestPolicy::passive());
        sessions.begin_world(&ctx(5));

        sessions.connect(SlotId(0), &ctx(5));

        assert!(sessions.policy().picks.is_empty());
        assert!(sessions.policy().announced.is_empty());
    }

    #[test]
    fn test_connect_auto_join_spectator_pick_keeps_play_state_clean() {
        // The picker is allowed to answer "spectator" (full server,
        // say); the record must then be invariant-clean.
        let dir = TempDir::new().unwrap();
        let mut sessions =
            lifecycle(&dir, TestPolicy::assigning(Team::Spectator));
        sessions.begin_world(&ctx(5));
        let world = WorldContext {
            auto_join: true,
            ..ctx(5)
        };

        let record = sessions.connect(SlotId(2), &world).into_record();

        assert_eq!(record.team, Team::Spectator);
        assert_eq!(record.class, ClassId::NONE);
        assert_eq!(record.spectator_state, SpectatorState::Free);
    }

    // =====================================================================
    // connect() — resume path
    // =====================================================================

    #[test]
    fn test_connect_stored_record_resumes_merged_state() {
        let dir = TempDir::new().unwrap();
        seed_meta(&dir, 5);
        seed_client(&dir, SlotId(4), &stored_record());
        let mut sessions = lifecycle(&dir, TestPolicy::passive());
        sessions.begin_world(&ctx(5));

        let init = sessions.connect(SlotId(4), &ctx(5));

        assert!(init.is_resumed());
        assert_eq!(init.into_record(), stored_record());
    }

    #[test]
    fn test_connect_resume_does_not_rewrite_the_file() {
        let dir = TempDir::new().unwrap();
        seed_meta(&dir, 5);
        seed_client(&dir, SlotId(4), &stored_record());
        let path = dir.path().join("session").join("client04.json");
        let before = fs::read(&path).unwrap();
        let mut sessions = lifecycle(&dir, TestPolicy::passive());
        sessions.begin_world(&ctx(5));

        sessions.connect(SlotId(4), &ctx(5));

        assert_eq!(fs::read(&path).unwrap(), before);
    }

    #[test]
    fn test_connect_match_not_started_forces_spectator() {
        // The stored document says red; the world says warmup.
        let dir = TempDir::new().unwrap();
        seed_meta(&dir, 5);
        seed_client(&dir, SlotId(4), &stored_record());
        let mut sessions = lifecycle(&dir, TestPolicy::passive());
        sessions.begin_world(&ctx(5));
        let world = WorldContext {
            match_started: false,
            ..ctx(5)
        };

        let record = sessions.connect(SlotId(4), &world).into_record();

        assert_eq!(record.team, Team::Spectator);
        // Forced spectators are invariant-clean too.
        assert_eq!(record.class, ClassId::NONE);
        assert_eq!(record.spectator_state, SpectatorState::Free);
        assert_eq!(record.spectator_client, FOLLOW_NONE);
        // Non-team state survives the demotion.
        assert_eq!(record.admin_level, 2);
        assert!(record.muted);
        assert_eq!(record.ip.as_deref(), Some("192.0.2.17"));
    }

    #[test]
    fn test_connect_stored_spectator_record_is_scrubbed() {
        // A document claiming team spectator AND a class/follow target
        // (hand-edited or stale) comes back clean.
        let dir = TempDir::new().unwrap();
        seed_meta(&dir, 5);
        let dirty = SessionRecord {
            team: Team::Spectator,
            class: ClassId(5),
            spectator_state: SpectatorState::Follow,
            spectator_client: 9,
            ..SessionRecord::default()
        };
        seed_client(&dir, SlotId(2), &dirty);
        let mut sessions = lifecycle(&dir, TestPolicy::passive());
        sessions.begin_world(&ctx(5));

        let record = sessions.connect(SlotId(2), &ctx(5)).into_record();

        assert_eq!(record.class, ClassId::NONE);
        assert_eq!(record.spectator_state, SpectatorState::Free);
        assert_eq!(record.spectator_client, FOLLOW_NONE);
    }

    #[test]
    fn test_connect_policy_predicate_scrubs_play_state() {
        // The game says this player is a spectator (limbo, eliminated)
        // even though their stored team is red. Play state goes; the
        // team stays the game's business.
        let dir = TempDir::new().unwrap();
        seed_meta(&dir, 5);
        seed_client(&dir, SlotId(6), &stored_record());
        let policy = TestPolicy {
            force_spectator: true,
            ..TestPolicy::passive()
        };
        let mut sessions = lifecycle(&dir, policy);
        sessions.begin_world(&ctx(5));

        let record = sessions.connect(SlotId(6), &ctx(5)).into_record();

        assert_eq!(record.team, Team::Red);
        assert_eq!(record.class, ClassId::NONE);
        assert_eq!(record.spectator_state, SpectatorState::Free);
        assert_eq!(record.spectator_client, FOLLOW_NONE);
    }

    #[test]
    fn test_connect_partial_document_keeps_default_baseline() {
        // An older-schema file mentioning only adminLevel: everything
        // else comes from the fresh default baseline, not from zeroes.
        let dir = TempDir::new().unwrap();
        seed_meta(&dir, 5);
        let store = ClientSessionStore::new(dir.path());
        fs::create_dir_all(store.path_for(SlotId(1)).parent().unwrap())
            .unwrap();
        fs::write(store.path_for(SlotId(1)), br#"{"adminLevel": 7}"#)
            .unwrap();
        let mut sessions = lifecycle(&dir, TestPolicy::passive());
        sessions.begin_world(&ctx(5));

        let init = sessions.connect(SlotId(1), &ctx(5));

        assert!(init.is_resumed());
        let record = init.into_record();
        assert_eq!(record.admin_level, 7);
        assert_eq!(record.spectator_client, FOLLOW_NONE);
        assert_eq!(record.team, Team::Spectator);
    }

    // =====================================================================
    // connect() — gate interactions
    // =====================================================================

    #[test]
    fn test_connect_invalidated_gate_ignores_wellformed_file() {
        // Stored under gametype 5, server now configured for 7: the
        // slot's perfectly valid file must read as absent.
        let dir = TempDir::new().unwrap();
        seed_meta(&dir, 5);
        seed_client(&dir, SlotId(4), &stored_record());
        let mut sessions = lifecycle(&dir, TestPolicy::passive());
        sessions.begin_world(&ctx(7));

        let init = sessions.connect(SlotId(4), &ctx(7));

        let SessionInit::Fresh(record) = &init else {
            panic!("invalidated epoch must not resume, got {init:?}");
        };
        assert_eq!(record.admin_level, 0);
        assert_eq!(record.team, Team::Spectator);
    }

    #[test]
    fn test_connect_invalidated_gate_replaces_stale_file() {
        // The fresh record is persisted immediately, superseding the
        // stale epoch's file on disk.
        let dir = TempDir::new().unwrap();
        seed_meta(&dir, 5);
        seed_client(&dir, SlotId(4), &stored_record());
        let mut sessions = lifecycle(&dir, TestPolicy::passive());
        sessions.begin_world(&ctx(7));

        let record = sessions.connect(SlotId(4), &ctx(7)).into_record();

        let update = ClientSessionStore::new(dir.path())
            .read(SlotId(4))
            .expect("file should exist");
        assert_eq!(merge(SessionRecord::default(), &update), record);
    }

    #[test]
    fn test_connect_before_begin_world_distrusts_stored_file() {
        let dir = TempDir::new().unwrap();
        seed_meta(&dir, 5);
        seed_client(&dir, SlotId(4), &stored_record());
        let mut sessions = lifecycle(&dir, TestPolicy::passive());
        // No begin_world call.

        let init = sessions.connect(SlotId(4), &ctx(5));

        assert!(matches!(init, SessionInit::Fresh(_)));
    }

    // =====================================================================
    // disconnect()
    // =====================================================================

    #[test]
    fn test_disconnect_persists_the_record() {
        let dir = TempDir::new().unwrap();
        let mut sessions = lifecycle(&dir, TestPolicy::passive());
        let record = stored_record();

        sessions.disconnect(SlotId(5), &record);

        let update = ClientSessionStore::new(dir.path())
            .read(SlotId(5))
            .expect("file should exist");
        assert_eq!(merge(SessionRecord::default(), &update), record);
    }

    // =====================================================================
    // persist()
    // =====================================================================

    #[test]
    fn test_persist_writes_meta_and_every_connected_slot() {
        let dir = TempDir::new().unwrap();
        let mut sessions = lifecycle(&dir, TestPolicy::passive());
        let a = stored_record();
        let b = SessionRecord::default();

        sessions
            .persist(&ctx(5), [(SlotId(0), &a), (SlotId(3), &b)]);

        assert_eq!(
            WorldMetaStore::new(dir.path()).read(),
            Some(GameType(5))
        );
        let store = ClientSessionStore::new(dir.path());
        assert!(store.read(SlotId(0)).is_some());
        assert!(store.read(SlotId(3)).is_some());
    }

    #[test]
    fn test_persist_empty_roster_still_writes_meta() {
        let dir = TempDir::new().unwrap();
        let mut sessions = lifecycle(&dir, TestPolicy::passive());

        let nobody: [(SlotId, &SessionRecord); 0] = [];
        sessions.persist(&ctx(9), nobody);

        assert_eq!(
            WorldMetaStore::new(dir.path()).read(),
            Some(GameType(9))
        );
    }

    #[test]
    fn test_persist_continues_past_a_failing_slot() {
        let dir = TempDir::new().unwrap();
        let mut sessions = lifecycle(&dir, TestPolicy::passive());
        // Block slot 0's path with a directory so its write fails.
        let store = ClientSessionStore::new(dir.path());
        fs::create_dir_all(store.path_for(SlotId(0))).unwrap();
        let a = stored_record();
        let b = stored_record();

        sessions
            .persist(&ctx(5), [(SlotId(0), &a), (SlotId(1), &b)]);

        // Slot 1 and the meta were written despite slot 0 failing.
        assert!(store.read(SlotId(1)).is_some());
        assert_eq!(
            WorldMetaStore::new(dir.path()).read(),
            Some(GameType(5))
        );
    }

    // =====================================================================
    // Full world cycle
    // =====================================================================

    #[test]
    fn test_full_cycle_persist_then_reload_restores_sessions() {
        // World one: fresh epoch, a player joins, earns some state,
        // map changes. World two: same game mode, player reconnects.
        let dir = TempDir::new().unwrap();

        let mut world_one = lifecycle(&dir, TestPolicy::passive());
        world_one.begin_world(&ctx(5));
        let mut record =
            world_one.connect(SlotId(2), &ctx(5)).into_record();

        // Mid-match mutations owned by the host.
        record.team = Team::Blue;
        record.class = ClassId(4);
        record.spectator_state = SpectatorState::Not;
        record.admin_level = 1;
        record.guid = "77AA".to_string();
        world_one.persist(&ctx(5), [(SlotId(2), &record)]);

        let mut world_two = lifecycle(&dir, TestPolicy::passive());
        assert_eq!(world_two.begin_world(&ctx(5)), WorldGate::Validated);
        let init = world_two.connect(SlotId(2), &ctx(5));

        assert!(init.is_resumed());
        assert_eq!(init.into_record(), record);
    }

    #[test]
    fn test_full_cycle_gametype_change_resets_everyone() {
        let dir = TempDir::new().unwrap();

        let mut world_one = lifecycle(&dir, TestPolicy::passive());
        world_one.begin_world(&ctx(5));
        let record = world_one.connect(SlotId(2), &ctx(5)).into_record();
        world_one.persist(&ctx(5), [(SlotId(2), &record)]);

        // Server operator switches rulesets.
        let mut world_two = lifecycle(&dir, TestPolicy::passive());
        assert_eq!(
            world_two.begin_world(&ctx(6)),
            WorldGate::Invalidated
        );
        assert!(matches!(
            world_two.connect(SlotId(2), &ctx(6)),
            SessionInit::Fresh(_)
        ));
    }
}
