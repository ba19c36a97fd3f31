//! Outpost: a toy server shell driving the session lifecycle.
//!
//! Simulates two server runs against the same data directory:
//! run one plays a match and map-changes; run two reconnects the same
//! players under the same game mode and gets their state back. Flip
//! `GAMETYPE` between runs to watch the epoch gate discard everything.

use redoubt_session::{
    ClassId, GamePolicy, GameType, SessionLifecycle, SessionRecord, SlotId,
    SpectatorState, Team, WorldContext,
};

const DATA_DIR: &str = "outpost-data";
const GAMETYPE: GameType = GameType(5);

// ---------------------------------------------------------------------------
// Game policy
// ---------------------------------------------------------------------------

/// Joins go to whichever team has fewer players.
struct BalanceJoin {
    red: usize,
    blue: usize,
}

impl GamePolicy for BalanceJoin {
    fn pick_team(&mut self, _slot: SlotId) -> Team {
        if self.red <= self.blue {
            self.red += 1;
            Team::Red
        } else {
            self.blue += 1;
            Team::Blue
        }
    }

    fn announce_team_change(&mut self, slot: SlotId, team: Team) {
        tracing::info!(%slot, %team, "player joined a team");
    }
}

// ---------------------------------------------------------------------------
// Server shell
// ---------------------------------------------------------------------------

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let policy = BalanceJoin { red: 0, blue: 0 };
    let mut sessions = SessionLifecycle::new(DATA_DIR, policy);

    // -- World load -------------------------------------------------------
    let world = WorldContext {
        gametype: GAMETYPE,
        match_started: true,
        auto_join: true,
        now: 30_000,
    };
    let gate = sessions.begin_world(&world);
    tracing::info!(?gate, "world loaded");

    // -- Two clients connect ----------------------------------------------
    let mut roster: Vec<(SlotId, SessionRecord)> = Vec::new();
    for slot in [SlotId(0), SlotId(1)] {
        let init = sessions.connect(slot, &world);
        tracing::info!(
            %slot,
            resumed = init.is_resumed(),
            team = %init.record().team,
            "client connected"
        );
        roster.push((slot, init.into_record()));
    }

    // -- Mid-match mutations the host would make --------------------------
    if let Some((slot, record)) = roster.first_mut() {
        record.class = ClassId(2);
        record.spectator_state = SpectatorState::Not;
        record.guid = "4A6F686E446F65".to_string();
        tracing::info!(%slot, class = %record.class, "player picked a class");
    }

    // -- Map change: persist everyone --------------------------------------
    sessions.persist(&world, roster.iter().map(|(s, r)| (*s, r)));
    tracing::info!("map change complete, run again to reconnect");
}
