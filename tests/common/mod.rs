use std::sync::Once;

use glicko_processor::{
    database::{
        db_structs::{Player, Round},
        memory::MemorySource
    },
    utils::test_utils::{generate_players, generate_rounds}
};

static INIT: Once = Once::new();

/// Installs a warn-level subscriber once per test binary
pub fn init_test_env() {
    INIT.call_once(|| {
        std::env::set_var("RUST_LOG", "warn");
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// A small hand-written league: `players` play a round robin in every round, the
/// lower index always winning.
pub fn round_robin_source(players: usize, rounds: usize) -> (MemorySource, Vec<Player>, Vec<Round>) {
    let players = generate_players(players);
    let rounds = generate_rounds(rounds);
    let mut source = MemorySource::new(players.clone(), rounds.clone());

    for round in &rounds {
        for (i, winner) in players.iter().enumerate() {
            for loser in &players[i + 1..] {
                source.add_match(round.id, &winner.id, &loser.id, "campgrounds");
            }
        }
    }

    (source, players, rounds)
}
