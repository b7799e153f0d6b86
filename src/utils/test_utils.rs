use chrono::{DateTime, Duration, FixedOffset, TimeZone, Utc};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::{
    database::{
        db_structs::{Player, Round},
        memory::MemorySource
    },
    model::loader::Dataset
};

const CATEGORIES: [&str; 3] = ["campgrounds", "aerowalk", "bloodrun"];

pub fn generate_player(index: usize) -> Player {
    Player {
        id: format!("00000000-0000-0000-0000-{:012}", index),
        name: format!("player_{}", index)
    }
}

pub fn generate_players(n: usize) -> Vec<Player> {
    (0..n).map(generate_player).collect()
}

fn base_time() -> DateTime<FixedOffset> {
    Utc.with_ymd_and_hms(2013, 1, 7, 0, 0, 0).unwrap().fixed_offset()
}

/// Weekly rounds with ids `1..=n`
pub fn generate_rounds(n: usize) -> Vec<Round> {
    (0..n)
        .map(|i| Round {
            id: i as i32 + 1,
            start_time: base_time() + Duration::weeks(i as i64)
        })
        .collect()
}

/// Hidden skill per player, used to pick winners so that ratings have signal to find.
fn generate_skills(rng: &mut ChaCha8Rng, n: usize) -> Vec<f64> {
    (0..n).map(|_| rng.random_range(1000.0..=2200.0)).collect()
}

/// Plays one random pairing, returning `(winner, loser)` indices.
fn play(rng: &mut ChaCha8Rng, skills: &[f64]) -> (usize, usize) {
    let a = rng.random_range(0..skills.len());
    let mut b = rng.random_range(0..skills.len() - 1);
    if b >= a {
        b += 1;
    }

    let p_a = 1.0 / (1.0 + 10f64.powf((skills[b] - skills[a]) / 400.0));
    if rng.random_bool(p_a) {
        (a, b)
    } else {
        (b, a)
    }
}

/// A seeded [`MemorySource`] with `matches_per_round` random matches in each round,
/// spread across a handful of categories.
pub fn generate_source(players: usize, rounds: usize, matches_per_round: usize, seed: u64) -> MemorySource {
    if players < 2 {
        panic!("At least 2 players are required to generate matches");
    }

    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let skills = generate_skills(&mut rng, players);

    let mut source = MemorySource::new(generate_players(players), generate_rounds(rounds));
    for round in source.rounds.clone() {
        for _ in 0..matches_per_round {
            let (winner, loser) = play(&mut rng, &skills);
            let category = CATEGORIES[rng.random_range(0..CATEGORIES.len())];

            let winner_id = source.players[winner].id.clone();
            let loser_id = source.players[loser].id.clone();
            source.add_match(round.id, &winner_id, &loser_id, category);
        }
    }

    source
}

/// Same data as [`generate_source`], loaded straight into a [`Dataset`].
pub fn generate_dataset(players: usize, rounds: usize, matches_per_round: usize, seed: u64) -> Dataset {
    let source = generate_source(players, rounds, matches_per_round, seed);

    let mut dataset = Dataset::new(source.players.clone(), source.rounds.clone(), None)
        .expect("Generated players and rounds should form a valid dataset");

    for round in &source.rounds {
        for (m, _) in source.matches.get(&round.id).into_iter().flatten() {
            dataset
                .add_match(round.id, &m.winner, &m.loser)
                .expect("Generated matches should reference generated players");
        }
    }

    dataset
}
