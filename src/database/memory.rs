use std::collections::HashMap;

use super::{
    db_structs::{MatchRecord, Player, Round},
    DataSource
};
use crate::error::Result;

/// In-memory [`DataSource`], used by tests and benchmarks.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    pub players: Vec<Player>,
    pub rounds: Vec<Round>,
    /// Keyed by round id, each match tagged with its category
    pub matches: HashMap<i32, Vec<(MatchRecord, String)>>
}

impl MemorySource {
    pub fn new(players: Vec<Player>, rounds: Vec<Round>) -> MemorySource {
        MemorySource {
            players,
            rounds,
            matches: HashMap::new()
        }
    }

    pub fn add_match(&mut self, round_id: i32, winner: &str, loser: &str, category: &str) {
        self.matches.entry(round_id).or_default().push((
            MatchRecord {
                winner: winner.to_string(),
                loser: loser.to_string()
            },
            category.to_string()
        ));
    }
}

impl DataSource for MemorySource {
    async fn list_players(&self) -> Result<Vec<Player>> {
        Ok(self.players.clone())
    }

    async fn list_rounds(&self, limit: i64) -> Result<Vec<Round>> {
        let mut rounds = self.rounds.clone();
        rounds.sort_by(|a, b| a.start_time.cmp(&b.start_time));
        rounds.truncate(limit.max(0) as usize);

        Ok(rounds)
    }

    async fn list_matches(&self, round_id: i32, category: Option<&str>) -> Result<Vec<MatchRecord>> {
        let matches = self
            .matches
            .get(&round_id)
            .map(|matches| {
                matches
                    .iter()
                    .filter(|(_, c)| category.map_or(true, |wanted| wanted == c.as_str()))
                    .map(|(m, _)| m.clone())
                    .collect()
            })
            .unwrap_or_default();

        Ok(matches)
    }
}
