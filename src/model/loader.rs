use std::collections::{hash_map::Entry, HashMap};

use indexmap::IndexMap;
use tracing::{info, warn};

use crate::{
    database::{
        db_structs::{Player, Round},
        DataSource
    },
    error::{ProcessorError, Result},
    model::{
        match_table::MatchTable,
        structures::{model_config::ModelConfig, player_rating::PlayerRating}
    },
    utils::progress_utils::progress_bar
};

/// Everything the engine needs, fully loaded: player identities in dense index
/// order, the ordered rounds and the match table.
#[derive(Debug, Clone)]
pub struct Dataset {
    // Position in the map is the player's dense index
    players: IndexMap<String, Player>,
    names: HashMap<String, usize>,
    rounds: Vec<Round>,
    match_table: MatchTable,
    category: Option<String>
}

impl Dataset {
    pub fn new(players: Vec<Player>, rounds: Vec<Round>, category: Option<String>) -> Result<Dataset> {
        if players.is_empty() {
            return Err(ProcessorError::Configuration("no players to rate".to_string()));
        }

        if rounds.is_empty() {
            return Err(ProcessorError::Configuration("no rounds to process".to_string()));
        }

        let mut indexed = IndexMap::with_capacity(players.len());
        let mut names = HashMap::with_capacity(players.len());
        for player in players {
            match names.entry(player.name.clone()) {
            Entry::Occupied(_) => warn!(
                "Player name {} is shared by more than one id, reports use the first",
                player.name
            ),
            Entry::Vacant(entry) => {
                entry.insert(indexed.len());
            }
        }

            if let Some(duplicate) = indexed.insert(player.id.clone(), player) {
                return Err(ProcessorError::Configuration(format!(
                    "player id {} is listed more than once",
                    duplicate.id
                )));
            }
        }

        let match_table = MatchTable::new(indexed.len(), rounds.len());

        Ok(Dataset {
            players: indexed,
            names,
            rounds,
            match_table,
            category
        })
    }

    /// Adds one match by external ids.
    ///
    /// Round ids are one-based: round `k` fills round index `k - 1`.
    pub fn add_match(&mut self, round_id: i32, winner: &str, loser: &str) -> Result<()> {
        let round = self.round_index(round_id)?;
        let winner = self.player_index(winner, round_id)?;
        let loser = self.player_index(loser, round_id)?;

        self.match_table.add_match(round, winner, loser);
        Ok(())
    }

    /// Fresh, inactive ratings for every player
    pub fn initial_ratings(&self, config: &ModelConfig) -> Vec<PlayerRating> {
        vec![PlayerRating::initial(config); self.players.len()]
    }

    pub fn player(&self, index: usize) -> Option<&Player> {
        self.players.get_index(index).map(|(_, player)| player)
    }

    pub fn index_of_name(&self, name: &str) -> Option<usize> {
        self.names.get(name).copied()
    }

    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    pub fn round_count(&self) -> usize {
        self.rounds.len()
    }

    pub fn rounds(&self) -> &[Round] {
        &self.rounds
    }

    pub fn match_table(&self) -> &MatchTable {
        &self.match_table
    }

    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    fn round_index(&self, round_id: i32) -> Result<usize> {
        let rounds = self.rounds.len();
        let index = usize::try_from(round_id - 1).map_err(|_| ProcessorError::RoundOutOfRange { id: round_id, rounds })?;

        if index >= rounds {
            return Err(ProcessorError::RoundOutOfRange { id: round_id, rounds });
        }

        Ok(index)
    }

    fn player_index(&self, id: &str, round_id: i32) -> Result<usize> {
        self.players
            .get_index_of(id)
            .ok_or_else(|| ProcessorError::UnknownPlayer {
                id: id.to_string(),
                round: round_id
            })
    }
}

/// Reads players, up to `limit` rounds and each round's matches from `source`.
pub async fn load_dataset<S: DataSource>(source: &S, limit: i64, category: Option<&str>) -> Result<Dataset> {
    if limit < 1 {
        return Err(ProcessorError::Configuration(format!(
            "round limit must be at least 1, got {}",
            limit
        )));
    }

    let rounds = source.list_rounds(limit).await?;
    info!("Read {} rounds", rounds.len());

    let players = source.list_players().await?;
    info!("Populating player structure with {} players", players.len());

    let mut dataset = Dataset::new(players, rounds, category.map(str::to_string))?;

    let round_ids: Vec<i32> = dataset.rounds.iter().map(|r| r.id).collect();
    let bar = progress_bar(round_ids.len() as u64, "Reading matches".to_string());
    let mut total = 0;
    for round_id in round_ids {
        let matches = source.list_matches(round_id, category).await?;
        total += matches.len();

        for m in matches {
            dataset.add_match(round_id, &m.winner, &m.loser)?;
        }

        if let Some(bar) = &bar {
            bar.inc(1);
        }
    }

    if let Some(bar) = bar {
        bar.finish();
    }

    info!("Loaded {} matches", total);
    Ok(dataset)
}

#[cfg(test)]
mod tests {
    use crate::{
        database::memory::MemorySource,
        error::ProcessorError,
        model::{
            loader::{load_dataset, Dataset},
            structures::duel::Duel
        },
        utils::test_utils::{generate_players, generate_rounds}
    };

    #[test]
    fn test_new_rejects_empty_collections() {
        assert!(matches!(
            Dataset::new(vec![], generate_rounds(2), None),
            Err(ProcessorError::Configuration(_))
        ));
        assert!(matches!(
            Dataset::new(generate_players(2), vec![], None),
            Err(ProcessorError::Configuration(_))
        ));
    }

    #[test]
    fn test_new_rejects_duplicate_ids() {
        let mut players = generate_players(2);
        players[1].id = players[0].id.clone();

        assert!(matches!(
            Dataset::new(players, generate_rounds(1), None),
            Err(ProcessorError::Configuration(_))
        ));
    }

    #[test]
    fn test_add_match_shifts_round_index() {
        let players = generate_players(2);
        let mut dataset = Dataset::new(players.clone(), generate_rounds(3), None).unwrap();

        dataset.add_match(1, &players[0].id, &players[1].id).unwrap();
        dataset.add_match(3, &players[1].id, &players[0].id).unwrap();

        let table = dataset.match_table();
        assert_eq!(table.duels(0, 0), &[Duel::win(1)]);
        assert_eq!(table.duels(1, 0), &[Duel::loss(0)]);
        assert_eq!(table.duels(1, 2), &[Duel::win(0)]);
        assert!(table.duels(0, 1).is_empty());
    }

    #[test]
    fn test_add_match_rejects_unknown_player() {
        let players = generate_players(2);
        let mut dataset = Dataset::new(players.clone(), generate_rounds(1), None).unwrap();

        let result = dataset.add_match(1, &players[0].id, "nobody");
        assert!(matches!(result, Err(ProcessorError::UnknownPlayer { round: 1, .. })));
    }

    #[test]
    fn test_add_match_rejects_round_out_of_range() {
        let players = generate_players(2);
        let mut dataset = Dataset::new(players.clone(), generate_rounds(2), None).unwrap();

        assert!(matches!(
            dataset.add_match(0, &players[0].id, &players[1].id),
            Err(ProcessorError::RoundOutOfRange { id: 0, rounds: 2 })
        ));
        assert!(matches!(
            dataset.add_match(3, &players[0].id, &players[1].id),
            Err(ProcessorError::RoundOutOfRange { id: 3, rounds: 2 })
        ));
    }

    #[test]
    fn test_index_of_name() {
        let players = generate_players(3);
        let dataset = Dataset::new(players.clone(), generate_rounds(1), None).unwrap();

        assert_eq!(dataset.index_of_name(&players[2].name), Some(2));
        assert_eq!(dataset.player(2), Some(&players[2]));
        assert_eq!(dataset.index_of_name("missing"), None);
        assert_eq!(dataset.rounds().len(), 1);
    }

    #[test]
    fn test_shared_name_resolves_to_first_player() {
        let mut players = generate_players(3);
        players[2].name = players[0].name.clone();
        let dataset = Dataset::new(players.clone(), generate_rounds(1), None).unwrap();

        assert_eq!(dataset.player_count(), 3);
        assert_eq!(dataset.index_of_name(&players[0].name), Some(0));
    }

    #[tokio::test]
    async fn test_load_dataset_filters_category() {
        let players = generate_players(3);
        let mut source = MemorySource::new(players.clone(), generate_rounds(2));
        source.add_match(1, &players[0].id, &players[1].id, "campgrounds");
        source.add_match(2, &players[1].id, &players[2].id, "aerowalk");

        let all = load_dataset(&source, 10, None).await.unwrap();
        assert_eq!(all.match_table().match_count(0), 1);
        assert_eq!(all.match_table().match_count(1), 1);

        let filtered = load_dataset(&source, 10, Some("aerowalk")).await.unwrap();
        assert_eq!(filtered.match_table().match_count(0), 0);
        assert_eq!(filtered.match_table().match_count(1), 1);
        assert_eq!(filtered.category(), Some("aerowalk"));
    }

    #[tokio::test]
    async fn test_load_dataset_fails_fast_on_unknown_player() {
        let players = generate_players(2);
        let mut source = MemorySource::new(players.clone(), generate_rounds(1));
        source.add_match(1, &players[0].id, "ghost", "campgrounds");

        let result = load_dataset(&source, 10, None).await;
        assert!(matches!(result, Err(ProcessorError::UnknownPlayer { .. })));
    }

    #[tokio::test]
    async fn test_load_dataset_rejects_zero_limit() {
        let source = MemorySource::new(generate_players(2), generate_rounds(1));

        assert!(matches!(
            load_dataset(&source, 0, None).await,
            Err(ProcessorError::Configuration(_))
        ));
    }
}
