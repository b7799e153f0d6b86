use std::ops::Range;

use crate::model::structures::duel::Duel;

/// Dense `(player, round) -> duels` lookup.
///
/// Populated once while the dataset loads and read-only afterwards. An empty
/// cell means the player had no match that round.
#[derive(Debug, Clone, Default)]
pub struct MatchTable {
    players: usize,
    rounds: usize,
    cells: Vec<Vec<Duel>>
}

impl MatchTable {
    pub fn new(players: usize, rounds: usize) -> MatchTable {
        MatchTable {
            players,
            rounds,
            cells: vec![Vec::new(); players * rounds]
        }
    }

    pub fn player_count(&self) -> usize {
        self.players
    }

    pub fn round_count(&self) -> usize {
        self.rounds
    }

    /// Records a single match as two symmetric duels, one per participant.
    pub fn add_match(&mut self, round: usize, winner: usize, loser: usize) {
        let winner_cell = self.cell_index(winner, round);
        self.cells[winner_cell].push(Duel::win(loser));

        let loser_cell = self.cell_index(loser, round);
        self.cells[loser_cell].push(Duel::loss(winner));
    }

    pub fn duels(&self, player: usize, round: usize) -> &[Duel] {
        &self.cells[self.cell_index(player, round)]
    }

    /// True if the player has at least one duel in any round of `rounds`.
    pub fn played_in(&self, player: usize, rounds: Range<usize>) -> bool {
        rounds.into_iter().any(|round| !self.duels(player, round).is_empty())
    }

    /// Each real match of the round once, as `(winner, loser)`, seen from the winner's duel.
    pub fn round_matches(&self, round: usize) -> impl Iterator<Item = (usize, usize)> + '_ {
        (0..self.players).flat_map(move |player| {
            self.duels(player, round)
                .iter()
                .filter(|duel| duel.is_win())
                .map(move |duel| (player, duel.opponent))
        })
    }

    pub fn match_count(&self, round: usize) -> usize {
        self.round_matches(round).count()
    }

    fn cell_index(&self, player: usize, round: usize) -> usize {
        debug_assert!(player < self.players && round < self.rounds);
        player * self.rounds + round
    }
}
