pub const WIN: f64 = 1.0;
pub const LOSS: f64 = 0.0;

/// One player's record of facing one opponent in one round.
/// The owning player is implicit (it is the match table cell the duel lives in).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Duel {
    /// Dense index of the opposing player
    pub opponent: usize,
    /// 1.0 for a win, 0.0 for a loss
    pub outcome: f64
}

impl Duel {
    pub fn win(opponent: usize) -> Duel {
        Duel { opponent, outcome: WIN }
    }

    pub fn loss(opponent: usize) -> Duel {
        Duel { opponent, outcome: LOSS }
    }

    pub fn is_win(&self) -> bool {
        self.outcome == WIN
    }
}
