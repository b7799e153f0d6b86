use std::{f64::consts::PI, ops::Range};

use tracing::debug;

use crate::{
    error::{ProcessorError, Result},
    model::{
        constants::PREDICTION_FLOOR,
        rating_engine::RatingEngine,
        structures::{model_config::ModelConfig, player_rating::PlayerRating}
    }
};

/// ln(10) / 400, the Glicko-1 scale factor
const Q: f64 = std::f64::consts::LN_10 / 400.0;

/// Splits `n` rounds into consecutive training, warm-up and evaluation windows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PredictionWindows {
    /// Rounds the engine is run over
    pub training: Range<usize>,
    /// Rounds deciding which players are eligible for scoring
    pub active: Range<usize>,
    /// Rounds whose matches are predicted
    pub evaluation: Range<usize>
}

impl PredictionWindows {
    pub fn new(rounds: usize, prediction_count: usize, active_count: usize) -> Result<PredictionWindows> {
        if prediction_count == 0 {
            return Err(ProcessorError::Configuration(
                "prediction count must be at least 1".to_string()
            ));
        }

        let held_out = prediction_count + active_count;
        if held_out > rounds {
            return Err(ProcessorError::Configuration(format!(
                "{} rounds cannot cover {} prediction and {} warm-up rounds",
                rounds, prediction_count, active_count
            )));
        }

        let training_end = rounds - held_out;
        let active_end = rounds - prediction_count;

        Ok(PredictionWindows {
            training: 0..training_end,
            active: training_end..active_end,
            evaluation: active_end..rounds
        })
    }
}

/// Scores a model configuration by predicting held-out rounds.
pub struct PredictionHarness<'a> {
    engine: &'a RatingEngine<'a>,
    windows: PredictionWindows,
    eligible: Vec<bool>
}

impl<'a> PredictionHarness<'a> {
    pub fn new(
        engine: &'a RatingEngine<'a>,
        prediction_count: usize,
        active_count: usize
    ) -> Result<PredictionHarness<'a>> {
        let table = engine.dataset().match_table();
        let windows = PredictionWindows::new(table.round_count(), prediction_count, active_count)?;

        // Eligibility only depends on the match table, so it is shared by every evaluation
        let eligible = (0..table.player_count())
            .map(|player| table.played_in(player, windows.active.clone()))
            .collect();

        Ok(PredictionHarness {
            engine,
            windows,
            eligible
        })
    }

    pub fn windows(&self) -> &PredictionWindows {
        &self.windows
    }

    pub fn is_eligible(&self, player: usize) -> bool {
        self.eligible.get(player).copied().unwrap_or(false)
    }

    /// Mean log-loss over the evaluation window's matches; lower is better.
    ///
    /// Ratings are frozen at the end of the training window. Every real match is counted
    /// once, from its winner's duel, when the winner is eligible.
    pub fn predict(&self, config: &ModelConfig) -> Result<f64> {
        config.validate()?;

        let mut ratings = self.engine.dataset().initial_ratings(config);
        self.engine
            .advance(self.windows.training.clone(), &mut ratings, config.tau, None)?;

        let score = self.score(&ratings)?;
        debug!(?config, score, "Scored configuration");

        Ok(score)
    }

    fn score(&self, ratings: &[PlayerRating]) -> Result<f64> {
        let table = self.engine.dataset().match_table();

        let mut total = 0.0;
        let mut count = 0usize;
        for round in self.windows.evaluation.clone() {
            for (winner, loser) in table.round_matches(round) {
                if !self.is_eligible(winner) {
                    continue;
                }

                let e = expected_score(&ratings[winner], &ratings[loser]);
                total += rate_game(1.0, e);
                count += 1;
            }
        }

        if count == 0 {
            return Err(ProcessorError::NoPredictions);
        }

        Ok(total / count as f64)
    }
}

/// Glicko-1 `g` on the rating scale.
fn expected_g(deviation: f64) -> f64 {
    1.0 / (1.0 + 3.0 * Q * Q * deviation * deviation / (PI * PI)).sqrt()
}

/// Probability that `a` beats `b`, discounted by both players' combined deviation.
pub fn expected_score(a: &PlayerRating, b: &PlayerRating) -> f64 {
    let g = expected_g((a.deviation * a.deviation + b.deviation * b.deviation).sqrt());
    1.0 / (1.0 + 10f64.powf(-g * (a.rating - b.rating) / 400.0))
}

/// Log-loss (base 10) of predicting `e` for the observed outcome `y`.
/// `e` is clamped into [0.01, 0.99] to keep the score finite.
pub fn rate_game(y: f64, e: f64) -> f64 {
    let e = e.clamp(PREDICTION_FLOOR, 1.0 - PREDICTION_FLOOR);
    -(y * e.log10() + (1.0 - y) * (1.0 - e).log10())
}
