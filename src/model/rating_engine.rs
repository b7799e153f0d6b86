use std::ops::Range;

use rayon::{prelude::*, ThreadPool, ThreadPoolBuilder};
use tracing::debug;

use crate::{
    error::{ProcessorError, Result},
    export::{ExportSink, SnapshotRow},
    model::{
        glicko::{self, ConvergenceError},
        loader::Dataset,
        structures::{duel::Duel, player_rating::PlayerRating}
    }
};

/// Category label written to exports when no match category filter is set
pub const ALL_CATEGORIES: &str = "all";

/// Advances a population of ratings one round at a time.
///
/// Each round is split into fixed-size shards of player indices which are rated in
/// parallel into a scratch buffer. Opponent lookups only ever read the ratings committed
/// after the previous round. Once every shard has finished, the scratch buffer is
/// committed in one step, so no reader sees ratings from two different rounds.
pub struct RatingEngine<'a> {
    dataset: &'a Dataset,
    shard_size: usize,
    pool: ThreadPool
}

impl<'a> RatingEngine<'a> {
    /// `threads` bounds the worker pool; `None` uses rayon's default size.
    pub fn new(dataset: &'a Dataset, shard_size: usize, threads: Option<usize>) -> Result<RatingEngine<'a>> {
        if shard_size == 0 {
            return Err(ProcessorError::Configuration("shard size must be at least 1".to_string()));
        }

        let mut builder = ThreadPoolBuilder::new().thread_name(|i| format!("rating-shard-{}", i));
        if let Some(threads) = threads {
            builder = builder.num_threads(threads);
        }

        let pool = builder
            .build()
            .map_err(|e| ProcessorError::Configuration(format!("failed to build worker pool: {}", e)))?;

        Ok(RatingEngine {
            dataset,
            shard_size,
            pool
        })
    }

    pub fn dataset(&self) -> &Dataset {
        self.dataset
    }

    /// Rates every round in `rounds`, in order, mutating `ratings` in place.
    ///
    /// When a round fails, `ratings` keeps the values committed after the previous round.
    /// With a `sink`, every active player's rating is written after each commit.
    ///
    /// The committed rating, deviation and volatility bounds apply to active players only.
    /// A player who has never played keeps the configured starting values, even a
    /// deviation above the ceiling.
    pub fn advance(
        &self,
        rounds: Range<usize>,
        ratings: &mut [PlayerRating],
        tau: f64,
        mut sink: Option<&mut dyn ExportSink>
    ) -> Result<()> {
        self.validate(&rounds, ratings, tau)?;

        let mut scratch = ratings.to_vec();
        for round in rounds {
            self.rate_round(round, ratings, &mut scratch, tau)?;

            // Barrier: all shards are done, commit the round
            ratings.copy_from_slice(&scratch);
            debug!(round, "Committed round");

            if let Some(sink) = sink.as_deref_mut() {
                self.export_round(round, ratings, sink)?;
            }
        }

        Ok(())
    }

    fn validate(&self, rounds: &Range<usize>, ratings: &[PlayerRating], tau: f64) -> Result<()> {
        let table = self.dataset.match_table();

        if ratings.len() != table.player_count() {
            return Err(ProcessorError::Configuration(format!(
                "expected {} player ratings, got {}",
                table.player_count(),
                ratings.len()
            )));
        }

        if rounds.end > table.round_count() {
            return Err(ProcessorError::Configuration(format!(
                "round range {:?} exceeds the {} loaded rounds",
                rounds,
                table.round_count()
            )));
        }

        if !tau.is_finite() || tau <= 0.0 {
            return Err(ProcessorError::Configuration(format!("tau must be positive, got {}", tau)));
        }

        Ok(())
    }

    fn rate_round(
        &self,
        round: usize,
        committed: &[PlayerRating],
        scratch: &mut [PlayerRating],
        tau: f64
    ) -> Result<()> {
        let shard_size = self.shard_size;

        self.pool.install(|| {
            scratch
                .par_chunks_mut(shard_size)
                .enumerate()
                .try_for_each(|(shard, slots)| self.rate_shard(round, shard * shard_size, committed, slots, tau))
        })
    }

    /// Rates the players `offset..offset + slots.len()`, writing only into `slots`.
    fn rate_shard(
        &self,
        round: usize,
        offset: usize,
        committed: &[PlayerRating],
        slots: &mut [PlayerRating],
        tau: f64
    ) -> Result<()> {
        let table = self.dataset.match_table();

        for (i, slot) in slots.iter_mut().enumerate() {
            let player = offset + i;
            let duels = table.duels(player, round);

            *slot = rate_player(&committed[player], duels, committed, tau).map_err(|source| {
                ProcessorError::Convergence {
                    player,
                    round,
                    source
                }
            })?;
        }

        Ok(())
    }

    fn export_round(&self, round: usize, ratings: &[PlayerRating], sink: &mut dyn ExportSink) -> Result<()> {
        let category = self.dataset.category().unwrap_or(ALL_CATEGORIES);

        for (index, rating) in ratings.iter().enumerate().filter(|(_, r)| r.active) {
            let Some(player) = self.dataset.player(index) else {
                continue;
            };

            sink.write_row(&SnapshotRow {
                round,
                player: player.name.clone(),
                category: category.to_string(),
                r: rating.rating,
                rd: rating.deviation,
                sigma: rating.volatility
            })?;
        }

        Ok(())
    }
}

/// One player's rating after a round, computed from the pre-round snapshot.
fn rate_player(
    current: &PlayerRating,
    duels: &[Duel],
    committed: &[PlayerRating],
    tau: f64
) -> std::result::Result<PlayerRating, ConvergenceError> {
    if duels.is_empty() {
        // Never-seen players keep their configured starting values
        if !current.active {
            return Ok(*current);
        }

        return Ok(glicko::decay(current).clamped());
    }

    let games = duels.iter().map(|duel| (&committed[duel.opponent], duel.outcome));
    Ok(glicko::rate(current, games, tau)?.clamped())
}
