pub mod db;
pub mod db_structs;
pub mod memory;

use crate::{
    database::db_structs::{MatchRecord, Player, Round},
    error::Result
};

/// Read-only provider of the three collections the processor consumes.
#[allow(async_fn_in_trait)]
pub trait DataSource {
    async fn list_players(&self) -> Result<Vec<Player>>;

    /// At most `limit` rounds, ascending by start time.
    async fn list_rounds(&self, limit: i64) -> Result<Vec<Round>>;

    /// Matches of one round, optionally restricted to a match category (e.g. a map).
    async fn list_matches(&self, round_id: i32, category: Option<&str>) -> Result<Vec<MatchRecord>>;
}
