use std::sync::Arc;

use postgres_types::ToSql;
use tokio_postgres::{Client, NoTls, Row};
use tracing::{debug, error, info};

use super::{
    db_structs::{MatchRecord, Player, Round},
    DataSource
};
use crate::error::Result;

#[derive(Clone)]
pub struct DbClient {
    client: Arc<Client>
}

impl DbClient {
    // Connect to the database and return a DbClient instance
    pub async fn connect(connection_str: &str) -> std::result::Result<Self, tokio_postgres::Error> {
        let (client, connection) = tokio_postgres::connect(connection_str, NoTls).await?;

        // Spawn the connection object to run in the background
        tokio::spawn(async move {
            if let Err(e) = connection.await {
                error!("connection error: {}", e);
            }
        });

        Ok(DbClient {
            client: Arc::new(client)
        })
    }

    fn player_from_row(row: &Row) -> Player {
        Player {
            id: row.get("id"),
            name: row.get("name")
        }
    }

    fn round_from_row(row: &Row) -> Round {
        Round {
            id: row.get("id"),
            start_time: row.get("t_from")
        }
    }

    fn match_from_row(row: &Row) -> MatchRecord {
        MatchRecord {
            winner: row.get("winner"),
            loser: row.get("loser")
        }
    }
}

impl DataSource for DbClient {
    async fn list_players(&self) -> Result<Vec<Player>> {
        info!("Fetching players...");
        let rows = self
            .client
            .query("SELECT id::text AS id, name FROM player ORDER BY name", &[])
            .await?;

        let players: Vec<Player> = rows.iter().map(Self::player_from_row).collect();
        info!("Fetched {} players", players.len());

        Ok(players)
    }

    async fn list_rounds(&self, limit: i64) -> Result<Vec<Round>> {
        info!("Fetching rounds...");
        let rows = self
            .client
            .query(
                "SELECT id, t_from::timestamptz AS t_from FROM tournament ORDER BY t_from ASC LIMIT $1",
                &[&limit]
            )
            .await?;

        let rounds: Vec<Round> = rows.iter().map(Self::round_from_row).collect();
        info!("Fetched {} rounds", rounds.len());

        Ok(rounds)
    }

    async fn list_matches(&self, round_id: i32, category: Option<&str>) -> Result<Vec<MatchRecord>> {
        // Only matches played inside the tournament's time window belong to it
        let mut sql = String::from(
            "SELECT dm.winner::text AS winner, dm.loser::text AS loser \
            FROM duel_match dm, tournament t \
            WHERE t.id = $1 AND dm.played BETWEEN t.t_from AND t.t_to"
        );
        let mut params: Vec<&(dyn ToSql + Sync)> = vec![&round_id];
        if let Some(category) = &category {
            sql.push_str(" AND dm.map = $2");
            params.push(category);
        }

        let rows = self.client.query(sql.as_str(), &params).await?;

        debug!("Fetched {} matches for round {}", rows.len(), round_id);
        Ok(rows.iter().map(Self::match_from_row).collect())
    }
}
