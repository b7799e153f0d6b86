use std::sync::Arc;

use lazy_static::lazy_static;
use testcontainers::{clients::Cli, Container};
use testcontainers_modules::postgres::Postgres;
use tokio_postgres::{Client, NoTls};

pub const CYPHER: &str = "00000000-0000-0000-0000-000000000001";
pub const RAPHA: &str = "00000000-0000-0000-0000-000000000002";
pub const TOXJQ: &str = "00000000-0000-0000-0000-000000000003";
pub const EVIL: &str = "00000000-0000-0000-0000-000000000004";

pub struct TestDatabase {
    pub connection_string: String,
    _container: Container<'static, Postgres>
}

impl TestDatabase {
    pub async fn new() -> Result<Self, Box<dyn std::error::Error>> {
        lazy_static! {
            static ref DOCKER: Arc<Cli> = Arc::new(Cli::default());
        }

        let container = DOCKER.run(Postgres::default());
        let port = container.get_host_port_ipv4(5432);

        let connection_string = format!(
            "host=localhost port={} user=postgres password=postgres dbname=postgres",
            port
        );

        let client = connect(&connection_string).await?;
        client.batch_execute(include_str!("schema.sql")).await?;

        Ok(TestDatabase {
            connection_string,
            _container: container
        })
    }

    pub async fn get_client(&self) -> Result<Client, Box<dyn std::error::Error>> {
        connect(&self.connection_string).await
    }

    /// Four players over three weekly tournaments, plus one match outside every tournament.
    /// Tournaments are inserted newest first so ordering comes from the query.
    pub async fn seed_test_data(&self) -> Result<(), Box<dyn std::error::Error>> {
        let client = self.get_client().await?;

        client
            .batch_execute(&format!(
                "INSERT INTO player (id, name) VALUES
                 ('{CYPHER}', 'cypher'),
                 ('{RAPHA}', 'rapha'),
                 ('{TOXJQ}', 'toxjq'),
                 ('{EVIL}', 'evil');

                 INSERT INTO tournament (id, t_from, t_to) VALUES
                 (3, '2024-01-15 00:00:00', '2024-01-21 23:59:59'),
                 (2, '2024-01-08 00:00:00', '2024-01-14 23:59:59'),
                 (1, '2024-01-01 00:00:00', '2024-01-07 23:59:59');

                 INSERT INTO duel_match (winner, loser, played, map) VALUES
                 ('{CYPHER}', '{RAPHA}', '2024-01-02 18:00:00', 'campgrounds'),
                 ('{TOXJQ}', '{EVIL}', '2024-01-03 18:00:00', 'aerowalk'),
                 ('{RAPHA}', '{TOXJQ}', '2024-01-09 18:00:00', 'aerowalk'),
                 ('{EVIL}', '{CYPHER}', '2024-01-16 18:00:00', 'campgrounds'),
                 ('{CYPHER}', '{EVIL}', '2023-12-01 18:00:00', 'aerowalk');"
            ))
            .await?;

        Ok(())
    }
}

async fn connect(connection_string: &str) -> Result<Client, Box<dyn std::error::Error>> {
    let (client, connection) = tokio_postgres::connect(connection_string, NoTls).await?;

    tokio::spawn(async move {
        if let Err(e) = connection.await {
            eprintln!("Database connection error: {}", e);
        }
    });

    Ok(client)
}
