use chrono::{TimeZone, Utc};
use glicko_processor::{
    database::{db::DbClient, DataSource},
    model::{loader::load_dataset, structures::duel::Duel}
};
use serial_test::serial;

use super::test_helpers::{TestDatabase, CYPHER, EVIL, RAPHA, TOXJQ};
use crate::common::init_test_env;

async fn seeded_client() -> (TestDatabase, DbClient) {
    init_test_env();
    let test_db = TestDatabase::new().await.expect("Failed to create test database");
    test_db.seed_test_data().await.expect("Failed to seed test data");

    let db_client = DbClient::connect(&test_db.connection_string)
        .await
        .expect("Failed to connect");

    (test_db, db_client)
}

#[tokio::test]
#[serial]
#[ignore = "requires a Docker daemon"]
async fn test_list_players() {
    let (_db, client) = seeded_client().await;

    let players = client.list_players().await.unwrap();

    let names: Vec<&str> = players.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["cypher", "evil", "rapha", "toxjq"]);
    assert_eq!(players[0].id, CYPHER);
    assert_eq!(players[1].id, EVIL);
}

#[tokio::test]
#[serial]
#[ignore = "requires a Docker daemon"]
async fn test_list_rounds_orders_and_limits() {
    let (_db, client) = seeded_client().await;

    let rounds = client.list_rounds(2).await.unwrap();

    assert_eq!(rounds.iter().map(|r| r.id).collect::<Vec<_>>(), vec![1, 2]);
    assert_eq!(
        rounds[0].start_time,
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap().fixed_offset()
    );
    assert_eq!(
        rounds[1].start_time,
        Utc.with_ymd_and_hms(2024, 1, 8, 0, 0, 0).unwrap().fixed_offset()
    );

    assert_eq!(client.list_rounds(10).await.unwrap().len(), 3);
}

#[tokio::test]
#[serial]
#[ignore = "requires a Docker daemon"]
async fn test_list_matches_by_round_and_category() {
    let (_db, client) = seeded_client().await;

    let all = client.list_matches(1, None).await.unwrap();
    assert_eq!(all.len(), 2);
    assert!(all.iter().any(|m| m.winner == CYPHER && m.loser == RAPHA));
    assert!(all.iter().any(|m| m.winner == TOXJQ && m.loser == EVIL));

    let aerowalk = client.list_matches(1, Some("aerowalk")).await.unwrap();
    assert_eq!(aerowalk.len(), 1);
    assert_eq!(aerowalk[0].winner, TOXJQ);

    assert!(client.list_matches(2, Some("campgrounds")).await.unwrap().is_empty());
    // The 2023 match falls outside every tournament window
    assert_eq!(client.list_matches(3, None).await.unwrap().len(), 1);
}

#[tokio::test]
#[serial]
#[ignore = "requires a Docker daemon"]
async fn test_load_dataset_places_rounds_by_id() {
    let (_db, client) = seeded_client().await;

    let dataset = load_dataset(&client, 3, Some("aerowalk")).await.unwrap();

    assert_eq!(dataset.player_count(), 4);
    assert_eq!(dataset.round_count(), 3);
    assert_eq!(dataset.category(), Some("aerowalk"));

    let table = dataset.match_table();
    assert_eq!(table.match_count(0), 1);
    assert_eq!(table.match_count(1), 1);
    assert_eq!(table.match_count(2), 0);

    let rapha = dataset.index_of_name("rapha").unwrap();
    let toxjq = dataset.index_of_name("toxjq").unwrap();
    // Tournament 2 fills round index 1
    assert_eq!(table.duels(rapha, 1), &[Duel::win(toxjq)]);
    assert_eq!(table.duels(toxjq, 1), &[Duel::loss(rapha)]);
}
