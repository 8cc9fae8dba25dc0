mod common;
use common::mock_sources::fixture;
use common::utils::{prediction, spawn_app};

use chrono::{DateTime, Utc};
use prediction_pool::db::results::get_all_results;
use prediction_pool::db::users::get_user_by_id;
use prediction_pool::models::user::UserRole;
use serde_json::{json, Value};
use sqlx::PgPool;
use uuid::Uuid;

async fn points_of(pool: &PgPool, user_id: Uuid) -> i32 {
    get_user_by_id(pool, user_id).await.unwrap().unwrap().points
}

#[tokio::test]
async fn sync_stores_only_finished_fixtures() {
    let test_app = spawn_app().await;
    let admin = test_app.create_admin().await;
    test_app.sources.set_fixtures(vec![
        fixture(1, "France", "Romania", "FINISHED", Some((2, 1))),
        fixture(1, "Albania", "Switzerland", "IN_PLAY", Some((0, 1))),
        fixture(1, "Wales", "Slovakia", "TIMED", None),
    ]);

    let response = test_app.sync_results(&admin.token).await;

    assert_eq!(response.status().as_u16(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["data"]["fetched"], 1);
    assert_eq!(body["data"]["upserted"], 1);

    let stored = get_all_results(&test_app.db_pool).await.unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].home_team, "France");
    assert_eq!((stored[0].home_score, stored[0].away_score), (2, 1));
}

#[tokio::test]
async fn repeated_sync_is_idempotent() {
    let test_app = spawn_app().await;
    let admin = test_app.create_admin().await;
    test_app.sources.set_fixtures(vec![
        fixture(1, "France", "Romania", "FINISHED", Some((2, 1))),
        fixture(1, "Albania", "Switzerland", "FINISHED", Some((0, 1))),
    ]);

    assert_eq!(test_app.sync_results(&admin.token).await.status().as_u16(), 200);
    let first: Vec<(String, i32, i32, DateTime<Utc>)> = sqlx::query_as(
        "SELECT home_team, home_score, away_score, updated_at FROM results ORDER BY home_team",
    )
    .fetch_all(&test_app.db_pool)
    .await
    .unwrap();

    assert_eq!(test_app.sync_results(&admin.token).await.status().as_u16(), 200);
    let second: Vec<(String, i32, i32, DateTime<Utc>)> = sqlx::query_as(
        "SELECT home_team, home_score, away_score, updated_at FROM results ORDER BY home_team",
    )
    .fetch_all(&test_app.db_pool)
    .await
    .unwrap();

    assert_eq!(first.len(), 2);
    assert_eq!(first, second);
}

#[tokio::test]
async fn corrected_score_overwrites_the_stored_result() {
    let test_app = spawn_app().await;
    let admin = test_app.create_admin().await;
    test_app.sources.set_fixtures(vec![fixture(1, "France", "Romania", "FINISHED", Some((2, 1)))]);
    test_app.sync_results(&admin.token).await;

    test_app.sources.set_fixtures(vec![fixture(1, "France", "Romania", "FINISHED", Some((2, 2)))]);
    test_app.sync_results(&admin.token).await;

    let stored = get_all_results(&test_app.db_pool).await.unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!((stored[0].home_score, stored[0].away_score), (2, 2));
}

#[tokio::test]
async fn failing_record_does_not_stop_the_batch() {
    let test_app = spawn_app().await;
    let admin = test_app.create_admin().await;
    test_app.sources.set_fixtures(vec![
        fixture(1, "France", "Romania", "FINISHED", Some((2, 1))),
        // Rejected by the results table's constraints
        fixture(1, "Albania", "Switzerland", "FINISHED", Some((-1, 0))),
        fixture(1, "Wales", "Slovakia", "FINISHED", Some((2, 1))),
    ]);

    let response = test_app.sync_results(&admin.token).await;

    assert_eq!(response.status().as_u16(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["data"]["upserted"], 2);
    let failed = body["data"]["failed"].as_array().unwrap();
    assert_eq!(failed.len(), 1);
    assert_eq!(failed[0]["key"], "1_Albania_Switzerland");

    let stored = get_all_results(&test_app.db_pool).await.unwrap();
    assert_eq!(stored.len(), 2);
}

#[tokio::test]
async fn source_outage_aborts_without_writing() {
    let test_app = spawn_app().await;
    let admin = test_app.create_admin().await;
    test_app.sources.set_fixtures_down(true);

    let response = test_app.sync_results(&admin.token).await;

    assert_eq!(response.status().as_u16(), 502);
    assert!(get_all_results(&test_app.db_pool).await.unwrap().is_empty());
}

#[tokio::test]
async fn sync_rescores_every_user() {
    let test_app = spawn_app().await;
    let admin = test_app.create_admin().await;
    let exact = test_app.create_user("Exact", UserRole::User).await;
    let outcome = test_app.create_user("Outcome", UserRole::User).await;
    let miss = test_app.create_user("Miss", UserRole::User).await;

    test_app.sources.set_fixtures(vec![
        fixture(1, "France", "Romania", "TIMED", None),
        fixture(1, "Albania", "Switzerland", "TIMED", None),
    ]);
    test_app.submit_predictions(&exact.token, json!([
        prediction(1, "France", "Romania", 2, 1),
        prediction(1, "Albania", "Switzerland", 1, 1),
    ])).await;
    test_app.submit_predictions(&outcome.token, json!([prediction(1, "France", "Romania", 3, 0)])).await;
    test_app.submit_predictions(&miss.token, json!([prediction(1, "France", "Romania", 0, 2)])).await;

    test_app.sources.set_fixtures(vec![
        fixture(1, "France", "Romania", "FINISHED", Some((2, 1))),
        fixture(1, "Albania", "Switzerland", "FINISHED", Some((0, 0))),
    ]);
    let response = test_app.sync_results(&admin.token).await;
    assert_eq!(response.status().as_u16(), 200);

    assert_eq!(points_of(&test_app.db_pool, exact.id).await, 4);
    assert_eq!(points_of(&test_app.db_pool, outcome.id).await, 1);
    assert_eq!(points_of(&test_app.db_pool, miss.id).await, 0);

    let response = test_app.get_authed("/leaderboard", &miss.token).await;
    let body: Value = response.json().await.unwrap();
    let entries = body["data"].as_array().unwrap();
    assert_eq!(entries[0]["name"], "Exact");
    assert_eq!(entries[0]["points"], 4);
    assert_eq!(entries[1]["name"], "Outcome");
}

#[tokio::test]
async fn recompute_repairs_drifted_points() {
    let test_app = spawn_app().await;
    let admin = test_app.create_admin().await;
    let user = test_app.create_user("Drift", UserRole::User).await;

    sqlx::query("UPDATE users SET points = 42 WHERE id = $1")
        .bind(user.id)
        .execute(&test_app.db_pool)
        .await
        .unwrap();

    let response = test_app.post_authed("/admin/points/recompute", &admin.token, &json!({})).await;
    assert_eq!(response.status().as_u16(), 200);

    let user = get_user_by_id(&test_app.db_pool, user.id).await.unwrap().unwrap();
    assert_eq!(user.points, 0);
}

#[tokio::test]
async fn non_admins_cannot_sync() {
    let test_app = spawn_app().await;
    let user = test_app.create_user("Nosy", UserRole::User).await;

    let response = test_app.sync_results(&user.token).await;
    assert_eq!(response.status().as_u16(), 403);

    let response = test_app.client
        .post(&format!("{}/admin/results/sync", test_app.address))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 401);
}
