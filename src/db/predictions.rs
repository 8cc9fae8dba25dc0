use std::collections::HashMap;

use sqlx::PgExecutor;
use uuid::Uuid;

use crate::models::fixture::{MatchKey, ScoreLine};
use crate::models::prediction::Prediction;

/// Insert the user's prediction for a fixture, or overwrite its scores if one exists.
pub async fn upsert_prediction<'e, E: PgExecutor<'e>>(
    executor: E,
    user_id: Uuid,
    key: &MatchKey,
    score: &ScoreLine,
) -> Result<Prediction, sqlx::Error> {
    sqlx::query_as::<_, Prediction>(
        r#"
        INSERT INTO predictions (id, user_id, matchday, home_team, away_team, home_score, away_score, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, NOW(), NOW())
        ON CONFLICT (user_id, matchday, home_team, away_team) DO UPDATE SET
            home_score = EXCLUDED.home_score,
            away_score = EXCLUDED.away_score,
            updated_at = NOW()
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(key.matchday)
    .bind(&key.home_team)
    .bind(&key.away_team)
    .bind(score.home_score)
    .bind(score.away_score)
    .fetch_one(executor)
    .await
}

pub async fn get_predictions_for_user<'e, E: PgExecutor<'e>>(
    executor: E,
    user_id: Uuid,
) -> Result<Vec<Prediction>, sqlx::Error> {
    sqlx::query_as::<_, Prediction>(
        r#"
        SELECT * FROM predictions
        WHERE user_id = $1
        ORDER BY matchday, home_team, away_team
        "#,
    )
    .bind(user_id)
    .fetch_all(executor)
    .await
}

pub fn prediction_map(predictions: &[Prediction]) -> HashMap<MatchKey, ScoreLine> {
    predictions
        .iter()
        .map(|prediction| (prediction.key(), prediction.score()))
        .collect()
}
