use std::collections::HashMap;

use sqlx::PgExecutor;
use uuid::Uuid;

use crate::models::fixture::{MatchKey, ScoreLine};
use crate::models::match_result::MatchResult;

/// Insert the result for a fixture, or overwrite its scores if it is already stored.
pub async fn upsert_result<'e, E: PgExecutor<'e>>(
    executor: E,
    key: &MatchKey,
    score: &ScoreLine,
) -> Result<MatchResult, sqlx::Error> {
    sqlx::query_as::<_, MatchResult>(
        r#"
        INSERT INTO results (id, matchday, home_team, away_team, home_score, away_score, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, NOW())
        ON CONFLICT (matchday, home_team, away_team) DO UPDATE SET
            home_score = EXCLUDED.home_score,
            away_score = EXCLUDED.away_score,
            updated_at = CASE
                WHEN results.home_score = EXCLUDED.home_score AND results.away_score = EXCLUDED.away_score
                THEN results.updated_at
                ELSE NOW()
            END
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(key.matchday)
    .bind(&key.home_team)
    .bind(&key.away_team)
    .bind(score.home_score)
    .bind(score.away_score)
    .fetch_one(executor)
    .await
}

pub async fn get_all_results<'e, E: PgExecutor<'e>>(
    executor: E,
) -> Result<Vec<MatchResult>, sqlx::Error> {
    sqlx::query_as::<_, MatchResult>(
        "SELECT * FROM results ORDER BY matchday, home_team, away_team",
    )
    .fetch_all(executor)
    .await
}

pub async fn get_results_map<'e, E: PgExecutor<'e>>(
    executor: E,
) -> Result<HashMap<MatchKey, ScoreLine>, sqlx::Error> {
    let results = get_all_results(executor).await?;
    Ok(results
        .iter()
        .map(|result| (result.key(), result.score()))
        .collect())
}
