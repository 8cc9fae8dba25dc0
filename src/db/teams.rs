use sqlx::PgExecutor;
use uuid::Uuid;

use crate::models::team::{SourceTeam, TeamWithAllocationCount};

pub async fn list_teams_with_counts<'e, E: PgExecutor<'e>>(
    executor: E,
) -> Result<Vec<TeamWithAllocationCount>, sqlx::Error> {
    sqlx::query_as::<_, TeamWithAllocationCount>(
        r#"
        SELECT t.id, t.name, t.crest_url, COUNT(u.id) AS allocated_users
        FROM teams t
        LEFT JOIN users u ON u.team_id = t.id
        GROUP BY t.id, t.name, t.crest_url
        ORDER BY t.name ASC
        "#,
    )
    .fetch_all(executor)
    .await
}

/// Advisory lock key guarding team allocation.
const ALLOCATION_LOCK_KEY: i64 = 0x7465_616d_5f61_6c6c;

/// Serialise team allocations until the surrounding transaction ends.
pub async fn lock_allocations<'e, E: PgExecutor<'e>>(executor: E) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT pg_advisory_xact_lock($1)")
        .bind(ALLOCATION_LOCK_KEY)
        .execute(executor)
        .await?;
    Ok(())
}

/// Current number of users allocated to every team, including empty teams.
pub async fn get_allocation_counts<'e, E: PgExecutor<'e>>(
    executor: E,
) -> Result<Vec<(Uuid, i64)>, sqlx::Error> {
    sqlx::query_as::<_, (Uuid, i64)>(
        r#"
        SELECT t.id, COUNT(u.id)
        FROM teams t
        LEFT JOIN users u ON u.team_id = t.id
        GROUP BY t.id
        "#,
    )
    .fetch_all(executor)
    .await
}

pub async fn assign_team<'e, E: PgExecutor<'e>>(
    executor: E,
    user_id: Uuid,
    team_id: Uuid,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE users SET team_id = $2, updated_at = NOW() WHERE id = $1")
        .bind(user_id)
        .bind(team_id)
        .execute(executor)
        .await?;
    Ok(())
}

/// Insert a team by name or refresh its crest. Returns `true` when the row is new.
pub async fn upsert_source_team<'e, E: PgExecutor<'e>>(
    executor: E,
    team: &SourceTeam,
) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar::<_, bool>(
        r#"
        INSERT INTO teams (id, name, crest_url, created_at)
        VALUES ($1, $2, $3, NOW())
        ON CONFLICT (name) DO UPDATE SET
            crest_url = COALESCE(EXCLUDED.crest_url, teams.crest_url)
        RETURNING (xmax = 0) AS inserted
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(&team.name)
    .bind(&team.crest_url)
    .fetch_one(executor)
    .await
}
