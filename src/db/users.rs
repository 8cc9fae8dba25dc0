use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

use crate::models::user::{LeaderboardEntry, TeamAllocation, User, UserRole};

pub async fn get_user_by_id<'e, E: PgExecutor<'e>>(
    executor: E,
    user_id: Uuid,
) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
        .bind(user_id)
        .fetch_optional(executor)
        .await
}

pub async fn get_user_by_email<'e, E: PgExecutor<'e>>(
    executor: E,
    email: &str,
) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE LOWER(email) = LOWER($1)")
        .bind(email)
        .fetch_optional(executor)
        .await
}

pub async fn insert_user<'e, E: PgExecutor<'e>>(
    executor: E,
    email: &str,
    name: &str,
    role: UserRole,
    team_id: Option<Uuid>,
) -> Result<User, sqlx::Error> {
    sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (id, email, name, points, team_id, role, created_at, updated_at)
        VALUES ($1, $2, $3, 0, $4, $5, NOW(), NOW())
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(email)
    .bind(name)
    .bind(team_id)
    .bind(role)
    .fetch_one(executor)
    .await
}

/// Refresh the profile fields the identity provider owns.
pub async fn update_user_profile<'e, E: PgExecutor<'e>>(
    executor: E,
    user_id: Uuid,
    name: &str,
    role: UserRole,
) -> Result<User, sqlx::Error> {
    sqlx::query_as::<_, User>(
        r#"
        UPDATE users
        SET name = $2, role = $3, updated_at = NOW()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(user_id)
    .bind(name)
    .bind(role)
    .fetch_one(executor)
    .await
}

pub async fn list_user_ids<'e, E: PgExecutor<'e>>(executor: E) -> Result<Vec<Uuid>, sqlx::Error> {
    sqlx::query_scalar::<_, Uuid>("SELECT id FROM users ORDER BY created_at")
        .fetch_all(executor)
        .await
}

pub async fn set_user_points<'e, E: PgExecutor<'e>>(
    executor: E,
    user_id: Uuid,
    points: i32,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE users SET points = $2, updated_at = NOW() WHERE id = $1")
        .bind(user_id)
        .bind(points)
        .execute(executor)
        .await?;
    Ok(())
}

pub async fn get_leaderboard<'e, E: PgExecutor<'e>>(
    executor: E,
) -> Result<Vec<LeaderboardEntry>, sqlx::Error> {
    sqlx::query_as::<_, LeaderboardEntry>(
        r#"
        SELECT u.id AS user_id, u.name, u.points, t.name AS team_name
        FROM users u
        LEFT JOIN teams t ON t.id = u.team_id
        ORDER BY u.points DESC, u.name ASC
        "#,
    )
    .fetch_all(executor)
    .await
}

pub async fn get_team_allocations<'e, E: PgExecutor<'e>>(
    executor: E,
) -> Result<Vec<TeamAllocation>, sqlx::Error> {
    sqlx::query_as::<_, TeamAllocation>(
        r#"
        SELECT u.id AS user_id, u.name AS user_name, t.id AS team_id, t.name AS team_name, t.crest_url
        FROM users u
        LEFT JOIN teams t ON t.id = u.team_id
        ORDER BY t.name ASC NULLS LAST, u.name ASC
        "#,
    )
    .fetch_all(executor)
    .await
}

/// Delete a user together with every prediction they own.
///
/// `predictions.user_id` does not cascade, so both deletes run here in one
/// transaction. Returns `false` when the user does not exist.
#[tracing::instrument(name = "Delete user with predictions", skip(pool))]
pub async fn delete_user_with_predictions(pool: &PgPool, user_id: Uuid) -> Result<bool, sqlx::Error> {
    let mut tx = pool.begin().await?;

    let removed_predictions = sqlx::query("DELETE FROM predictions WHERE user_id = $1")
        .bind(user_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

    let removed_users = sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(user_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

    if removed_users == 0 {
        tx.rollback().await?;
        return Ok(false);
    }

    tx.commit().await?;
    tracing::info!("Deleted user {} and {} predictions", user_id, removed_predictions);
    Ok(true)
}
