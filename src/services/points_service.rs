use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::db::{predictions, results, users};
use crate::scoring::score;

/// Keeps every user's `points` equal to the scoring of their predictions
/// against the stored results. Points are always recomputed from scratch.
#[derive(Debug, Clone)]
pub struct PointsService {
    pool: PgPool,
}

impl PointsService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub(crate) async fn recompute_in_tx(
        conn: &mut PgConnection,
        user_ids: &[Uuid],
    ) -> Result<(), sqlx::Error> {
        let results = results::get_results_map(&mut *conn).await?;
        for user_id in user_ids {
            let user_predictions = predictions::get_predictions_for_user(&mut *conn, *user_id).await?;
            let points = score(&predictions::prediction_map(&user_predictions), &results);
            users::set_user_points(&mut *conn, *user_id, points).await?;
            tracing::debug!("User {} now has {} points", user_id, points);
        }
        Ok(())
    }

    /// Recompute points for all users in one transaction.
    ///
    /// Any failure rolls back every update, so no partial leaderboard is ever visible.
    #[tracing::instrument(name = "Recompute points for all users", skip(self))]
    pub async fn recompute_all_points(&self) -> Result<usize, sqlx::Error> {
        let mut tx = self.pool.begin().await?;
        let user_ids = users::list_user_ids(&mut *tx).await?;

        if let Err(e) = Self::recompute_in_tx(&mut tx, &user_ids).await {
            tracing::error!("Points recompute failed, rolling back: {}", e);
            let _ = tx.rollback().await;
            return Err(e);
        }

        tx.commit().await.map_err(|e| {
            tracing::error!("Failed to commit points update: {}", e);
            e
        })?;

        tracing::info!("Recomputed points for {} users", user_ids.len());
        Ok(user_ids.len())
    }

    /// Rescore one user on the caller's connection and return the new total.
    pub(crate) async fn rescore_user_in_tx(conn: &mut PgConnection, user_id: Uuid) -> Result<i32, sqlx::Error> {
        Self::recompute_in_tx(&mut *conn, &[user_id]).await?;
        sqlx::query_scalar::<_, i32>("SELECT points FROM users WHERE id = $1")
            .bind(user_id)
            .fetch_one(&mut *conn)
            .await
    }

    pub async fn recompute_user_points(&self, user_id: Uuid) -> Result<i32, sqlx::Error> {
        let mut tx = self.pool.begin().await?;
        let points = Self::rescore_user_in_tx(&mut tx, user_id).await?;
        tx.commit().await?;
        Ok(points)
    }
}
