use serde::Serialize;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::db::teams;
use crate::scoring::pick_least_allocated;
use crate::services::football_data_client::FootballDataClient;
use crate::services::source_error::SourceError;

#[derive(Debug, thiserror::Error)]
pub enum PopulateTeamsError {
    #[error(transparent)]
    Source(#[from] SourceError),

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

#[derive(Debug, Clone, Serialize)]
pub struct PopulateTeamsReport {
    pub fetched: usize,
    pub inserted: usize,
}

#[derive(Debug)]
pub struct TeamService {
    pool: PgPool,
}

impl TeamService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Allocate the least-allocated team to a user, breaking ties at random.
    ///
    /// Must run inside the caller's transaction: the allocation lock is held
    /// until that transaction commits, so concurrent sign-ins see each other's
    /// allocations. Returns `None` when no teams exist yet.
    pub async fn allocate_team(conn: &mut PgConnection, user_id: Uuid) -> Result<Option<Uuid>, sqlx::Error> {
        teams::lock_allocations(&mut *conn).await?;
        let counts = teams::get_allocation_counts(&mut *conn).await?;
        let picked = {
            let mut rng = rand::thread_rng();
            pick_least_allocated(&counts, &mut rng)
        };

        match picked {
            Some(team_id) => {
                teams::assign_team(&mut *conn, user_id, team_id).await?;
                tracing::info!("Allocated team {} to user {}", team_id, user_id);
            }
            None => tracing::warn!("No teams available, user {} left without a team", user_id),
        }
        Ok(picked)
    }

    /// Make sure every team the fixtures source knows about exists locally.
    #[tracing::instrument(name = "Populate teams", skip(self, client))]
    pub async fn populate_teams(&self, client: &FootballDataClient) -> Result<PopulateTeamsReport, PopulateTeamsError> {
        let source_teams = client.get_all_teams().await?;

        let mut tx = self.pool.begin().await?;
        let mut inserted = 0;
        for team in &source_teams {
            if teams::upsert_source_team(&mut *tx, team).await? {
                inserted += 1;
            }
        }
        tx.commit().await?;

        tracing::info!("Populated teams: {} fetched, {} new", source_teams.len(), inserted);
        Ok(PopulateTeamsReport {
            fetched: source_teams.len(),
            inserted,
        })
    }
}
