use std::collections::HashMap;

use serde::Serialize;
use sqlx::PgPool;

use crate::db::results;
use crate::models::fixture::{MatchKey, ScoreLine};
use crate::services::football_data_client::FootballDataClient;
use crate::services::points_service::PointsService;
use crate::services::source_error::SourceError;

#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error("Failed to fetch results: {0}")]
    Source(#[from] SourceError),

    #[error("Failed to recompute points: {0}")]
    Recompute(#[source] sqlx::Error),
}

#[derive(Debug, Clone, Serialize)]
pub struct FailedUpsert {
    pub key: String,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize, Default)]
pub struct SyncReport {
    pub fetched: usize,
    pub upserted: usize,
    pub failed: Vec<FailedUpsert>,
    pub users_scored: usize,
}

/// Pulls final scores from the fixtures source into the results table.
#[derive(Debug)]
pub struct ResultsSyncService {
    pool: PgPool,
    client: FootballDataClient,
    points: PointsService,
}

impl ResultsSyncService {
    pub fn new(pool: PgPool, client: FootballDataClient) -> Self {
        Self {
            points: PointsService::new(pool.clone()),
            pool,
            client,
        }
    }

    /// Fetch, ingest and rescore. A source failure aborts before anything is written.
    #[tracing::instrument(name = "Sync results", skip(self))]
    pub async fn sync_results(&self) -> Result<SyncReport, SyncError> {
        let fetched = self.client.get_results().await.map_err(|e| {
            tracing::error!("Aborting results sync: {}", e);
            e
        })?;

        let mut report = self.ingest_results(&fetched).await;
        report.users_scored = self
            .points
            .recompute_all_points()
            .await
            .map_err(SyncError::Recompute)?;

        tracing::info!(
            "Results sync finished: {} fetched, {} upserted, {} failed, {} users scored",
            report.fetched, report.upserted, report.failed.len(), report.users_scored
        );
        Ok(report)
    }

    /// Upsert each result in its own transaction.
    ///
    /// A failed record is rolled back and reported; the rest of the batch carries on.
    pub async fn ingest_results(&self, fetched: &HashMap<MatchKey, ScoreLine>) -> SyncReport {
        let mut keys: Vec<&MatchKey> = fetched.keys().collect();
        keys.sort();

        let mut report = SyncReport {
            fetched: fetched.len(),
            ..SyncReport::default()
        };

        for key in keys {
            let score = &fetched[key];
            match self.upsert_one(key, score).await {
                Ok(()) => report.upserted += 1,
                Err(e) => {
                    tracing::error!("Failed to store result {} ({}): {}", key, score, e);
                    report.failed.push(FailedUpsert {
                        key: key.to_string(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        report
    }

    async fn upsert_one(&self, key: &MatchKey, score: &ScoreLine) -> Result<(), sqlx::Error> {
        let mut tx = self.pool.begin().await?;
        match results::upsert_result(&mut *tx, key, score).await {
            Ok(_) => tx.commit().await,
            Err(e) => {
                let _ = tx.rollback().await;
                Err(e)
            }
        }
    }
}
