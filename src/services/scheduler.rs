use std::sync::Arc;
use std::error::Error;
use tokio::sync::Mutex;
use tokio_cron_scheduler::{Job, JobScheduler, JobSchedulerError};
use sqlx::PgPool;
use uuid::Uuid;

use crate::services::football_data_client::FootballDataClient;
use crate::services::results_sync_service::ResultsSyncService;

pub struct SchedulerService {
    scheduler: Arc<Mutex<JobScheduler>>,
    pool: PgPool,
    client: FootballDataClient,
    sync_job: Arc<Mutex<Option<Uuid>>>,
}

impl SchedulerService {
    pub async fn new(pool: PgPool, client: FootballDataClient) -> Result<Self, Box<dyn Error>> {
        let scheduler = JobScheduler::new().await?;

        Ok(Self {
            scheduler: Arc::new(Mutex::new(scheduler)),
            pool,
            client,
            sync_job: Arc::new(Mutex::new(None)),
        })
    }

    pub async fn start(&self) -> Result<(), Box<dyn Error>> {
        let scheduler = self.scheduler.lock().await;
        scheduler.start().await?;

        tracing::info!("Scheduler service started");
        Ok(())
    }

    pub async fn stop(&self) -> Result<(), Box<dyn Error>> {
        let mut scheduler = self.scheduler.lock().await;
        scheduler.shutdown().await?;

        tracing::info!("Scheduler service stopped");
        Ok(())
    }

    /// Run the results sync and points recompute on a cron schedule.
    pub async fn schedule_results_sync(&self, cron_expr: &str) -> Result<Uuid, JobSchedulerError> {
        let scheduler = self.scheduler.lock().await;

        let pool = self.pool.clone();
        let client = self.client.clone();

        let sync_job = Job::new_async(cron_expr, move |_uuid, _l| {
            let pool = pool.clone();
            let client = client.clone();

            Box::pin(async move {
                tracing::info!("Running scheduled results sync");

                let sync = ResultsSyncService::new(pool, client);
                match sync.sync_results().await {
                    Ok(report) => {
                        tracing::info!("Scheduled results sync stored {} results ({} failed)",
                            report.upserted, report.failed.len());
                    }
                    Err(e) => {
                        tracing::error!("Scheduled results sync failed: {}", e);
                    }
                }
            })
        })?;

        let job_id = sync_job.guid();
        scheduler.add(sync_job).await?;
        *self.sync_job.lock().await = Some(job_id);

        tracing::info!("Scheduled results sync with cron '{}'", cron_expr);
        Ok(job_id)
    }

    pub async fn unschedule_results_sync(&self) -> Result<(), Box<dyn Error>> {
        if let Some(job_id) = self.sync_job.lock().await.take() {
            let scheduler = self.scheduler.lock().await;
            scheduler.remove(&job_id).await?;
            tracing::info!("Removed results sync job {}", job_id);
        }
        Ok(())
    }
}
