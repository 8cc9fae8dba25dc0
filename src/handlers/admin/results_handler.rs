use actix_web::{web, HttpResponse, Result};
use sqlx::PgPool;

use crate::middleware::auth::Claims;
use crate::models::common::ApiResponse;
use crate::services::football_data_client::FootballDataClient;
use crate::services::points_service::PointsService;
use crate::services::results_sync_service::{ResultsSyncService, SyncError};

// POST /admin/results/sync - Pull final scores and rescore everyone
#[tracing::instrument(name = "Admin results sync", skip(pool, client, claims), fields(admin = %claims.email))]
pub async fn sync_results(
    pool: web::Data<PgPool>,
    client: web::Data<FootballDataClient>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse> {
    let sync = ResultsSyncService::new(pool.get_ref().clone(), client.get_ref().clone());

    match sync.sync_results().await {
        Ok(report) => Ok(HttpResponse::Ok().json(ApiResponse::success("Results synced", report))),
        Err(SyncError::Source(e)) => Ok(HttpResponse::BadGateway().json(
            ApiResponse::<()>::error_with_message("Results source unavailable", e.to_string()),
        )),
        Err(e @ SyncError::Recompute(_)) => {
            tracing::error!("Results sync failed: {}", e);
            Ok(HttpResponse::InternalServerError().json(ApiResponse::error("Failed to recompute points")))
        }
    }
}

// POST /admin/points/recompute - Rescore everyone from stored results
pub async fn recompute_points(pool: web::Data<PgPool>) -> Result<HttpResponse> {
    match PointsService::new(pool.get_ref().clone()).recompute_all_points().await {
        Ok(users_scored) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            "Points recomputed",
            serde_json::json!({ "users_scored": users_scored }),
        ))),
        Err(_) => Ok(HttpResponse::InternalServerError().json(ApiResponse::error("Failed to recompute points"))),
    }
}
