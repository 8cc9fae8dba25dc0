use actix_web::{web, HttpResponse, Result};
use sqlx::PgPool;

use crate::models::common::ApiResponse;
use crate::services::football_data_client::FootballDataClient;
use crate::services::team_service::{PopulateTeamsError, TeamService};

// POST /admin/teams/populate - Load the tournament's teams from the fixtures source
pub async fn populate_teams(
    pool: web::Data<PgPool>,
    client: web::Data<FootballDataClient>,
) -> Result<HttpResponse> {
    match TeamService::new(pool.get_ref().clone()).populate_teams(client.get_ref()).await {
        Ok(report) => Ok(HttpResponse::Ok().json(ApiResponse::success("Teams populated", report))),
        Err(PopulateTeamsError::Source(e)) => Ok(HttpResponse::BadGateway().json(
            ApiResponse::<()>::error_with_message("Teams source unavailable", e.to_string()),
        )),
        Err(PopulateTeamsError::Database(e)) => {
            tracing::error!("Failed to store teams: {}", e);
            Ok(HttpResponse::InternalServerError().json(ApiResponse::error("Database error")))
        }
    }
}
