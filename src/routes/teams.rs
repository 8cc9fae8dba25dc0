use actix_web::{get, web, HttpResponse, Result};
use sqlx::PgPool;

use crate::handlers::team_handler;

/// Teams with their allocation counts
#[get("")]
async fn get_teams(pool: web::Data<PgPool>) -> Result<HttpResponse> {
    team_handler::get_teams(pool).await
}

/// Which user drew which team
#[get("/allocations")]
async fn get_team_allocations(pool: web::Data<PgPool>) -> Result<HttpResponse> {
    team_handler::get_team_allocations(pool).await
}
