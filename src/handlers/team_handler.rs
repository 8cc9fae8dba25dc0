use actix_web::{web, HttpResponse, Result};
use sqlx::PgPool;

use crate::db::helpers::db_result;
use crate::db::{teams, users};
use crate::models::common::ApiResponse;
use crate::ok_or_return;

/// All teams with how many users drew each one
pub async fn get_teams(pool: web::Data<PgPool>) -> Result<HttpResponse> {
    let teams = ok_or_return!(db_result(teams::list_teams_with_counts(pool.get_ref()).await));
    Ok(HttpResponse::Ok().json(ApiResponse::success("Teams retrieved", teams)))
}

pub async fn get_team_allocations(pool: web::Data<PgPool>) -> Result<HttpResponse> {
    let allocations = ok_or_return!(db_result(users::get_team_allocations(pool.get_ref()).await));
    Ok(HttpResponse::Ok().json(ApiResponse::success("Team allocations retrieved", allocations)))
}
