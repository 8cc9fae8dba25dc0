use actix_web::{web, HttpResponse, Result};
use sqlx::PgPool;

use crate::db::helpers::db_result;
use crate::db::users;
use crate::models::common::ApiResponse;
use crate::ok_or_return;

pub async fn get_leaderboard(pool: web::Data<PgPool>) -> Result<HttpResponse> {
    let entries = ok_or_return!(db_result(users::get_leaderboard(pool.get_ref()).await));
    Ok(HttpResponse::Ok().json(ApiResponse::success("Leaderboard retrieved", entries)))
}
