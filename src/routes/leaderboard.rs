use actix_web::{get, web, HttpResponse, Result};
use sqlx::PgPool;

use crate::handlers::leaderboard_handler;

#[get("")]
async fn get_leaderboard(pool: web::Data<PgPool>) -> Result<HttpResponse> {
    leaderboard_handler::get_leaderboard(pool).await
}
