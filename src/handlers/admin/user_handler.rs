use actix_web::{web, HttpResponse, Result};
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::helpers::db_result;
use crate::db::users;
use crate::models::common::ApiResponse;
use crate::ok_or_return;
use crate::services::points_service::PointsService;

// DELETE /admin/users/{id} - Remove a user and all of their predictions
pub async fn delete_user(
    pool: web::Data<PgPool>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let user_id = path.into_inner();

    let deleted = ok_or_return!(db_result(
        users::delete_user_with_predictions(pool.get_ref(), user_id).await
    ));
    if !deleted {
        return Ok(HttpResponse::NotFound().json(ApiResponse::error("User not found")));
    }

    Ok(HttpResponse::Ok().json(ApiResponse::success_message("User and predictions deleted")))
}

// POST /admin/users/{id}/points - Recompute and return a single user's points
pub async fn recompute_user_points(
    pool: web::Data<PgPool>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let user_id = path.into_inner();
    let points = ok_or_return!(db_result(
        PointsService::new(pool.get_ref().clone()).recompute_user_points(user_id).await
    ));
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        "Points recomputed",
        serde_json::json!({ "user_id": user_id, "points": points }),
    )))
}
