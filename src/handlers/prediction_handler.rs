use actix_web::{web, HttpResponse, Result};
use sqlx::PgPool;
use uuid::Uuid;

use crate::config::tournament::TournamentSettings;
use crate::db::helpers::require_record;
use crate::db::users;
use crate::middleware::auth::Claims;
use crate::models::common::ApiResponse;
use crate::models::prediction::{SubmitPredictionsRequest, SubmitPredictionsResponse};
use crate::ok_or_return;
use crate::services::football_data_client::FootballDataClient;
use crate::services::prediction_service::{PredictionService, SubmissionError};

fn caller_id(claims: &Claims) -> Result<Uuid, HttpResponse> {
    claims
        .user_id()
        .ok_or_else(|| HttpResponse::Unauthorized().json(ApiResponse::error("Invalid user ID")))
}

fn submission_error_response(error: SubmissionError) -> HttpResponse {
    match error {
        SubmissionError::Closed => {
            HttpResponse::Forbidden().json(ApiResponse::error(error.to_string()))
        }
        SubmissionError::Rejected(rejections) => {
            let reasons: Vec<String> = rejections.iter().map(|r| r.to_string()).collect();
            HttpResponse::BadRequest().json(ApiResponse {
                success: false,
                message: "Predictions rejected".to_string(),
                error: Some(reasons.join("; ")),
                data: Some(reasons),
            })
        }
        SubmissionError::Source(e) => {
            tracing::error!("Fixture source unavailable: {}", e);
            HttpResponse::BadGateway().json(ApiResponse::error("Fixture list is unavailable"))
        }
        SubmissionError::Database(e) => {
            tracing::error!("Database error handling predictions: {}", e);
            HttpResponse::InternalServerError().json(ApiResponse::error("Database error"))
        }
    }
}

/// Fixtures with the caller's predictions and what they scored
#[tracing::instrument(name = "Get my predictions", skip(claims, pool, client, tournament), fields(user = %claims.email))]
pub async fn get_my_predictions(
    claims: web::ReqData<Claims>,
    pool: web::Data<PgPool>,
    client: web::Data<FootballDataClient>,
    tournament: web::Data<TournamentSettings>,
) -> Result<HttpResponse> {
    let user_id = ok_or_return!(caller_id(&claims));
    ok_or_return!(require_record(
        users::get_user_by_id(pool.get_ref(), user_id).await,
        "User not found"
    ));

    let service = PredictionService::new(
        pool.get_ref().clone(),
        client.get_ref().clone(),
        tournament.get_ref().clone(),
    );
    match service.my_predictions(user_id).await {
        Ok(view) => Ok(HttpResponse::Ok().json(ApiResponse::success("Predictions retrieved", view))),
        Err(e) => Ok(submission_error_response(e)),
    }
}

#[tracing::instrument(name = "Submit predictions", skip(body, claims, pool, client, tournament), fields(user = %claims.email))]
pub async fn submit_predictions(
    body: web::Json<SubmitPredictionsRequest>,
    claims: web::ReqData<Claims>,
    pool: web::Data<PgPool>,
    client: web::Data<FootballDataClient>,
    tournament: web::Data<TournamentSettings>,
) -> Result<HttpResponse> {
    let user_id = ok_or_return!(caller_id(&claims));
    ok_or_return!(require_record(
        users::get_user_by_id(pool.get_ref(), user_id).await,
        "User not found"
    ));

    let service = PredictionService::new(
        pool.get_ref().clone(),
        client.get_ref().clone(),
        tournament.get_ref().clone(),
    );
    match service.submit(user_id, &body.predictions).await {
        Ok(outcome) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            "Your predictions were successfully saved!",
            SubmitPredictionsResponse {
                saved: outcome.saved,
                points: outcome.points,
            },
        ))),
        Err(e) => Ok(submission_error_response(e)),
    }
}
