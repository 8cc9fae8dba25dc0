use actix_web::{get, post, web, HttpResponse, Result};
use sqlx::PgPool;

use crate::config::tournament::TournamentSettings;
use crate::handlers::prediction_handler;
use crate::middleware::auth::Claims;
use crate::models::prediction::SubmitPredictionsRequest;
use crate::services::football_data_client::FootballDataClient;

/// Fixtures with the caller's predictions, results and points
#[get("")]
async fn get_predictions(
    claims: web::ReqData<Claims>,
    pool: web::Data<PgPool>,
    client: web::Data<FootballDataClient>,
    tournament: web::Data<TournamentSettings>,
) -> Result<HttpResponse> {
    prediction_handler::get_my_predictions(claims, pool, client, tournament).await
}

/// Create or overwrite the caller's predictions
#[post("")]
async fn submit_predictions(
    body: web::Json<SubmitPredictionsRequest>,
    claims: web::ReqData<Claims>,
    pool: web::Data<PgPool>,
    client: web::Data<FootballDataClient>,
    tournament: web::Data<TournamentSettings>,
) -> Result<HttpResponse> {
    prediction_handler::submit_predictions(body, claims, pool, client, tournament).await
}
