// src/routes/auth.rs
use actix_web::{get, web, HttpRequest, HttpResponse};
use sqlx::PgPool;

use crate::config::jwt::JwtSettings;
use crate::handlers::auth_handler::{complete_login, start_login};
use crate::models::auth::OAuthCallbackQuery;
use crate::services::google_oauth_client::GoogleOAuthClient;
use crate::utils::access_policy::AccessPolicy;

#[get("/login")]
async fn login(oauth_client: web::Data<GoogleOAuthClient>) -> HttpResponse {
    start_login(oauth_client).await
}

#[get("/login/callback")]
async fn login_callback(
    query: web::Query<OAuthCallbackQuery>,
    req: HttpRequest,
    pool: web::Data<PgPool>,
    oauth_client: web::Data<GoogleOAuthClient>,
    policy: web::Data<AccessPolicy>,
    jwt_settings: web::Data<JwtSettings>,
) -> HttpResponse {
    complete_login(query, req, pool, oauth_client, policy, jwt_settings).await
}
