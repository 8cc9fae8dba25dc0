// src/handlers/auth_handler.rs
use actix_web::cookie::{time::Duration, Cookie, SameSite};
use actix_web::{http::header, web, HttpRequest, HttpResponse};
use rand::distributions::Alphanumeric;
use rand::Rng;
use sqlx::PgPool;

use crate::auth::jwt::generate_token;
use crate::config::jwt::JwtSettings;
use crate::models::auth::{LoginResponse, OAuthCallbackQuery};
use crate::models::common::ApiResponse;
use crate::services::account_service::{AccountService, AuthError};
use crate::services::google_oauth_client::GoogleOAuthClient;
use crate::utils::access_policy::AccessPolicy;

pub const STATE_COOKIE: &str = "oauth_state";

fn random_state() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(32)
        .map(char::from)
        .collect()
}

fn auth_error_response(error: &AuthError) -> HttpResponse {
    let body = ApiResponse::error(error.to_string());
    match error {
        AuthError::InvalidState | AuthError::Denied(_) => HttpResponse::BadRequest().json(body),
        AuthError::EmailNotVerified(_) | AuthError::DomainNotAllowed(_) => {
            HttpResponse::Forbidden().json(body)
        }
        AuthError::Provider(_) => HttpResponse::BadGateway().json(body),
        AuthError::Database(_) | AuthError::Token(_) | AuthError::AuthorizationUrl(_) => {
            HttpResponse::InternalServerError().json(ApiResponse::error("Login failed"))
        }
    }
}

/// Redirect to the identity provider, remembering the CSRF state in a cookie.
pub async fn start_login(oauth_client: web::Data<GoogleOAuthClient>) -> HttpResponse {
    let state = random_state();
    let url = match oauth_client.authorization_url(&state) {
        Ok(url) => url,
        Err(e) => {
            tracing::error!("Failed to build authorization URL: {}", e);
            return auth_error_response(&AuthError::AuthorizationUrl(e));
        }
    };

    let cookie = Cookie::build(STATE_COOKIE, state)
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(Duration::minutes(10))
        .finish();

    HttpResponse::Found()
        .append_header((header::LOCATION, url))
        .cookie(cookie)
        .finish()
}

async fn login_from_callback(
    query: &OAuthCallbackQuery,
    req: &HttpRequest,
    pool: &PgPool,
    oauth_client: &GoogleOAuthClient,
    policy: &AccessPolicy,
    jwt_settings: &JwtSettings,
) -> Result<String, AuthError> {
    if let Some(error) = &query.error {
        return Err(AuthError::Denied(error.clone()));
    }

    let expected_state = req.cookie(STATE_COOKIE).map(|cookie| cookie.value().to_string());
    match (query.state.as_deref(), expected_state.as_deref()) {
        (Some(state), Some(expected)) if state == expected => {}
        _ => return Err(AuthError::InvalidState),
    }

    let code = query
        .code
        .as_deref()
        .ok_or_else(|| AuthError::Denied("missing authorization code".to_string()))?;

    let profile = oauth_client.authenticate(code).await?;
    let user = AccountService::new(pool.clone()).sign_in(&profile, policy).await?;
    Ok(generate_token(&user, jwt_settings)?)
}

#[tracing::instrument(
    name = "Complete login",
    skip(query, req, pool, oauth_client, policy, jwt_settings)
)]
pub async fn complete_login(
    query: web::Query<OAuthCallbackQuery>,
    req: HttpRequest,
    pool: web::Data<PgPool>,
    oauth_client: web::Data<GoogleOAuthClient>,
    policy: web::Data<AccessPolicy>,
    jwt_settings: web::Data<JwtSettings>,
) -> HttpResponse {
    match login_from_callback(&query, &req, &pool, &oauth_client, &policy, &jwt_settings).await {
        Ok(token) => {
            let mut expired_state = Cookie::build(STATE_COOKIE, "").path("/").finish();
            expired_state.make_removal();
            HttpResponse::Ok()
                .cookie(expired_state)
                .json(LoginResponse { token })
        }
        Err(e) => {
            tracing::info!("Login failed: {}", e);
            auth_error_response(&e)
        }
    }
}
