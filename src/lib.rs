use actix_web::{http, web, App, HttpServer};
use actix_web::dev::Server;
use tracing_actix_web::TracingLogger;
use sqlx::PgPool;
use std::net::TcpListener;
use actix_cors::Cors;

pub mod auth;
pub mod config;
mod routes;
mod handlers;
pub mod models;
pub mod utils;
mod middleware;
pub mod db;
pub mod scoring;
pub mod services;
pub mod telemetry;

use crate::routes::init_routes;
use crate::config::jwt::JwtSettings;
use crate::config::tournament::TournamentSettings;
use crate::services::{FootballDataClient, GoogleOAuthClient};
use crate::utils::access_policy::AccessPolicy;

pub fn run(
    listener: TcpListener,
    db_pool: PgPool,
    jwt_settings: JwtSettings,
    football_client: FootballDataClient,
    oauth_client: GoogleOAuthClient,
    tournament: TournamentSettings,
    allowed_origins: Vec<String>,
) -> Result<Server, std::io::Error> {
    // Wrap using web::Data, which boils down to an Arc smart pointer
    let db_pool_data = web::Data::new(db_pool);
    let jwt_settings = web::Data::new(jwt_settings);
    let access_policy = web::Data::new(AccessPolicy::from_settings(oauth_client.settings()));
    let football_client = web::Data::new(football_client);
    let oauth_client = web::Data::new(oauth_client);
    let tournament = web::Data::new(tournament);

    let server = HttpServer::new(move || {
        let cors = allowed_origins
            .iter()
            .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
            .allowed_methods(vec!["GET", "POST", "DELETE"])
            .allowed_headers(vec![
                http::header::AUTHORIZATION,
                http::header::ACCEPT,
                http::header::CONTENT_TYPE,
            ])
            .supports_credentials()
            .max_age(3600);

        App::new()
            .wrap(TracingLogger::default())
            .wrap(cors)
            // Get a pointer copy and attach it to the application state
            .app_data(db_pool_data.clone())
            .app_data(jwt_settings.clone())
            .app_data(access_policy.clone())
            .app_data(football_client.clone())
            .app_data(oauth_client.clone())
            .app_data(tournament.clone())
            .configure(init_routes)
    })
    .listen(listener)?
    .run();

    Ok(server)
}
