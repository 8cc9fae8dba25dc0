use actix_web::web;

pub mod admin;
pub mod auth;
pub mod backend_health;
pub mod leaderboard;
pub mod predictions;
pub mod teams;

use crate::middleware::auth::AuthMiddleware;

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(backend_health::backend_health)
        .service(auth::login)
        .service(auth::login_callback);

    // Prediction routes (require authentication)
    cfg.service(
        web::scope("/predictions")
            .wrap(AuthMiddleware)
            .service(predictions::get_predictions)
            .service(predictions::submit_predictions)
    );
    cfg.service(
        web::scope("/leaderboard")
            .wrap(AuthMiddleware)
            .service(leaderboard::get_leaderboard)
    );
    cfg.service(
        web::scope("/teams")
            .wrap(AuthMiddleware)
            .service(teams::get_teams)
            .service(teams::get_team_allocations)
    );

    admin::init_admin_routes(cfg);
}
