use actix_web::web;

use crate::handlers::admin::{results_handler, team_handler, user_handler};
use crate::middleware::admin::AdminMiddleware;

pub fn init_admin_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/admin")
            .wrap(AdminMiddleware)
            // Results and scoring
            .service(
                web::resource("/results/sync")
                    .route(web::post().to(results_handler::sync_results))
            )
            .service(
                web::resource("/points/recompute")
                    .route(web::post().to(results_handler::recompute_points))
            )

            // Teams
            .service(
                web::resource("/teams/populate")
                    .route(web::post().to(team_handler::populate_teams))
            )

            // Users
            .service(
                web::resource("/users/{id}")
                    .route(web::delete().to(user_handler::delete_user))
            )
            .service(
                web::resource("/users/{id}/points")
                    .route(web::post().to(user_handler::recompute_user_points))
            )
    );
}
