use std::net::TcpListener;
use secrecy::ExposeSecret;
use sqlx::postgres::PgPoolOptions;
use std::time::Duration;

use prediction_pool::run;
use prediction_pool::config::settings::{get_config, get_jwt_settings};
use prediction_pool::telemetry::{get_subscriber, init_subscriber};
use prediction_pool::services::{FootballDataClient, GoogleOAuthClient, SchedulerService, TeamService};

#[tokio::main]
async fn main() -> std::io::Result<()> {
    // Panic if we can't read the config
    let config = get_config().expect("Failed to read the config.");

    let subscriber = get_subscriber(
        "prediction-pool".into(),
        config.application.log_level.clone(),
        std::io::stdout
    );
    init_subscriber(subscriber);

    let jwt_settings = get_jwt_settings(&config);

    // Only try to establish connection when actually used
    let connection_pool = PgPoolOptions::new()
        .max_connections(16)
        .acquire_timeout(Duration::from_secs(10))
        .idle_timeout(Duration::from_secs(600))
        .max_lifetime(Duration::from_secs(1800))
        .connect_lazy(
            config.database.connection_string().expose_secret()
        )
        .expect("Failed to create Postgres connection pool");

    if let Err(e) = sqlx::migrate!("./migrations").run(&connection_pool).await {
        tracing::error!("Failed to run database migrations: {}", e);
        std::process::exit(1);
    }

    let football_client = match FootballDataClient::new(&config.football_data) {
        Ok(client) => client,
        Err(e) => {
            tracing::error!("Failed to create football-data client: {}", e);
            std::process::exit(1);
        }
    };
    let oauth_client = GoogleOAuthClient::new(config.oauth.clone());

    if config.scheduler.populate_teams_on_startup {
        match TeamService::new(connection_pool.clone()).populate_teams(&football_client).await {
            Ok(report) => tracing::info!("Populated teams: {} fetched, {} new", report.fetched, report.inserted),
            // Teams can still be loaded later through the admin endpoint
            Err(e) => tracing::error!("Failed to populate teams on startup: {}", e),
        }
    }

    let scheduler = if config.scheduler.results_sync_cron.trim().is_empty() {
        tracing::info!("No results sync schedule configured");
        None
    } else {
        let scheduler = match SchedulerService::new(connection_pool.clone(), football_client.clone()).await {
            Ok(scheduler) => scheduler,
            Err(e) => {
                tracing::error!("Failed to create scheduler service: {}", e);
                std::process::exit(1);
            }
        };
        if let Err(e) = scheduler.schedule_results_sync(&config.scheduler.results_sync_cron).await {
            tracing::error!("Invalid results sync schedule '{}': {}", config.scheduler.results_sync_cron, e);
            std::process::exit(1);
        }
        if let Err(e) = scheduler.start().await {
            tracing::error!("Failed to start scheduler: {}", e);
            std::process::exit(1);
        }
        Some(scheduler)
    };

    let address = format!("{}:{}", config.application.host, config.application.port);
    let listener = TcpListener::bind(&address)?;
    tracing::info!("Listening on {}", address);

    let served = run(
        listener,
        connection_pool,
        jwt_settings,
        football_client,
        oauth_client,
        config.tournament.clone(),
        config.application.allowed_origins.clone(),
    )?.await;

    if let Some(scheduler) = scheduler {
        if let Err(e) = scheduler.unschedule_results_sync().await {
            tracing::warn!("Failed to remove results sync job: {}", e);
        }
        if let Err(e) = scheduler.stop().await {
            tracing::warn!("Failed to stop scheduler cleanly: {}", e);
        }
    }
    served
}
