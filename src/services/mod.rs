pub mod account_service;
pub mod football_data_client;
pub mod google_oauth_client;
pub mod points_service;
pub mod prediction_service;
pub mod results_sync_service;
pub mod scheduler;
pub mod source_error;
pub mod team_service;

pub use account_service::AccountService;
pub use football_data_client::FootballDataClient;
pub use google_oauth_client::GoogleOAuthClient;
pub use points_service::PointsService;
pub use prediction_service::PredictionService;
pub use results_sync_service::ResultsSyncService;
pub use scheduler::SchedulerService;
pub use team_service::TeamService;
