pub mod results_handler;
pub mod team_handler;
pub mod user_handler;
