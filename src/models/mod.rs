pub mod auth;
pub mod common;
pub mod fixture;
pub mod match_result;
pub mod prediction;
pub mod team;
pub mod user;
