pub mod helpers;
pub mod predictions;
pub mod results;
pub mod teams;
pub mod users;
