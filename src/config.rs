pub mod settings;
pub mod jwt;
pub mod football_data;
pub mod oauth;
pub mod tournament;
