use serde::Deserialize;
use secrecy::SecretString;

#[derive(Deserialize, Debug, Clone)]
pub struct FootballDataSettings {
    pub base_url: String,
    pub api_key: SecretString,
    pub season_id: u32,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    10
}
