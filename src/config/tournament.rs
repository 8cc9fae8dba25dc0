use chrono::{DateTime, Utc};
use serde::Deserialize;

#[derive(Deserialize, Debug, Clone, Default)]
pub struct TournamentSettings {
    #[serde(default)]
    pub predictions_locked: bool,
    #[serde(default)]
    pub lock_at: Option<DateTime<Utc>>,
}

impl TournamentSettings {
    /// Predictions close once the flag is set or the lock instant has passed.
    pub fn predictions_closed(&self, now: DateTime<Utc>) -> bool {
        self.predictions_locked || self.lock_at.map_or(false, |lock_at| now >= lock_at)
    }
}
