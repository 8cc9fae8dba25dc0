use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::fixture::{MatchKey, ScoreLine};

/// Persisted authoritative result of a finished fixture
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct MatchResult {
    pub id: Uuid,
    pub matchday: i32,
    pub home_team: String,
    pub away_team: String,
    pub home_score: i32,
    pub away_score: i32,
    pub updated_at: DateTime<Utc>,
}

impl MatchResult {
    pub fn key(&self) -> MatchKey {
        MatchKey::new(self.matchday, self.home_team.clone(), self.away_team.clone())
    }

    pub fn score(&self) -> ScoreLine {
        ScoreLine::new(self.home_score, self.away_score)
    }
}
