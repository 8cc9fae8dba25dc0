use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::fixture::{FixtureStatus, MatchKey, ScoreLine};
use crate::scoring::points::PredictionOutcome;

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Prediction {
    pub id: Uuid,
    pub user_id: Uuid,
    pub matchday: i32,
    pub home_team: String,
    pub away_team: String,
    pub home_score: i32,
    pub away_score: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Prediction {
    pub fn key(&self) -> MatchKey {
        MatchKey::new(self.matchday, self.home_team.clone(), self.away_team.clone())
    }

    pub fn score(&self) -> ScoreLine {
        ScoreLine::new(self.home_score, self.away_score)
    }
}

/// One predicted fixture as submitted by a user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionInput {
    pub matchday: i32,
    pub home_team: String,
    pub away_team: String,
    pub home_score: i32,
    pub away_score: i32,
}

impl PredictionInput {
    pub fn key(&self) -> MatchKey {
        MatchKey::new(self.matchday, self.home_team.trim(), self.away_team.trim())
    }

    pub fn score(&self) -> ScoreLine {
        ScoreLine::new(self.home_score, self.away_score)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitPredictionsRequest {
    pub predictions: Vec<PredictionInput>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitPredictionsResponse {
    pub saved: usize,
    pub points: i32,
}

/// A fixture joined with the caller's prediction and, once known, its result
#[derive(Debug, Clone, Serialize)]
pub struct PredictionView {
    #[serde(flatten)]
    pub key: MatchKey,
    pub kickoff: Option<DateTime<Utc>>,
    pub status: FixtureStatus,
    pub prediction: Option<ScoreLine>,
    pub result: Option<ScoreLine>,
    pub outcome: Option<PredictionOutcome>,
    pub points: i32,
}

#[derive(Debug, Clone, Serialize)]
pub struct MyPredictionsResponse {
    pub total_points: i32,
    pub predictions_open: bool,
    pub fixtures: Vec<PredictionView>,
}
