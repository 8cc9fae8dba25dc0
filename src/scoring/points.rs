use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::models::fixture::{MatchKey, ScoreLine};

pub const EXACT_SCORE_POINTS: i32 = 3;
pub const CORRECT_OUTCOME_POINTS: i32 = 1;

/// How a prediction compares with the actual result.
///
/// The classes are checked in declaration order and the first one that
/// applies wins, so an exact 1-1 is `ExactScore`, never `CorrectDraw`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PredictionOutcome {
    ExactScore,
    CorrectDraw,
    CorrectHomeWin,
    CorrectAwayWin,
    Miss,
}

impl PredictionOutcome {
    pub fn classify(predicted: &ScoreLine, actual: &ScoreLine) -> Self {
        if predicted == actual {
            PredictionOutcome::ExactScore
        } else if predicted.is_draw() && actual.is_draw() {
            PredictionOutcome::CorrectDraw
        } else if predicted.is_home_win() && actual.is_home_win() {
            PredictionOutcome::CorrectHomeWin
        } else if predicted.is_away_win() && actual.is_away_win() {
            PredictionOutcome::CorrectAwayWin
        } else {
            PredictionOutcome::Miss
        }
    }

    pub fn points(&self) -> i32 {
        match self {
            PredictionOutcome::ExactScore => EXACT_SCORE_POINTS,
            PredictionOutcome::CorrectDraw
            | PredictionOutcome::CorrectHomeWin
            | PredictionOutcome::CorrectAwayWin => CORRECT_OUTCOME_POINTS,
            PredictionOutcome::Miss => 0,
        }
    }
}

/// Total points for a set of predictions against the known results.
///
/// Predictions without a result yet contribute nothing.
pub fn score(
    predictions: &HashMap<MatchKey, ScoreLine>,
    results: &HashMap<MatchKey, ScoreLine>,
) -> i32 {
    predictions
        .iter()
        .filter_map(|(key, predicted)| {
            results
                .get(key)
                .map(|actual| PredictionOutcome::classify(predicted, actual).points())
        })
        .sum()
}
