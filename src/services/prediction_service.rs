use std::collections::{HashMap, HashSet};
use std::fmt;

use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::config::tournament::TournamentSettings;
use crate::db::{predictions, results};
use crate::models::fixture::{Fixture, MatchKey, ScoreLine};
use crate::models::prediction::{MyPredictionsResponse, PredictionInput, PredictionView};
use crate::scoring::{score, PredictionOutcome};
use crate::services::football_data_client::FootballDataClient;
use crate::services::points_service::PointsService;
use crate::services::source_error::SourceError;

/// Why a single predicted fixture was refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    UnknownFixture(MatchKey),
    FixtureFinished(MatchKey),
    NegativeScore(MatchKey),
    DuplicateFixture(MatchKey),
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::UnknownFixture(key) => write!(
                f,
                "{} vs {} on matchday {} is not a fixture",
                key.home_team, key.away_team, key.matchday
            ),
            Rejection::FixtureFinished(key) => write!(
                f,
                "{} vs {} on matchday {} has already finished",
                key.home_team, key.away_team, key.matchday
            ),
            Rejection::NegativeScore(key) => write!(
                f,
                "Scores for {} vs {} cannot be negative",
                key.home_team, key.away_team
            ),
            Rejection::DuplicateFixture(key) => write!(
                f,
                "{} vs {} on matchday {} was predicted more than once",
                key.home_team, key.away_team, key.matchday
            ),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SubmissionError {
    #[error("Predictions are closed")]
    Closed,

    #[error("Predictions rejected")]
    Rejected(Vec<Rejection>),

    #[error(transparent)]
    Source(#[from] SourceError),

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionOutcome {
    pub saved: usize,
    pub points: i32,
}

/// Check a submission against the fixture list.
///
/// Every input is checked so the caller sees all problems at once. Any
/// rejection refuses the whole submission.
pub fn validate_submission(
    inputs: &[PredictionInput],
    fixtures: &[Fixture],
) -> Result<Vec<(MatchKey, ScoreLine)>, Vec<Rejection>> {
    let fixtures_by_key: HashMap<&MatchKey, &Fixture> =
        fixtures.iter().map(|fixture| (&fixture.key, fixture)).collect();

    let mut seen = HashSet::new();
    let mut accepted = Vec::with_capacity(inputs.len());
    let mut rejections = Vec::new();

    for input in inputs {
        let key = input.key();
        let predicted = input.score();

        if !seen.insert(key.clone()) {
            rejections.push(Rejection::DuplicateFixture(key));
            continue;
        }
        match fixtures_by_key.get(&key) {
            None => rejections.push(Rejection::UnknownFixture(key)),
            Some(fixture) if fixture.is_finished() => rejections.push(Rejection::FixtureFinished(key)),
            Some(_) if !predicted.is_valid() => rejections.push(Rejection::NegativeScore(key)),
            Some(_) => accepted.push((key, predicted)),
        }
    }

    if rejections.is_empty() {
        Ok(accepted)
    } else {
        Err(rejections)
    }
}

/// Joins the fixture list with a user's predictions and the stored results.
pub fn build_prediction_views(
    fixtures: &[Fixture],
    predicted: &HashMap<MatchKey, ScoreLine>,
    results: &HashMap<MatchKey, ScoreLine>,
) -> Vec<PredictionView> {
    fixtures
        .iter()
        .map(|fixture| {
            let prediction = predicted.get(&fixture.key).copied();
            let result = results.get(&fixture.key).copied();
            let outcome = match (&prediction, &result) {
                (Some(prediction), Some(result)) => Some(PredictionOutcome::classify(prediction, result)),
                _ => None,
            };
            PredictionView {
                key: fixture.key.clone(),
                kickoff: fixture.kickoff,
                status: fixture.status,
                prediction,
                result,
                outcome,
                points: outcome.map_or(0, |outcome| outcome.points()),
            }
        })
        .collect()
}

#[derive(Debug)]
pub struct PredictionService {
    pool: PgPool,
    client: FootballDataClient,
    tournament: TournamentSettings,
}

impl PredictionService {
    pub fn new(pool: PgPool, client: FootballDataClient, tournament: TournamentSettings) -> Self {
        Self {
            pool,
            client,
            tournament,
        }
    }

    /// Validate and store a user's predictions, rescoring that user in the same transaction.
    ///
    /// Nothing is written unless every prediction is accepted.
    #[tracing::instrument(name = "Submit predictions", skip(self, inputs), fields(count = inputs.len()))]
    pub async fn submit(
        &self,
        user_id: Uuid,
        inputs: &[PredictionInput],
    ) -> Result<SubmissionOutcome, SubmissionError> {
        if self.tournament.predictions_closed(Utc::now()) {
            tracing::info!("Rejecting submission from {}: predictions are closed", user_id);
            return Err(SubmissionError::Closed);
        }

        let fixtures = self.client.get_all_fixtures().await?;
        let accepted = validate_submission(inputs, &fixtures).map_err(|rejections| {
            tracing::info!("Rejecting submission from {}: {} invalid predictions", user_id, rejections.len());
            SubmissionError::Rejected(rejections)
        })?;

        // Predictions and the user's rescore commit together
        let mut tx = self.pool.begin().await?;
        for (key, predicted) in &accepted {
            if let Err(e) = predictions::upsert_prediction(&mut *tx, user_id, key, predicted).await {
                tracing::error!("Failed to store prediction {} for {}: {}", key, user_id, e);
                let _ = tx.rollback().await;
                return Err(e.into());
            }
        }
        let points = match PointsService::rescore_user_in_tx(&mut tx, user_id).await {
            Ok(points) => points,
            Err(e) => {
                tracing::error!("Failed to rescore {} after submission, rolling back: {}", user_id, e);
                let _ = tx.rollback().await;
                return Err(e.into());
            }
        };
        tx.commit().await?;

        tracing::info!("Saved {} predictions for {}", accepted.len(), user_id);

        Ok(SubmissionOutcome {
            saved: accepted.len(),
            points,
        })
    }

    pub async fn my_predictions(&self, user_id: Uuid) -> Result<MyPredictionsResponse, SubmissionError> {
        let fixtures = self.client.get_all_fixtures().await?;
        let user_predictions = predictions::get_predictions_for_user(&self.pool, user_id).await?;
        let stored_results = results::get_results_map(&self.pool).await?;
        let predicted = predictions::prediction_map(&user_predictions);

        Ok(MyPredictionsResponse {
            total_points: score(&predicted, &stored_results),
            predictions_open: !self.tournament.predictions_closed(Utc::now()),
            fixtures: build_prediction_views(&fixtures, &predicted, &stored_results),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fixture::FixtureStatus;

    fn fixture(key: &str, status: FixtureStatus) -> Fixture {
        Fixture {
            key: key.parse().unwrap(),
            kickoff: None,
            status,
            score: None,
        }
    }

    fn input(matchday: i32, home: &str, away: &str, home_score: i32, away_score: i32) -> PredictionInput {
        PredictionInput {
            matchday,
            home_team: home.to_string(),
            away_team: away.to_string(),
            home_score,
            away_score,
        }
    }

    fn fixtures() -> Vec<Fixture> {
        vec![
            fixture("1_France_Romania", FixtureStatus::Finished),
            fixture("1_Albania_Switzerland", FixtureStatus::Timed),
            fixture("1_Wales_Slovakia", FixtureStatus::Scheduled),
        ]
    }

    #[test]
    fn accepts_predictions_for_open_fixtures() {
        let accepted = validate_submission(
            &[input(1, "Albania", "Switzerland", 0, 1), input(1, " Wales ", "Slovakia", 2, 1)],
            &fixtures(),
        )
        .unwrap();
        assert_eq!(accepted.len(), 2);
        assert_eq!(accepted[1].0, MatchKey::new(1, "Wales", "Slovakia"));
        assert_eq!(accepted[1].1, ScoreLine::new(2, 1));
    }

    #[test]
    fn rejects_unknown_and_finished_fixtures() {
        let rejections = validate_submission(
            &[
                input(1, "Albania", "Switzerland", 0, 1),
                input(1, "France", "Romania", 2, 1),
                input(2, "France", "Albania", 1, 0),
            ],
            &fixtures(),
        )
        .unwrap_err();
        assert_eq!(
            rejections,
            vec![
                Rejection::FixtureFinished(MatchKey::new(1, "France", "Romania")),
                Rejection::UnknownFixture(MatchKey::new(2, "France", "Albania")),
            ]
        );
    }

    #[test]
    fn rejects_negative_scores_and_duplicates() {
        let rejections = validate_submission(
            &[
                input(1, "Albania", "Switzerland", -1, 1),
                input(1, "Wales", "Slovakia", 1, 1),
                input(1, "Wales", "Slovakia", 2, 1),
            ],
            &fixtures(),
        )
        .unwrap_err();
        assert_eq!(
            rejections,
            vec![
                Rejection::NegativeScore(MatchKey::new(1, "Albania", "Switzerland")),
                Rejection::DuplicateFixture(MatchKey::new(1, "Wales", "Slovakia")),
            ]
        );
    }

    #[test]
    fn empty_submission_is_accepted() {
        assert_eq!(validate_submission(&[], &fixtures()).unwrap(), Vec::new());
    }

    #[test]
    fn views_show_outcome_and_points_once_results_are_known() {
        let predicted = HashMap::from([
            (MatchKey::new(1, "France", "Romania"), ScoreLine::new(1, 0)),
            (MatchKey::new(1, "Wales", "Slovakia"), ScoreLine::new(2, 1)),
        ]);
        let results = HashMap::from([(MatchKey::new(1, "France", "Romania"), ScoreLine::new(2, 1))]);

        let views = build_prediction_views(&fixtures(), &predicted, &results);

        assert_eq!(views.len(), 3);
        assert_eq!(views[0].outcome, Some(PredictionOutcome::CorrectHomeWin));
        assert_eq!(views[0].points, 1);
        assert_eq!(views[1].prediction, None);
        assert_eq!(views[1].outcome, None);
        assert_eq!(views[2].prediction, Some(ScoreLine::new(2, 1)));
        assert_eq!(views[2].points, 0);
    }
}
