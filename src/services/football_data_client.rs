use std::collections::HashMap;
use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use crate::config::football_data::FootballDataSettings;
use crate::models::fixture::{Fixture, FixtureStatus, MatchKey, ScoreLine};
use crate::models::team::SourceTeam;
use crate::services::source_error::SourceError;

const SERVICE_NAME: &str = "football-data";

#[derive(Debug, Deserialize)]
struct TeamsPayload {
    teams: Vec<TeamPayload>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TeamPayload {
    name: String,
    #[serde(default)]
    crest_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FixturesPayload {
    fixtures: Vec<FixturePayload>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FixturePayload {
    #[serde(default)]
    date: Option<DateTime<Utc>>,
    status: FixtureStatus,
    matchday: i32,
    home_team_name: String,
    away_team_name: String,
    #[serde(default)]
    result: Option<GoalsPayload>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GoalsPayload {
    goals_home_team: Option<i32>,
    goals_away_team: Option<i32>,
}

pub fn parse_teams(body: &str) -> Result<Vec<SourceTeam>, SourceError> {
    let payload: TeamsPayload = serde_json::from_str(body)?;
    Ok(payload
        .teams
        .into_iter()
        .map(|team| SourceTeam {
            name: team.name,
            crest_url: team.crest_url.filter(|url| !url.is_empty()),
        })
        .collect())
}

/// Fixtures whose pairing is not decided yet (empty team names) are left out.
pub fn parse_fixtures(body: &str) -> Result<Vec<Fixture>, SourceError> {
    let payload: FixturesPayload = serde_json::from_str(body)?;
    Ok(payload
        .fixtures
        .into_iter()
        .filter(|fixture| !fixture.home_team_name.is_empty() && !fixture.away_team_name.is_empty())
        .map(|fixture| {
            let score = fixture.result.and_then(|goals| {
                match (goals.goals_home_team, goals.goals_away_team) {
                    (Some(home), Some(away)) => Some(ScoreLine::new(home, away)),
                    _ => None,
                }
            });
            Fixture {
                key: MatchKey::new(fixture.matchday, fixture.home_team_name, fixture.away_team_name),
                kickoff: fixture.date,
                status: fixture.status,
                score,
            }
        })
        .collect())
}

/// Final scores of every finished fixture, keyed by fixture.
pub fn results_from_fixtures(fixtures: &[Fixture]) -> HashMap<MatchKey, ScoreLine> {
    fixtures
        .iter()
        .filter_map(|fixture| fixture.final_score().map(|score| (fixture.key.clone(), score)))
        .collect()
}

/// Client for the football-data.org season endpoints.
#[derive(Debug, Clone)]
pub struct FootballDataClient {
    base_url: String,
    api_key: SecretString,
    season_id: u32,
    client: Client,
}

impl FootballDataClient {
    pub fn new(settings: &FootballDataSettings) -> Result<Self, SourceError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()?;
        Ok(Self {
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            api_key: settings.api_key.clone(),
            season_id: settings.season_id,
            client,
        })
    }

    async fn get_season_resource(&self, resource: &str) -> Result<String, SourceError> {
        let url = format!("{}/soccerseasons/{}/{}", self.base_url, self.season_id, resource);

        tracing::debug!("Calling football data source at {}", url);

        let response = self
            .client
            .get(&url)
            .header("X-Auth-Token", self.api_key.expose_secret())
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_else(|_| "Unknown error".to_string());
            tracing::error!("Football data source returned error {}: {}", status, body);
            return Err(SourceError::Status { service: SERVICE_NAME, status, body });
        }

        Ok(response.text().await?)
    }

    #[tracing::instrument(name = "Fetch all teams", skip(self))]
    pub async fn get_all_teams(&self) -> Result<Vec<SourceTeam>, SourceError> {
        let body = self.get_season_resource("teams").await?;
        parse_teams(&body)
    }

    #[tracing::instrument(name = "Fetch all fixtures", skip(self))]
    pub async fn get_all_fixtures(&self) -> Result<Vec<Fixture>, SourceError> {
        let body = self.get_season_resource("fixtures").await?;
        parse_fixtures(&body)
    }

    pub async fn get_results(&self) -> Result<HashMap<MatchKey, ScoreLine>, SourceError> {
        let fixtures = self.get_all_fixtures().await?;
        Ok(results_from_fixtures(&fixtures))
    }
}
