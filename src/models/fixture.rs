// src/models/fixture.rs
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifies a fixture: the same pairing can meet again on a later matchday.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MatchKey {
    pub matchday: i32,
    pub home_team: String,
    pub away_team: String,
}

impl MatchKey {
    pub fn new(matchday: i32, home_team: impl Into<String>, away_team: impl Into<String>) -> Self {
        Self {
            matchday,
            home_team: home_team.into(),
            away_team: away_team.into(),
        }
    }
}

impl fmt::Display for MatchKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}_{}", self.matchday, self.home_team, self.away_team)
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("Invalid match key `{0}`, expected `{{matchday}}_{{home_team}}_{{away_team}}`")]
pub struct MatchKeyParseError(String);

impl FromStr for MatchKey {
    type Err = MatchKeyParseError;

    /// Splits on the first two underscores, so the away team may contain `_`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.splitn(3, '_');
        let (Some(matchday), Some(home_team), Some(away_team)) = (parts.next(), parts.next(), parts.next()) else {
            return Err(MatchKeyParseError(s.to_string()));
        };
        let matchday = matchday
            .parse::<i32>()
            .map_err(|_| MatchKeyParseError(s.to_string()))?;
        if home_team.is_empty() || away_team.is_empty() {
            return Err(MatchKeyParseError(s.to_string()));
        }
        Ok(Self::new(matchday, home_team, away_team))
    }
}

/// A final or predicted score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreLine {
    pub home_score: i32,
    pub away_score: i32,
}

impl ScoreLine {
    pub fn new(home_score: i32, away_score: i32) -> Self {
        Self { home_score, away_score }
    }

    pub fn is_valid(&self) -> bool {
        self.home_score >= 0 && self.away_score >= 0
    }

    pub fn is_draw(&self) -> bool {
        self.home_score == self.away_score
    }

    pub fn is_home_win(&self) -> bool {
        self.home_score > self.away_score
    }

    pub fn is_away_win(&self) -> bool {
        self.home_score < self.away_score
    }
}

impl fmt::Display for ScoreLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.home_score, self.away_score)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FixtureStatus {
    Scheduled,
    Timed,
    InPlay,
    Paused,
    Finished,
    Postponed,
    Canceled,
    #[serde(other)]
    Unknown,
}

/// A fixture as reported by the external source. Never persisted.
#[derive(Debug, Clone, Serialize)]
pub struct Fixture {
    #[serde(flatten)]
    pub key: MatchKey,
    pub kickoff: Option<DateTime<Utc>>,
    pub status: FixtureStatus,
    pub score: Option<ScoreLine>,
}

impl Fixture {
    pub fn is_finished(&self) -> bool {
        self.status == FixtureStatus::Finished
    }

    /// The authoritative result, available once the match is finished with both goals reported.
    pub fn final_score(&self) -> Option<ScoreLine> {
        if self.is_finished() {
            self.score
        } else {
            None
        }
    }
}
