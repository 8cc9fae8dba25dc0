// src/models/team.rs
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Team with the number of users allocated to it
#[derive(Debug, FromRow, Serialize, Deserialize, Clone)]
pub struct TeamWithAllocationCount {
    pub id: Uuid,
    pub name: String,
    pub crest_url: Option<String>,
    pub allocated_users: i64,
}

/// Team entry as listed by the external fixtures source
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct SourceTeam {
    pub name: String,
    pub crest_url: Option<String>,
}
