use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::models::Game;
use super::provider::GameSource;
use crate::model::ModelConfig;

/// Per-team box scores as exported by the scraper.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TeamRecord {
    /// Trailing games in `games` that are preseason and must not be counted
    #[serde(default)]
    pub preseason_games: usize,
    #[serde(default)]
    pub games: Vec<Game>,
}

/// League file: team registry plus optional model settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LeagueFile {
    #[serde(default)]
    pub model: ModelConfig,
    pub teams: BTreeMap<String, TeamRecord>,
}

/// Game source backed by a league JSON file.
#[derive(Debug)]
pub struct JsonGameSource {
    name: String,
    league: LeagueFile,
}

impl JsonGameSource {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read league file {}", path.display()))?;
        let league = Self::parse(&raw)
            .with_context(|| format!("Failed to parse league file {}", path.display()))?;
        debug!("Loaded {} team(s) from {}", league.teams.len(), path.display());
        Ok(JsonGameSource {
            name: path.display().to_string(),
            league,
        })
    }

    pub fn from_league(name: impl Into<String>, league: LeagueFile) -> Self {
        JsonGameSource {
            name: name.into(),
            league,
        }
    }

    fn parse(raw: &str) -> Result<LeagueFile> {
        let league: LeagueFile = serde_json::from_str(raw)?;
        Ok(league)
    }

    pub fn model_config(&self) -> &ModelConfig {
        &self.league.model
    }

    pub fn teams(&self) -> impl Iterator<Item = &str> + '_ {
        self.league.teams.keys().map(String::as_str)
    }
}

impl GameSource for JsonGameSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn fetch_games(&self, team: &str) -> Result<Vec<Game>> {
        let record = self
            .league
            .teams
            .get(team)
            .with_context(|| format!("Team '{}' not found in {}", team, self.name))?;

        let counted = record.games.len().saturating_sub(record.preseason_games);
        Ok(record.games[..counted].to_vec())
    }
}
