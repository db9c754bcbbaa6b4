pub mod decomposition;
pub mod matchup;
pub mod predictive;
pub mod rates;
pub mod team;

pub use decomposition::{decompose_score, decompositions, ScoreDecomposition};
pub use matchup::{average_posteriors, Matchup, MatchupPrediction, TeamForecast};
pub use predictive::{
    predict_event_count, predict_points, truncated_poisson, Posteriors, DEFAULT_MAX_EVENTS,
};
pub use rates::ScoreTypeRates;
pub use team::{SideModel, TeamModel};

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};
use crate::suite::GridSpec;

/// Hypothesis grids and truncation shared by every team in a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Scoring rates, events per 60 minutes
    pub rate_grid: GridSpec,
    /// Probability that a score is a touchdown
    pub split_grid: GridSpec,
    /// Largest event count kept in a Poisson predictive
    pub max_events: u32,
}

impl Default for ModelConfig {
    fn default() -> Self {
        ModelConfig {
            rate_grid: GridSpec::rate_default(),
            split_grid: GridSpec::split_default(),
            max_events: DEFAULT_MAX_EVENTS,
        }
    }
}

impl ModelConfig {
    pub fn validate(&self) -> Result<()> {
        self.rate_grid.validate()?;
        self.split_grid.validate()?;
        if self.rate_grid.low < 0.0 {
            return Err(ModelError::InvalidGrid(format!(
                "scoring rates must be non-negative, grid starts at {}",
                self.rate_grid.low
            )));
        }
        if self.split_grid.low < 0.0 || self.split_grid.high > 1.0 {
            return Err(ModelError::InvalidGrid(format!(
                "touchdown probabilities must lie in [0, 1], grid is [{}, {}]",
                self.split_grid.low, self.split_grid.high
            )));
        }
        if self.max_events == 0 {
            return Err(ModelError::InvalidGrid("max_events must be at least 1".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(ModelConfig::default().validate().is_ok());
    }

    #[test]
    fn test_split_grid_outside_unit_interval() {
        let config = ModelConfig {
            split_grid: GridSpec {
                low: 0.0,
                high: 1.5,
                points: 11,
            },
            ..ModelConfig::default()
        };
        assert!(matches!(config.validate(), Err(ModelError::InvalidGrid(_))));
    }

    #[test]
    fn test_negative_rates_rejected() {
        let config = ModelConfig {
            rate_grid: GridSpec {
                low: -1.0,
                high: 5.0,
                points: 7,
            },
            ..ModelConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_max_events_rejected() {
        let config = ModelConfig {
            max_events: 0,
            ..ModelConfig::default()
        };
        assert!(matches!(config.validate(), Err(ModelError::InvalidGrid(_))));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: ModelConfig = serde_json::from_str(r#"{ "max_events": 12 }"#).unwrap();
        assert_eq!(config.max_events, 12);
        assert_eq!(config.rate_grid, GridSpec::rate_default());
    }
}
