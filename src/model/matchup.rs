use serde::Serialize;
use tracing::info;

use super::predictive::Posteriors;
use super::team::TeamModel;
use crate::error::{ModelError, Result};
use crate::observations::Game;
use crate::pmf::Pmf;

/// Averaged hypothesis values are rounded to this many steps per unit so
/// that pairings landing on the same midpoint share one key.
const MIDPOINT_RESOLUTION: f64 = 1e9;

fn midpoint_of_sum(sum: f64) -> f64 {
    (sum / 2.0 * MIDPOINT_RESOLUTION).round() / MIDPOINT_RESOLUTION
}

/// Combine an offense with the defense it faces.
///
/// Every pairing of an offensive and a defensive hypothesis contributes its
/// midpoint, weighted by the product of the two posterior probabilities.
pub fn average_posteriors(offense: &Posteriors, defense: &Posteriors) -> Posteriors {
    Posteriors {
        rate: offense.rate.add_pmf(&defense.rate).map_values(midpoint_of_sum),
        split: offense.split.add_pmf(&defense.split).map_values(midpoint_of_sum),
    }
}

/// Predicted final points for one team.
#[derive(Debug, Clone, PartialEq)]
pub struct TeamForecast {
    pub team: String,
    pub points: Pmf<u32>,
}

impl TeamForecast {
    pub fn mean(&self) -> Result<f64> {
        self.points.mean()
    }

    pub fn credible_interval(&self, percentage: f64) -> Result<(u32, u32)> {
        self.points.credible_interval(percentage)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MatchupPrediction {
    pub home: TeamForecast,
    pub away: TeamForecast,
}

impl MatchupPrediction {
    pub fn home_win_prob(&self) -> f64 {
        self.home.points.prob_greater(&self.away.points)
    }

    pub fn away_win_prob(&self) -> f64 {
        self.home.points.prob_less(&self.away.points)
    }

    pub fn tie_prob(&self) -> f64 {
        self.home.points.prob_equal(&self.away.points)
    }

    pub fn summary(&self, credible: f64) -> Result<MatchupSummary> {
        Ok(MatchupSummary {
            home: ForecastSummary::of(&self.home, credible)?,
            away: ForecastSummary::of(&self.away, credible)?,
            home_win: self.home_win_prob(),
            away_win: self.away_win_prob(),
            tie: self.tie_prob(),
        })
    }
}

/// Scalar view of a forecast for the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastSummary {
    pub team: String,
    pub mean: f64,
    pub credible: f64,
    pub low: u32,
    pub high: u32,
}

impl ForecastSummary {
    fn of(forecast: &TeamForecast, credible: f64) -> Result<Self> {
        let (low, high) = forecast.credible_interval(credible)?;
        Ok(ForecastSummary {
            team: forecast.team.clone(),
            mean: forecast.mean()?,
            credible,
            low,
            high,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchupSummary {
    pub home: ForecastSummary,
    pub away: ForecastSummary,
    pub home_win: f64,
    pub away_win: f64,
    pub tie: f64,
}

/// Two teams facing each other; each offense is judged against the other's defense.
#[derive(Debug, Clone)]
pub struct Matchup {
    home: TeamModel,
    away: TeamModel,
}

impl Matchup {
    pub fn new(home: TeamModel, away: TeamModel) -> Self {
        Matchup { home, away }
    }

    pub fn home(&self) -> &TeamModel {
        &self.home
    }

    pub fn away(&self) -> &TeamModel {
        &self.away
    }

    fn names(&self) -> Vec<String> {
        vec![self.home.name().to_string(), self.away.name().to_string()]
    }

    /// Look up a side by name.
    pub fn team(&self, name: &str) -> Result<&TeamModel> {
        if self.home.name() == name {
            Ok(&self.home)
        } else if self.away.name() == name {
            Ok(&self.away)
        } else {
            Err(ModelError::TeamMismatch {
                team: name.to_string(),
                expected: self.names(),
            })
        }
    }

    /// Feed games played between the two sides into both teams.
    ///
    /// Every game must be between exactly these two teams.
    pub fn ingest_head_to_head(&mut self, games: &[Game]) -> Result<()> {
        for game in games {
            for side in [&game.home, &game.away] {
                self.team(side)?;
            }
            if game.home == game.away {
                return Err(ModelError::TeamMismatch {
                    team: game.home.clone(),
                    expected: self.names(),
                });
            }
        }
        self.home.ingest_games(games)?;
        self.away.ingest_games(games)?;
        Ok(())
    }

    pub fn predict(
        &self,
        rem_time: f64,
        home_score: u32,
        away_score: u32,
    ) -> Result<MatchupPrediction> {
        let prediction = MatchupPrediction {
            home: TeamForecast {
                team: self.home.name().to_string(),
                points: self.home.predict_against(rem_time, home_score, &self.away)?,
            },
            away: TeamForecast {
                team: self.away.name().to_string(),
                points: self.away.predict_against(rem_time, away_score, &self.home)?,
            },
        };
        info!(
            "{} vs {} with {:.1} min left: home win {:.3}, away win {:.3}",
            prediction.home.team,
            prediction.away.team,
            rem_time,
            prediction.home_win_prob(),
            prediction.away_win_prob()
        );
        Ok(prediction)
    }
}
