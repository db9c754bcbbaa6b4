//! Separate touchdown-rate and field-goal-rate posteriors.
//!
//! Instead of one scoring rate plus a touchdown share, each score type gets
//! its own Poisson rate. Priors can be seeded from league-wide per-game
//! averages, each team's average entering as one pseudo-observation of
//! `60 / rate` minutes between scores.

use tracing::debug;

use super::predictive::predict_event_count;
use super::ModelConfig;
use crate::error::{ModelError, Result};
use crate::observations::ScoreKind;
use crate::pmf::Pmf;
use crate::suite::{ExponentialInterArrival, Suite, MINUTES_PER_GAME};

/// Field goals per game for each team, 2014 regular season.
pub const LEAGUE_FG_PER_GAME_2014: [f64; 32] = [
    2.8, 2.6, 2.6, 2.2, 2.2, 2.2, 1.7, 2.0, 2.0, 2.0, 2.0, 2.0, 1.3, 1.8, 1.8, 1.8, 1.6, 1.5, 1.5,
    1.4, 1.4, 1.3, 1.2, 1.2, 1.2, 1.2, 1.0, 1.0, 1.0, 0.8, 0.8, 0.8,
];

/// Touchdowns per game for each team, 2014 regular season.
pub const LEAGUE_TD_PER_GAME_2014: [f64; 32] = [
    3.5, 3.4, 3.4, 3.3, 3.2, 3.2, 3.2, 2.8, 2.8, 2.8, 2.8, 2.8, 2.6, 2.5, 2.4, 2.3, 2.2, 2.2, 2.0,
    2.0, 2.0, 2.0, 2.0, 2.0, 2.0, 1.8, 1.8, 1.8, 1.6, 1.5, 1.4, 1.4,
];

type RateSuite = Suite<f64, ExponentialInterArrival>;

#[derive(Debug, Clone)]
pub struct ScoreTypeRates {
    touchdowns: RateSuite,
    field_goals: RateSuite,
    max_events: u32,
}

impl ScoreTypeRates {
    pub fn new(label: &str, config: &ModelConfig) -> Result<Self> {
        config.validate()?;
        let grid = config.rate_grid.values()?;
        Ok(ScoreTypeRates {
            touchdowns: Suite::new(format!("{label}/td_rate"), grid.clone(), ExponentialInterArrival)?,
            field_goals: Suite::new(format!("{label}/fg_rate"), grid, ExponentialInterArrival)?,
            max_events: config.max_events,
        })
    }

    /// Seed both rates with one pseudo-observation per league team.
    pub fn seed_with_league(&mut self, td_per_game: &[f64], fg_per_game: &[f64]) -> Result<()> {
        let td_intervals = pseudo_intervals(td_per_game)?;
        let fg_intervals = pseudo_intervals(fg_per_game)?;
        self.touchdowns.update_set(&td_intervals)?;
        self.field_goals.update_set(&fg_intervals)?;
        debug!(
            "Seeded score-type rates from league averages: TD {:.2}/game, FG {:.2}/game",
            self.touchdowns.mean()?,
            self.field_goals.mean()?
        );
        Ok(())
    }

    /// Record `minutes` elapsed since the previous score of the same kind.
    pub fn update(&mut self, kind: ScoreKind, minutes: f64) -> Result<f64> {
        match kind {
            ScoreKind::Touchdown => self.touchdowns.update(&minutes),
            ScoreKind::FieldGoal => self.field_goals.update(&minutes),
        }
    }

    pub fn rate_suite(&self, kind: ScoreKind) -> &RateSuite {
        match kind {
            ScoreKind::Touchdown => &self.touchdowns,
            ScoreKind::FieldGoal => &self.field_goals,
        }
    }

    /// Predicted counts of each score type for the rest of the game.
    pub fn predict_counts(&self, rem_time: f64) -> Result<(Pmf<u32>, Pmf<u32>)> {
        let tds = predict_event_count(self.touchdowns.posterior()?, rem_time, 0, self.max_events)?;
        let fgs = predict_event_count(self.field_goals.posterior()?, rem_time, 0, self.max_events)?;
        Ok((tds, fgs))
    }

    /// Final points as `7 * touchdowns + 3 * field_goals`, shifted by points already scored.
    pub fn predict_remaining(&self, rem_time: f64, points_scored: u32) -> Result<Pmf<u32>> {
        let (tds, fgs) = self.predict_counts(rem_time)?;
        let td_points = tds.map_values(|n| n * ScoreKind::Touchdown.points());
        let fg_points = fgs.map_values(|n| n * ScoreKind::FieldGoal.points());
        Ok(td_points.add_pmf(&fg_points).shifted(points_scored))
    }
}

fn pseudo_intervals(per_game: &[f64]) -> Result<Vec<f64>> {
    per_game
        .iter()
        .map(|&rate| {
            if rate.is_finite() && rate > 0.0 {
                Ok(MINUTES_PER_GAME / rate)
            } else {
                Err(ModelError::InvalidObservation(format!(
                    "league per-game rate {rate} must be positive"
                )))
            }
        })
        .collect()
}
