use tracing::{debug, info};

use super::matchup::average_posteriors;
use super::predictive::Posteriors;
use super::ModelConfig;
use crate::error::Result;
use crate::observations::{derive_observations, Game, Observation};
use crate::pmf::Pmf;
use crate::suite::{BernoulliSplit, ExponentialInterArrival, Suite};

/// Posteriors for one side of the ball: how often scores happen and how
/// often a score is a touchdown. For defense these describe scores allowed.
#[derive(Debug, Clone)]
pub struct SideModel {
    rate: Suite<f64, ExponentialInterArrival>,
    split: Suite<f64, BernoulliSplit>,
}

impl SideModel {
    pub fn new(label: &str, config: &ModelConfig) -> Result<Self> {
        config.validate()?;
        Ok(SideModel {
            rate: Suite::new(
                format!("{label}/rate"),
                config.rate_grid.values()?,
                ExponentialInterArrival,
            )?,
            split: Suite::new(
                format!("{label}/td_share"),
                config.split_grid.values()?,
                BernoulliSplit,
            )?,
        })
    }

    pub fn update(&mut self, observation: &Observation) -> Result<()> {
        self.rate.update(&observation.inter_arrival)?;
        self.split.update(&observation.is_touchdown)?;
        Ok(())
    }

    pub fn rate_suite(&self) -> &Suite<f64, ExponentialInterArrival> {
        &self.rate
    }

    pub fn split_suite(&self) -> &Suite<f64, BernoulliSplit> {
        &self.split
    }

    pub fn posteriors(&self) -> Result<Posteriors> {
        Ok(Posteriors {
            rate: self.rate.posterior()?.clone(),
            split: self.split.posterior()?.clone(),
        })
    }
}

/// A team's offense and defense, each updated from its own observation stream.
#[derive(Debug, Clone)]
pub struct TeamModel {
    name: String,
    offense: SideModel,
    defense: SideModel,
    max_events: u32,
}

impl TeamModel {
    pub fn new(name: impl Into<String>, config: &ModelConfig) -> Result<Self> {
        let name = name.into();
        Ok(TeamModel {
            offense: SideModel::new(&format!("{name}/offense"), config)?,
            defense: SideModel::new(&format!("{name}/defense"), config)?,
            max_events: config.max_events,
            name,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn offense(&self) -> &SideModel {
        &self.offense
    }

    pub fn defense(&self) -> &SideModel {
        &self.defense
    }

    pub fn update_offense(&mut self, observation: &Observation) -> Result<()> {
        self.offense.update(observation)
    }

    pub fn update_defense(&mut self, observation: &Observation) -> Result<()> {
        self.defense.update(observation)
    }

    /// Update both sides from this team's box scores.
    ///
    /// All games are validated before the first update is applied.
    pub fn ingest_games(&mut self, games: &[Game]) -> Result<()> {
        let streams = derive_observations(&self.name, games)?;
        for obs in &streams.offense {
            self.update_offense(obs)?;
        }
        for obs in &streams.defense {
            self.update_defense(obs)?;
        }
        info!(
            "{}: {} game(s), {} scores, {} allowed, offense rate {:.2}/game, TD share {:.2}",
            self.name,
            games.len(),
            streams.offense.len(),
            streams.defense.len(),
            self.offense.rate.mean()?,
            self.offense.split.mean()?
        );
        Ok(())
    }

    /// Final points using this team's offense alone.
    pub fn predict_remaining(&self, rem_time: f64, points_scored: u32) -> Result<Pmf<u32>> {
        self.offense
            .posteriors()?
            .predict_remaining(rem_time, points_scored, self.max_events)
    }

    /// Final points with this offense averaged against `opponent`'s defense.
    pub fn predict_against(
        &self,
        rem_time: f64,
        points_scored: u32,
        opponent: &TeamModel,
    ) -> Result<Pmf<u32>> {
        debug!("Adjusting {} offense for {} defense", self.name, opponent.name);
        let adjusted = average_posteriors(&self.offense.posteriors()?, &opponent.defense.posteriors()?);
        adjusted.predict_remaining(rem_time, points_scored, self.max_events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ModelError;
    use crate::observations::{ScoreKind, ScoringEvent};
    use crate::suite::GridSpec;
    use approx::assert_relative_eq;

    fn small_config() -> ModelConfig {
        ModelConfig {
            rate_grid: GridSpec {
                low: 0.0,
                high: 12.0,
                points: 49,
            },
            split_grid: GridSpec {
                low: 0.0,
                high: 1.0,
                points: 21,
            },
            max_events: 15,
        }
    }

    fn scoring_game(team: &str, opponent: &str, td_times: &[f64]) -> Game {
        Game {
            home: team.into(),
            away: opponent.into(),
            events: td_times
                .iter()
                .map(|t| ScoringEvent {
                    time_remaining: *t,
                    kind: ScoreKind::Touchdown,
                    team: team.into(),
                })
                .collect(),
        }
    }

    #[test]
    fn test_side_update_moves_both_posteriors() {
        let mut side = SideModel::new("Eagles/offense", &small_config()).unwrap();
        let prior_rate = side.rate_suite().mean().unwrap();
        for _ in 0..8 {
            side.update(&Observation {
                inter_arrival: 6.0,
                is_touchdown: true,
            })
            .unwrap();
        }
        assert!(side.rate_suite().mean().unwrap() > prior_rate);
        assert!(side.split_suite().mean().unwrap() > 0.85);
        assert_eq!(side.rate_suite().observations(), 8);
    }

    #[test]
    fn test_ingest_routes_offense_and_defense() {
        let mut team = TeamModel::new("Eagles", &small_config()).unwrap();
        let game = Game {
            home: "Eagles".into(),
            away: "Giants".into(),
            events: vec![
                ScoringEvent {
                    time_remaining: 50.0,
                    kind: ScoreKind::Touchdown,
                    team: "Eagles".into(),
                },
                ScoringEvent {
                    time_remaining: 20.0,
                    kind: ScoreKind::FieldGoal,
                    team: "Giants".into(),
                },
            ],
        };
        team.ingest_games(&[game]).unwrap();
        assert_eq!(team.offense().rate_suite().observations(), 1);
        assert_eq!(team.defense().split_suite().observations(), 1);
        assert!(team.defense().split_suite().mean().unwrap() < 0.5);
    }

    #[test]
    fn test_ingest_validates_before_updating() {
        let mut team = TeamModel::new("Eagles", &small_config()).unwrap();
        let good = scoring_game("Eagles", "Giants", &[40.0]);
        let bad = scoring_game("Cowboys", "Giants", &[30.0]);
        let err = team.ingest_games(&[good, bad]).unwrap_err();
        assert!(matches!(err, ModelError::TeamMismatch { .. }));
        assert_eq!(team.offense().rate_suite().observations(), 0);
    }

    #[test]
    fn test_better_offense_predicts_more_points() {
        let config = small_config();
        let mut fast = TeamModel::new("Fast", &config).unwrap();
        let mut slow = TeamModel::new("Slow", &config).unwrap();
        let fast_games: Vec<Game> = (0..4)
            .map(|_| scoring_game("Fast", "X", &[52.0, 41.0, 30.0, 18.0, 6.0]))
            .collect();
        let slow_games: Vec<Game> = (0..4).map(|_| scoring_game("Slow", "X", &[25.0])).collect();
        fast.ingest_games(&fast_games).unwrap();
        slow.ingest_games(&slow_games).unwrap();

        let fast_pts = fast.predict_remaining(60.0, 0).unwrap();
        let slow_pts = slow.predict_remaining(60.0, 0).unwrap();
        assert!(fast_pts.mean().unwrap() > slow_pts.mean().unwrap());
        assert!(fast_pts.prob_greater(&slow_pts) > 0.5);
        assert_relative_eq!(fast_pts.total(), 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_bad_interval_does_not_poison_offense() {
        let mut team = TeamModel::new("Eagles", &small_config()).unwrap();
        let err = team
            .update_offense(&Observation {
                inter_arrival: f64::NAN,
                is_touchdown: true,
            })
            .unwrap_err();
        assert!(matches!(err, ModelError::InvalidObservation(_)));
        assert_eq!(team.offense().rate_suite().observations(), 0);
        assert_eq!(team.offense().split_suite().observations(), 0);
        assert!(team.predict_remaining(60.0, 0).is_ok());
        team.update_offense(&Observation {
            inter_arrival: 9.0,
            is_touchdown: true,
        })
        .unwrap();
        assert_eq!(team.offense().rate_suite().observations(), 1);
    }

    #[test]
    fn test_no_time_left_returns_current_score() {
        let team = TeamModel::new("Eagles", &small_config()).unwrap();
        let pts = team.predict_remaining(0.0, 24).unwrap();
        assert_relative_eq!(pts.prob(24), 1.0, epsilon = 1e-12);
    }
}
