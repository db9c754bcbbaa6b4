pub mod json;
pub mod models;
pub mod provider;

pub use json::{JsonGameSource, LeagueFile, TeamRecord};
pub use models::{Game, Observation, ScoreKind, ScoringEvent};
pub use provider::GameSource;

use tracing::debug;

use crate::error::{ModelError, Result};
use crate::suite::MINUTES_PER_GAME;

/// A team's observations split by which side of the ball produced them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObservationStreams {
    /// Scores by the team itself
    pub offense: Vec<Observation>,
    /// Scores conceded to opponents
    pub defense: Vec<Observation>,
}

/// Running clock for one side. Each game adds a full 60 minutes, so a
/// scoreless stretch at the end of one game carries into the first interval
/// of the next.
#[derive(Debug, Default)]
struct SideClock {
    minutes: f64,
}

impl SideClock {
    fn kickoff(&mut self) {
        self.minutes += MINUTES_PER_GAME;
    }

    fn observe(&mut self, event: &ScoringEvent) -> Result<Observation> {
        let inter_arrival = self.minutes - event.time_remaining;
        if inter_arrival < 0.0 {
            return Err(ModelError::InvalidObservation(format!(
                "{} score at {:.2} min remaining precedes the previous score (events out of order)",
                event.team, event.time_remaining
            )));
        }
        self.minutes = event.time_remaining;
        Ok(Observation {
            inter_arrival,
            is_touchdown: event.kind == ScoreKind::Touchdown,
        })
    }
}

/// Turn `team`'s box scores into inter-arrival observations.
///
/// Every game must involve `team`, and every event must belong to one of the
/// two teams in its game. Offense and defense keep separate clocks.
pub fn derive_observations(team: &str, games: &[Game]) -> Result<ObservationStreams> {
    let mut streams = ObservationStreams::default();
    let mut offense = SideClock::default();
    let mut defense = SideClock::default();

    for game in games {
        if !game.involves(team) {
            return Err(ModelError::TeamMismatch {
                team: team.to_string(),
                expected: vec![game.home.clone(), game.away.clone()],
            });
        }
        offense.kickoff();
        defense.kickoff();

        for event in &game.events {
            if !event.time_remaining.is_finite()
                || !(0.0..=MINUTES_PER_GAME).contains(&event.time_remaining)
            {
                return Err(ModelError::InvalidObservation(format!(
                    "time remaining {} is outside a {}-minute game",
                    event.time_remaining, MINUTES_PER_GAME
                )));
            }
            if event.team == team {
                streams.offense.push(offense.observe(event)?);
            } else if game.opponent_of(team) == Some(event.team.as_str()) {
                streams.defense.push(defense.observe(event)?);
            } else {
                return Err(ModelError::TeamMismatch {
                    team: event.team.clone(),
                    expected: vec![game.home.clone(), game.away.clone()],
                });
            }
        }
    }

    debug!(
        "{}: derived {} offense and {} defense observations from {} game(s)",
        team,
        streams.offense.len(),
        streams.defense.len(),
        games.len()
    );
    Ok(streams)
}
