use serde::{Deserialize, Serialize};

/// Kind of scoring play. Extra points and safeties are folded into these two.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScoreKind {
    #[serde(rename = "TD")]
    Touchdown,
    #[serde(rename = "FG")]
    FieldGoal,
}

impl ScoreKind {
    /// Points credited for the play (touchdowns include the extra point).
    pub fn points(self) -> u32 {
        match self {
            ScoreKind::Touchdown => 7,
            ScoreKind::FieldGoal => 3,
        }
    }
}

/// A single score as reported by a box score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringEvent {
    /// Minutes left in regulation when the score happened (60.0 = kickoff)
    pub time_remaining: f64,
    pub kind: ScoreKind,
    /// Team that scored
    pub team: String,
}

/// One game's scoring events, ordered by descending `time_remaining`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Game {
    pub home: String,
    pub away: String,
    #[serde(default)]
    pub events: Vec<ScoringEvent>,
}

impl Game {
    pub fn involves(&self, team: &str) -> bool {
        self.home == team || self.away == team
    }

    /// The other side of the game, if `team` played in it.
    pub fn opponent_of(&self, team: &str) -> Option<&str> {
        if self.home == team {
            Some(&self.away)
        } else if self.away == team {
            Some(&self.home)
        } else {
            None
        }
    }
}

/// What a suite actually consumes: time since the previous score and its kind.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Observation {
    /// Minutes since the previous score by the same side
    pub inter_arrival: f64,
    pub is_touchdown: bool,
}
