use thiserror::Error;

/// Errors raised by the inference core.
///
/// Every variant is reported at the point of detection. None of them are
/// retryable: the same input reproduces the same failure.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ModelError {
    /// A distribution was normalized while its total mass was zero (or not finite).
    #[error("distribution has zero total mass and cannot be normalized")]
    ZeroMass,

    /// A suite's posterior collapsed: every hypothesis is inconsistent with the data.
    #[error("suite '{label}' degenerated after {observations} observation(s): no hypothesis explains the data")]
    DegenerateSuite { label: String, observations: usize },

    /// The requested point total is not a non-negative combination of 3s and 7s.
    #[error("{0} points cannot be composed of touchdowns (7) and field goals (3)")]
    InvalidDecomposition(u32),

    /// A scoring event names a team that is not part of the matchup being updated.
    #[error("team '{team}' is not one of {expected:?}")]
    TeamMismatch { team: String, expected: Vec<String> },

    #[error("invalid observation: {0}")]
    InvalidObservation(String),

    #[error("invalid hypothesis grid: {0}")]
    InvalidGrid(String),

    /// A summary statistic was requested from a distribution with no support.
    #[error("distribution is empty")]
    EmptyDistribution,
}

pub type Result<T> = std::result::Result<T, ModelError>;
