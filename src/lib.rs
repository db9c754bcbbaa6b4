//! Posterior predictive distributions of a football team's final score.
//!
//! Historical scoring events become inter-arrival observations, which update
//! a Poisson scoring-rate posterior and a touchdown-share posterior. Those are
//! turned into a distribution over remaining points by mixing Poisson event
//! counts and expanding each count binomially into touchdowns and field goals.

pub mod error;
pub mod model;
pub mod observations;
pub mod pmf;
pub mod suite;

pub use error::{ModelError, Result};
pub use model::{Matchup, MatchupPrediction, ModelConfig, ScoreTypeRates, TeamModel};
pub use pmf::{Cdf, MetaPmf, Outcome, Pmf};
pub use suite::{BernoulliSplit, ExponentialInterArrival, GridSpec, Likelihood, Suite};
