//! Sequential Bayesian updating over a fixed, finite hypothesis grid.

use serde::{Deserialize, Serialize};
use statrs::distribution::{Continuous, Exp};
use tracing::{debug, trace, warn};

use crate::error::{ModelError, Result};
use crate::pmf::{Outcome, Pmf};

/// Regulation game length; scoring rates are expressed per this many minutes.
pub const MINUTES_PER_GAME: f64 = 60.0;

/// Probability of observing `data` if hypothesis `hypo` were true.
pub trait Likelihood<H> {
    type Data;

    fn likelihood(&self, data: &Self::Data, hypo: H) -> f64;

    /// Reject data the likelihood is not defined for, before any hypothesis is touched.
    fn check_data(&self, _data: &Self::Data) -> Result<()> {
        Ok(())
    }

    /// Whether `hypo` lies in the parameter space of this likelihood.
    fn supports(&self, _hypo: H) -> bool {
        true
    }
}

/// Exponential inter-arrival density of a Poisson scoring process.
///
/// Data is the time between two scores in minutes; the hypothesis is a
/// scoring rate in events per 60 minutes. A zero rate gives zero density.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExponentialInterArrival;

impl Likelihood<f64> for ExponentialInterArrival {
    type Data = f64;

    fn likelihood(&self, minutes: &f64, rate: f64) -> f64 {
        match Exp::new(rate / MINUTES_PER_GAME) {
            Ok(exp) => exp.pdf(*minutes),
            Err(_) => 0.0,
        }
    }

    fn check_data(&self, minutes: &f64) -> Result<()> {
        if minutes.is_finite() && *minutes >= 0.0 {
            Ok(())
        } else {
            Err(ModelError::InvalidObservation(format!(
                "inter-arrival time {minutes} must be a non-negative number of minutes"
            )))
        }
    }

    fn supports(&self, rate: f64) -> bool {
        rate.is_finite() && rate >= 0.0
    }
}

/// Bernoulli mass: `p` when the event happened, `1 - p` otherwise.
#[derive(Debug, Clone, Copy, Default)]
pub struct BernoulliSplit;

impl Likelihood<f64> for BernoulliSplit {
    type Data = bool;

    fn likelihood(&self, happened: &bool, p: f64) -> f64 {
        if *happened {
            p
        } else {
            1.0 - p
        }
    }

    fn supports(&self, p: f64) -> bool {
        (0.0..=1.0).contains(&p)
    }
}

/// `points` evenly spaced values from `low` to `high` inclusive.
pub fn linspace(low: f64, high: f64, points: usize) -> Vec<f64> {
    match points {
        0 => Vec::new(),
        1 => vec![low],
        _ => {
            let step = (high - low) / (points - 1) as f64;
            let mut grid: Vec<f64> = (0..points).map(|i| low + i as f64 * step).collect();
            grid[points - 1] = high;
            grid
        }
    }
}

/// Evenly spaced hypothesis grid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridSpec {
    pub low: f64,
    pub high: f64,
    pub points: usize,
}

impl GridSpec {
    /// Scoring rates from 0 to 20 per game in steps of 0.1.
    pub fn rate_default() -> Self {
        GridSpec {
            low: 0.0,
            high: 20.0,
            points: 201,
        }
    }

    /// Touchdown share from 0 to 1 in steps of 0.005.
    pub fn split_default() -> Self {
        GridSpec {
            low: 0.0,
            high: 1.0,
            points: 201,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.points < 2 {
            return Err(ModelError::InvalidGrid(format!(
                "need at least 2 points, got {}",
                self.points
            )));
        }
        if !self.low.is_finite() || !self.high.is_finite() || self.low >= self.high {
            return Err(ModelError::InvalidGrid(format!(
                "bounds [{}, {}] are not an increasing finite range",
                self.low, self.high
            )));
        }
        Ok(())
    }

    pub fn values(&self) -> Result<Vec<f64>> {
        self.validate()?;
        Ok(linspace(self.low, self.high, self.points))
    }
}

/// A posterior over a hypothesis grid plus the likelihood that drives it.
///
/// The grid is fixed at construction. Each [`Suite::update`] multiplies every
/// hypothesis by its likelihood and renormalizes. If an update leaves no mass
/// the suite is marked degenerate and every later call fails.
#[derive(Debug, Clone)]
pub struct Suite<H: Outcome, L> {
    label: String,
    pmf: Pmf<H>,
    likelihood: L,
    observations: usize,
    log_evidence: f64,
    degenerate: bool,
}

impl<H, L> Suite<H, L>
where
    H: Outcome,
    L: Likelihood<H>,
{
    /// Uniform prior over `hypos`.
    pub fn new<I>(label: impl Into<String>, hypos: I, likelihood: L) -> Result<Self>
    where
        I: IntoIterator<Item = H>,
    {
        let label = label.into();
        let pmf = Pmf::uniform(hypos).map_err(|_| {
            ModelError::InvalidGrid(format!("suite '{label}' has no hypotheses"))
        })?;
        Self::build(label, pmf, likelihood)
    }

    /// Seed with an explicit prior; it is normalized on the way in.
    pub fn from_prior(label: impl Into<String>, mut prior: Pmf<H>, likelihood: L) -> Result<Self> {
        let label = label.into();
        if prior.is_empty() {
            return Err(ModelError::InvalidGrid(format!(
                "suite '{label}' has no hypotheses"
            )));
        }
        prior.normalize()?;
        Self::build(label, prior, likelihood)
    }

    fn build(label: String, pmf: Pmf<H>, likelihood: L) -> Result<Self> {
        if let Some(bad) = pmf.values().find(|h| !likelihood.supports(*h)) {
            return Err(ModelError::InvalidGrid(format!(
                "suite '{label}' has hypothesis {bad:?} outside the likelihood's domain"
            )));
        }
        debug!("Suite {} created with {} hypotheses", label, pmf.len());
        Ok(Suite {
            label,
            pmf,
            likelihood,
            observations: 0,
            log_evidence: 0.0,
            degenerate: false,
        })
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Number of updates applied, including the one that degenerated the suite.
    pub fn observations(&self) -> usize {
        self.observations
    }

    /// Sum of the log normalizing constants of every update so far.
    pub fn log_evidence(&self) -> f64 {
        self.log_evidence
    }

    pub fn is_degenerate(&self) -> bool {
        self.degenerate
    }

    pub fn posterior(&self) -> Result<&Pmf<H>> {
        self.ensure_usable()?;
        Ok(&self.pmf)
    }

    pub fn mean(&self) -> Result<f64> {
        self.posterior()?.mean()
    }

    /// Apply one observation and renormalize. Returns the normalizing constant.
    ///
    /// Malformed data is rejected with `InvalidObservation` and leaves the
    /// posterior as it was.
    pub fn update(&mut self, data: &L::Data) -> Result<f64> {
        self.ensure_usable()?;
        self.likelihood.check_data(data)?;
        for (hypo, mass) in self.pmf.masses_mut() {
            *mass *= self.likelihood.likelihood(data, hypo);
        }
        self.observations += 1;

        match self.pmf.normalize() {
            Ok(evidence) => {
                self.log_evidence += evidence.ln();
                trace!(
                    "Suite {} update {} (evidence {:.3e})",
                    self.label,
                    self.observations,
                    evidence
                );
                Ok(evidence)
            }
            Err(_) => {
                self.degenerate = true;
                warn!(
                    "Suite {} posterior collapsed to zero mass after {} observation(s)",
                    self.label,
                    self.observations
                );
                Err(self.degenerate_error())
            }
        }
    }

    /// Apply observations one at a time, in order, stopping at the first failure.
    pub fn update_set<'a, I>(&mut self, dataset: I) -> Result<()>
    where
        I: IntoIterator<Item = &'a L::Data>,
        L::Data: 'a,
    {
        for data in dataset {
            self.update(data)?;
        }
        Ok(())
    }

    fn ensure_usable(&self) -> Result<()> {
        if self.degenerate {
            Err(self.degenerate_error())
        } else {
            Ok(())
        }
    }

    fn degenerate_error(&self) -> ModelError {
        ModelError::DegenerateSuite {
            label: self.label.clone(),
            observations: self.observations,
        }
    }
}
