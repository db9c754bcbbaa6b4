//! Posterior predictive distributions for the rest of a game.
//!
//! Rate uncertainty becomes event-count uncertainty through a mixture of
//! Poisson distributions, one per rate hypothesis. Event counts become points
//! by enumerating how many of the `n` scores were touchdowns, once per
//! touchdown-share hypothesis, and mixing again.

use statrs::distribution::{Discrete, Poisson};
use statrs::function::factorial::binomial;
use tracing::debug;

use crate::error::{ModelError, Result};
use crate::observations::ScoreKind;
use crate::pmf::{MetaPmf, Pmf};
use crate::suite::MINUTES_PER_GAME;

/// Event counts above this are dropped from each Poisson component.
pub const DEFAULT_MAX_EVENTS: u32 = 20;

/// Poisson pmf over `0..=max_events` with the given mean.
///
/// Mass above `max_events` is dropped, not redistributed, so the result sums
/// to slightly less than 1 for large means. A zero mean puts all mass at 0.
pub fn truncated_poisson(mean: f64, max_events: u32) -> Result<Pmf<u32>> {
    if !mean.is_finite() || mean < 0.0 {
        return Err(ModelError::InvalidObservation(format!(
            "Poisson mean {mean} is not a non-negative number"
        )));
    }
    if mean == 0.0 {
        return Ok(Pmf::from_items([(0, 1.0)]));
    }
    let poisson = Poisson::new(mean).map_err(|e| {
        ModelError::InvalidObservation(format!("Poisson mean {mean}: {e}"))
    })?;
    Ok((0..=max_events)
        .map(|k| (k, poisson.pmf(u64::from(k))))
        .collect())
}

/// Predictive distribution of the number of scores in the next `rem_time`
/// minutes, shifted by `already` scores.
pub fn predict_event_count(
    rate_posterior: &Pmf<f64>,
    rem_time: f64,
    already: u32,
    max_events: u32,
) -> Result<Pmf<u32>> {
    if !rem_time.is_finite() || rem_time < 0.0 {
        return Err(ModelError::InvalidObservation(format!(
            "remaining time {rem_time} must be a non-negative number of minutes"
        )));
    }
    let mut meta = MetaPmf::with_capacity(rate_posterior.len());
    for (rate, prob) in rate_posterior.items() {
        let expected = rate * rem_time / MINUTES_PER_GAME;
        meta.push(truncated_poisson(expected, max_events)?, prob);
    }
    Ok(meta.make_mixture()?.shifted(already))
}

/// Points distribution for a fixed touchdown share `q`, unnormalized.
///
/// Each `n`-event outcome spreads its mass over `k` touchdowns and `n - k`
/// field goals with binomial weights. Zero-mass branches are skipped.
pub fn points_given_split(events: &Pmf<u32>, q: f64) -> Pmf<u32> {
    let td = ScoreKind::Touchdown.points();
    let fg = ScoreKind::FieldGoal.points();
    let mut points = Pmf::new();
    for (n, p_n) in events.items() {
        for num_td in 0..=n {
            let num_fg = n - num_td;
            let ways = binomial(u64::from(n), u64::from(num_td));
            let mass = p_n * ways * q.powi(num_td as i32) * (1.0 - q).powi(num_fg as i32);
            if mass > 0.0 {
                points.incr(td * num_td + fg * num_fg, mass);
            }
        }
    }
    points
}

/// Collapse the touchdown-share posterior into a points predictive,
/// shifted by points already scored.
pub fn predict_points(
    events: &Pmf<u32>,
    split_posterior: &Pmf<f64>,
    already_points: u32,
) -> Result<Pmf<u32>> {
    let meta: MetaPmf<u32> = split_posterior
        .items()
        .map(|(q, w)| (points_given_split(events, q), w))
        .collect();
    Ok(meta.make_mixture()?.shifted(already_points))
}

/// The two posteriors a points prediction needs.
#[derive(Debug, Clone, PartialEq)]
pub struct Posteriors {
    /// Scoring rate, events per 60 minutes
    pub rate: Pmf<f64>,
    /// Probability that a score is a touchdown
    pub split: Pmf<f64>,
}

impl Posteriors {
    /// Predictive distribution of the final point total after `rem_time` more
    /// minutes, given `points_scored` so far.
    pub fn predict_remaining(
        &self,
        rem_time: f64,
        points_scored: u32,
        max_events: u32,
    ) -> Result<Pmf<u32>> {
        let events = predict_event_count(&self.rate, rem_time, 0, max_events)?;
        let points = predict_points(&events, &self.split, points_scored)?;
        debug!(
            "Points predictive for {:.1} min left from {}: {} possible totals",
            rem_time,
            points_scored,
            points.len()
        );
        Ok(points)
    }
}
