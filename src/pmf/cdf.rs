use super::{Outcome, Pmf};
use crate::error::{ModelError, Result};

/// Cumulative distribution built from a [`Pmf`].
///
/// `cumulative[i]` is P(X <= values[i]); the last entry is pinned to exactly 1.
#[derive(Debug, Clone)]
pub struct Cdf<V: Outcome> {
    values: Vec<V>,
    cumulative: Vec<f64>,
}

impl<V: Outcome> Cdf<V> {
    pub fn from_pmf(pmf: &Pmf<V>) -> Result<Self> {
        if pmf.is_empty() {
            return Err(ModelError::EmptyDistribution);
        }
        let total = pmf.total();
        if !(total > 0.0) || !total.is_finite() {
            return Err(ModelError::ZeroMass);
        }

        let mut values = Vec::with_capacity(pmf.len());
        let mut cumulative = Vec::with_capacity(pmf.len());
        let mut running = 0.0;
        for (v, p) in pmf.items() {
            running += p;
            values.push(v);
            cumulative.push(running / total);
        }
        if let Some(last) = cumulative.last_mut() {
            *last = 1.0;
        }
        Ok(Cdf { values, cumulative })
    }

    pub fn values(&self) -> &[V] {
        &self.values
    }

    /// P(X <= x).
    pub fn prob(&self, x: V) -> f64 {
        let idx = self
            .values
            .partition_point(|v| v.cmp_outcome(&x) != std::cmp::Ordering::Greater);
        if idx == 0 {
            0.0
        } else {
            self.cumulative[idx - 1]
        }
    }

    /// Smallest value whose cumulative probability reaches `p` (inverse CDF).
    pub fn value(&self, p: f64) -> V {
        let p = p.clamp(0.0, 1.0);
        let idx = self.cumulative.partition_point(|c| *c < p);
        self.values[idx.min(self.values.len() - 1)]
    }

    /// Inverse lookup at `percentile` in [0, 100].
    pub fn percentile(&self, percentile: f64) -> V {
        self.value(percentile / 100.0)
    }

    /// Central interval covering `percentage` percent of the mass, trimming
    /// `(100 - percentage) / 2` percent from each tail.
    pub fn credible_interval(&self, percentage: f64) -> (V, V) {
        let tail = (1.0 - percentage / 100.0) / 2.0;
        (self.value(tail), self.value(1.0 - tail))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn points() -> Pmf<u32> {
        Pmf::from_items([(0, 0.1), (3, 0.2), (7, 0.3), (10, 0.25), (14, 0.15)])
    }

    #[test]
    fn test_prob_is_cumulative() {
        let cdf = points().make_cdf().unwrap();
        assert_relative_eq!(cdf.prob(0), 0.1, epsilon = 1e-12);
        assert_relative_eq!(cdf.prob(5), 0.3, epsilon = 1e-12);
        assert_relative_eq!(cdf.prob(7), 0.6, epsilon = 1e-12);
        assert_relative_eq!(cdf.prob(100), 1.0);
        assert_eq!(Pmf::from_items([(5u32, 1.0)]).make_cdf().unwrap().prob(4), 0.0);
    }

    #[test]
    fn test_value_inverts_prob() {
        let cdf = points().make_cdf().unwrap();
        assert_eq!(cdf.value(0.0), 0);
        assert_eq!(cdf.value(0.05), 0);
        assert_eq!(cdf.value(0.11), 3);
        assert_eq!(cdf.value(0.5), 7);
        assert_eq!(cdf.value(1.0), 14);
        assert_eq!(cdf.percentile(50.0), 7);
    }

    #[test]
    fn test_unnormalized_pmf_is_scaled() {
        let pmf = Pmf::from_items([(1u32, 2.0), (2, 2.0)]);
        let cdf = pmf.make_cdf().unwrap();
        assert_relative_eq!(cdf.prob(1), 0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_credible_interval_central() {
        let pmf = Pmf::uniform(1u32..=10).unwrap();
        let (low, high) = pmf.credible_interval(50.0).unwrap();
        assert_eq!((low, high), (3, 8));
    }

    #[test]
    fn test_credible_interval_width_monotone() {
        let pmf: Pmf<u32> = (0..40u32).map(|k| (k, 1.0 + ((k * 7) % 11) as f64)).collect();
        let cdf = pmf.make_cdf().unwrap();
        let mut last_width = 0;
        for pct in [0.0, 10.0, 25.0, 50.0, 75.0, 80.0, 90.0, 95.0, 99.0, 100.0] {
            let (low, high) = cdf.credible_interval(pct);
            let width = high - low;
            assert!(width >= last_width, "width shrank at {pct}%");
            last_width = width;
        }
        assert_eq!(cdf.credible_interval(100.0), (0, 39));
    }

    #[test]
    fn test_empty_cdf_is_error() {
        assert!(matches!(Pmf::<u32>::new().make_cdf(), Err(ModelError::EmptyDistribution)));
    }
}
