//! Finite discrete probability distributions.
//!
//! A [`Pmf`] maps outcome values to (not necessarily normalized) masses.
//! Values are kept in a `BTreeMap`, so iteration is always in ascending
//! outcome order, which is what [`Cdf`] construction and the pairwise
//! ordering queries rely on.

pub mod cdf;
pub mod mixture;

pub use cdf::Cdf;
pub use mixture::MetaPmf;

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt::Debug;
use std::ops::Add;

use crate::error::{ModelError, Result};

/// A value that can live in the support of a [`Pmf`].
///
/// Outcomes need a total order (so `f64` hypotheses can be map keys) and a
/// numeric view for means and variances.
pub trait Outcome: Copy + Debug + PartialEq {
    fn as_f64(self) -> f64;

    fn cmp_outcome(&self, other: &Self) -> Ordering;

    /// Collapse representations that should be the same key (e.g. `-0.0`).
    fn canonical(self) -> Self {
        self
    }
}

impl Outcome for f64 {
    fn as_f64(self) -> f64 {
        self
    }

    fn cmp_outcome(&self, other: &Self) -> Ordering {
        self.total_cmp(other)
    }

    fn canonical(self) -> Self {
        if self == 0.0 {
            0.0
        } else {
            self
        }
    }
}

macro_rules! integer_outcome {
    ($($t:ty),*) => {
        $(
            impl Outcome for $t {
                fn as_f64(self) -> f64 {
                    self as f64
                }

                fn cmp_outcome(&self, other: &Self) -> Ordering {
                    self.cmp(other)
                }
            }
        )*
    };
}

integer_outcome!(u32, u64, i32, i64);

#[derive(Debug, Clone, Copy)]
struct Key<V: Outcome>(V);

impl<V: Outcome> PartialEq for Key<V> {
    fn eq(&self, other: &Self) -> bool {
        self.0.cmp_outcome(&other.0) == Ordering::Equal
    }
}

impl<V: Outcome> Eq for Key<V> {}

impl<V: Outcome> PartialOrd for Key<V> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<V: Outcome> Ord for Key<V> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.cmp_outcome(&other.0)
    }
}

/// Probability mass function over outcomes of type `V`.
#[derive(Debug, Clone, PartialEq)]
pub struct Pmf<V: Outcome> {
    masses: BTreeMap<Key<V>, f64>,
}

impl<V: Outcome> Default for Pmf<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Outcome> Pmf<V> {
    pub fn new() -> Self {
        Pmf {
            masses: BTreeMap::new(),
        }
    }

    /// Build an unnormalized pmf from `(value, mass)` pairs, accumulating duplicates.
    pub fn from_items<I>(items: I) -> Self
    where
        I: IntoIterator<Item = (V, f64)>,
    {
        let mut pmf = Pmf::new();
        for (value, mass) in items {
            pmf.incr(value, mass);
        }
        pmf
    }

    /// Uniform distribution over `values`.
    pub fn uniform<I>(values: I) -> Result<Self>
    where
        I: IntoIterator<Item = V>,
    {
        let mut pmf = Pmf::new();
        for value in values {
            pmf.set(value, 1.0);
        }
        if pmf.is_empty() {
            return Err(ModelError::EmptyDistribution);
        }
        pmf.normalize()?;
        Ok(pmf)
    }

    /// Add `amount` to the mass at `value`, creating the entry if absent.
    pub fn incr(&mut self, value: V, amount: f64) {
        *self.masses.entry(Key(value.canonical())).or_insert(0.0) += amount;
    }

    pub fn set(&mut self, value: V, mass: f64) {
        self.masses.insert(Key(value.canonical()), mass);
    }

    /// Scale the mass at `value` by `factor`. Absent values stay absent.
    pub fn mult(&mut self, value: V, factor: f64) {
        if let Some(mass) = self.masses.get_mut(&Key(value.canonical())) {
            *mass *= factor;
        }
    }

    pub fn prob(&self, value: V) -> f64 {
        self.masses
            .get(&Key(value.canonical()))
            .copied()
            .unwrap_or(0.0)
    }

    pub fn total(&self) -> f64 {
        self.masses.values().sum()
    }

    pub fn len(&self) -> usize {
        self.masses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.masses.is_empty()
    }

    /// Support values in ascending order.
    pub fn values(&self) -> impl Iterator<Item = V> + '_ {
        self.masses.keys().map(|k| k.0)
    }

    /// `(value, mass)` pairs in ascending value order.
    pub fn items(&self) -> impl Iterator<Item = (V, f64)> + '_ {
        self.masses.iter().map(|(k, p)| (k.0, *p))
    }

    pub(crate) fn masses_mut(&mut self) -> impl Iterator<Item = (V, &mut f64)> + '_ {
        self.masses.iter_mut().map(|(k, p)| (k.0, p))
    }

    /// Divide every mass by the total so the distribution sums to 1.
    ///
    /// Returns the total mass before normalization (the evidence when this is
    /// called right after a likelihood update). A zero or non-finite total is
    /// reported as [`ModelError::ZeroMass`] and leaves the masses untouched.
    pub fn normalize(&mut self) -> Result<f64> {
        let total = self.total();
        if !(total > 0.0) || !total.is_finite() {
            return Err(ModelError::ZeroMass);
        }
        for mass in self.masses.values_mut() {
            *mass /= total;
        }
        Ok(total)
    }

    fn checked_total(&self) -> Result<f64> {
        if self.is_empty() {
            return Err(ModelError::EmptyDistribution);
        }
        let total = self.total();
        if !(total > 0.0) || !total.is_finite() {
            return Err(ModelError::ZeroMass);
        }
        Ok(total)
    }

    /// Probability-weighted average of the support.
    pub fn mean(&self) -> Result<f64> {
        let total = self.checked_total()?;
        let weighted: f64 = self.items().map(|(v, p)| v.as_f64() * p).sum();
        Ok(weighted / total)
    }

    pub fn variance(&self) -> Result<f64> {
        let total = self.checked_total()?;
        let mu = self.mean()?;
        let dev: f64 = self
            .items()
            .map(|(v, p)| {
                let d = v.as_f64() - mu;
                d * d * p
            })
            .sum();
        Ok(dev / total)
    }

    /// Value with the highest mass (the MAP estimate for a posterior).
    /// Ties go to the smallest value.
    pub fn max_like(&self) -> Result<V> {
        let mut best: Option<(V, f64)> = None;
        for (v, p) in self.items() {
            match best {
                Some((_, best_p)) if p <= best_p => {}
                _ => best = Some((v, p)),
            }
        }
        best.map(|(v, _)| v).ok_or(ModelError::EmptyDistribution)
    }

    pub fn make_cdf(&self) -> Result<Cdf<V>> {
        Cdf::from_pmf(self)
    }

    /// Central interval covering `percentage` percent of the mass.
    pub fn credible_interval(&self, percentage: f64) -> Result<(V, V)> {
        Ok(self.make_cdf()?.credible_interval(percentage))
    }

    /// Apply `f` to every support value, merging masses that land on the same value.
    pub fn map_values<F>(&self, f: F) -> Pmf<V>
    where
        F: Fn(V) -> V,
    {
        Pmf::from_items(self.items().map(|(v, p)| (f(v), p)))
    }

    /// Distribution of the sum of independent draws from `self` and `other`.
    pub fn add_pmf(&self, other: &Pmf<V>) -> Pmf<V>
    where
        V: Add<Output = V>,
    {
        let mut sum = Pmf::new();
        for (v1, p1) in self.items() {
            for (v2, p2) in other.items() {
                sum.incr(v1 + v2, p1 * p2);
            }
        }
        sum
    }

    /// Shift every support value by `delta`.
    pub fn shifted(&self, delta: V) -> Pmf<V>
    where
        V: Add<Output = V>,
    {
        self.map_values(|v| v + delta)
    }

    /// P(X < Y) for independent X ~ self, Y ~ other.
    pub fn prob_less(&self, other: &Pmf<V>) -> f64 {
        self.pairwise(other, Ordering::Less)
    }

    /// P(X > Y) for independent X ~ self, Y ~ other.
    pub fn prob_greater(&self, other: &Pmf<V>) -> f64 {
        self.pairwise(other, Ordering::Greater)
    }

    /// P(X == Y), summed over the shared support.
    pub fn prob_equal(&self, other: &Pmf<V>) -> f64 {
        self.pairwise(other, Ordering::Equal)
    }

    fn pairwise(&self, other: &Pmf<V>, wanted: Ordering) -> f64 {
        let mut total = 0.0;
        for (v1, p1) in self.items() {
            for (v2, p2) in other.items() {
                if v1.cmp_outcome(&v2) == wanted {
                    total += p1 * p2;
                }
            }
        }
        total
    }
}

impl<V> Add<V> for Pmf<V>
where
    V: Outcome + Add<Output = V>,
{
    type Output = Pmf<V>;

    fn add(self, delta: V) -> Pmf<V> {
        self.shifted(delta)
    }
}

impl<V: Outcome> FromIterator<(V, f64)> for Pmf<V> {
    fn from_iter<I: IntoIterator<Item = (V, f64)>>(iter: I) -> Self {
        Pmf::from_items(iter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn die() -> Pmf<u32> {
        Pmf::uniform(1..=6).unwrap()
    }

    #[test]
    fn test_incr_accumulates() {
        let mut pmf = Pmf::new();
        pmf.incr(3u32, 0.25);
        pmf.incr(3u32, 0.5);
        pmf.incr(7u32, 0.25);
        assert_eq!(pmf.len(), 2);
        assert_relative_eq!(pmf.prob(3), 0.75, epsilon = 1e-12);
        assert_relative_eq!(pmf.prob(10), 0.0);
    }

    #[test]
    fn test_normalize_sums_to_one() {
        let mut pmf: Pmf<f64> = (0..50).map(|i| (i as f64 * 0.1, (i % 7) as f64 + 0.3)).collect();
        let total = pmf.normalize().unwrap();
        assert!(total > 1.0);
        assert_relative_eq!(pmf.total(), 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_normalize_zero_mass_is_error() {
        let mut pmf = Pmf::from_items([(1u32, 0.0), (2u32, 0.0)]);
        assert_eq!(pmf.normalize(), Err(ModelError::ZeroMass));
        let mut empty: Pmf<u32> = Pmf::new();
        assert_eq!(empty.normalize(), Err(ModelError::ZeroMass));
    }

    #[test]
    fn test_negative_zero_is_same_key() {
        let mut pmf = Pmf::new();
        pmf.incr(0.0f64, 0.5);
        pmf.incr(-0.0f64, 0.5);
        assert_eq!(pmf.len(), 1);
        assert_relative_eq!(pmf.prob(0.0), 1.0);
    }

    #[test]
    fn test_mean_and_variance() {
        let d = die();
        assert_relative_eq!(d.mean().unwrap(), 3.5, epsilon = 1e-12);
        assert_relative_eq!(d.variance().unwrap(), 35.0 / 12.0, epsilon = 1e-12);
        assert_eq!(Pmf::<u32>::new().mean(), Err(ModelError::EmptyDistribution));
    }

    #[test]
    fn test_max_like() {
        let pmf = Pmf::from_items([(1u32, 0.2), (4, 0.5), (9, 0.3)]);
        assert_eq!(pmf.max_like().unwrap(), 4);
    }

    #[test]
    fn test_add_pmf_two_dice() {
        let two = die().add_pmf(&die());
        assert_eq!(two.len(), 11);
        assert_relative_eq!(two.prob(7), 6.0 / 36.0, epsilon = 1e-12);
        assert_relative_eq!(two.prob(2), 1.0 / 36.0, epsilon = 1e-12);
        assert_relative_eq!(two.total(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_add_pmf_is_commutative() {
        let a = Pmf::from_items([(0u32, 0.1), (3, 0.6), (7, 0.3)]);
        let b = Pmf::from_items([(1u32, 0.5), (2, 0.25), (10, 0.25)]);
        let ab = a.add_pmf(&b);
        let ba = b.add_pmf(&a);
        assert_eq!(ab.values().collect::<Vec<_>>(), ba.values().collect::<Vec<_>>());
        for (v, p) in ab.items() {
            assert_relative_eq!(p, ba.prob(v), epsilon = 1e-12);
        }
    }

    #[test]
    fn test_scalar_shift() {
        let shifted = die() + 10;
        assert_eq!(shifted.values().collect::<Vec<_>>(), (11..=16).collect::<Vec<_>>());
        assert_relative_eq!(shifted.mean().unwrap(), 13.5, epsilon = 1e-12);
    }

    #[test]
    fn test_map_values_merges_collisions() {
        let halved = Pmf::from_items([(1.0f64, 0.5), (2.0, 0.25), (3.0, 0.25)])
            .map_values(|v| (v / 2.0).floor());
        assert_relative_eq!(halved.prob(0.0), 0.5);
        assert_relative_eq!(halved.prob(1.0), 0.5);
    }

    #[test]
    fn test_ordering_queries_sum_to_one() {
        let a = Pmf::from_items([(10u32, 0.2), (17, 0.5), (24, 0.3)]);
        let b = Pmf::from_items([(13u32, 0.4), (17, 0.4), (20, 0.2)]);
        let total = a.prob_less(&b) + a.prob_greater(&b) + a.prob_equal(&b);
        assert_relative_eq!(total, 1.0, epsilon = 1e-12);
        assert_relative_eq!(a.prob_equal(&b), 0.5 * 0.4, epsilon = 1e-12);
        assert_relative_eq!(a.prob_less(&b), b.prob_greater(&a), epsilon = 1e-12);
    }
}
