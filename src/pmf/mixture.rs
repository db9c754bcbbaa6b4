use tracing::trace;

use super::{Outcome, Pmf};
use crate::error::Result;

/// A distribution over distributions: each component [`Pmf`] carries a weight.
///
/// Components are stored as an explicit list rather than as keys of an outer
/// `Pmf`, so two components with identical contents stay separate entries.
#[derive(Debug, Clone)]
pub struct MetaPmf<V: Outcome> {
    components: Vec<(Pmf<V>, f64)>,
}

impl<V: Outcome> Default for MetaPmf<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Outcome> MetaPmf<V> {
    pub fn new() -> Self {
        MetaPmf {
            components: Vec::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        MetaPmf {
            components: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, component: Pmf<V>, weight: f64) {
        self.components.push((component, weight));
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    pub fn total_weight(&self) -> f64 {
        self.components.iter().map(|(_, w)| w).sum()
    }

    pub fn components(&self) -> impl Iterator<Item = (&Pmf<V>, f64)> + '_ {
        self.components.iter().map(|(pmf, w)| (pmf, *w))
    }

    /// Collapse into a single flat distribution.
    ///
    /// Every `(value, mass)` of every component contributes
    /// `mass * component_weight`; the result is normalized.
    pub fn make_mixture(&self) -> Result<Pmf<V>> {
        let mut mix = Pmf::new();
        for (component, weight) in &self.components {
            for (value, mass) in component.items() {
                mix.incr(value, mass * weight);
            }
        }
        let total = mix.normalize()?;
        trace!(
            "Mixture of {} components collapsed to {} values (mass {:.4})",
            self.components.len(),
            mix.len(),
            total
        );
        Ok(mix)
    }
}

impl<V: Outcome> FromIterator<(Pmf<V>, f64)> for MetaPmf<V> {
    fn from_iter<I: IntoIterator<Item = (Pmf<V>, f64)>>(iter: I) -> Self {
        MetaPmf {
            components: iter.into_iter().collect(),
        }
    }
}
