//! Weighted random selection

use rand::Rng;

use crate::error::{SlotError, SlotResult};

/// Draws items with probability proportional to their weight
///
/// Built from a snapshot of the weights; rebuild after the catalog changes.
/// Deterministic for a deterministic RNG.
#[derive(Debug, Clone)]
pub struct WeightedSampler<T> {
    /// Items with positive weight, catalog order
    entries: Vec<(T, f64)>,
    total_weight: f64,
}

impl<T: Copy> WeightedSampler<T> {
    /// Build a sampler; entries with zero or negative weight are never drawn.
    ///
    /// A non-positive total is a configuration error.
    pub fn new(weights: impl IntoIterator<Item = (T, f64)>) -> SlotResult<Self> {
        let entries: Vec<(T, f64)> = weights
            .into_iter()
            .filter(|(_, w)| *w > 0.0 && w.is_finite())
            .collect();
        let total_weight: f64 = entries.iter().map(|(_, w)| w).sum();

        if entries.is_empty() || total_weight <= 0.0 || !total_weight.is_finite() {
            return Err(SlotError::NonPositiveWeight(total_weight));
        }

        Ok(Self {
            entries,
            total_weight,
        })
    }

    /// Draw one item
    ///
    /// Picks `r` uniformly in `[0, total)` and returns the first item whose
    /// running weight sum reaches `r`.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> T {
        let draw = rng.random_range(0.0..self.total_weight);
        let mut running = 0.0;
        for &(item, weight) in &self.entries {
            running += weight;
            if running >= draw {
                return item;
            }
        }
        // Float accumulation can leave `running` a hair short of `draw`
        self.entries[self.entries.len() - 1].0
    }

    /// Sum of drawable weights
    pub fn total_weight(&self) -> f64 {
        self.total_weight
    }

    /// Probability of drawing `item`
    pub fn probability(&self, item: T) -> f64
    where
        T: PartialEq,
    {
        self.entries
            .iter()
            .filter(|(i, _)| *i == item)
            .map(|(_, w)| w / self.total_weight)
            .sum()
    }
}
