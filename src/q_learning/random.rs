//! Random number source used for exploration and weight initialisation.

use std::collections::VecDeque;

use rand::Rng;

/// The single random source of a training run.
///
/// Both the exploration coin flip and the random target draw come from the
/// same source, so a seeded or scripted source makes a run reproducible.
pub trait RandomSource {
    /// Uniform draw from `[0, 1)`.
    fn next_unit(&mut self) -> f64;

    /// Uniform index in `0..len`. `len` must be non-zero.
    fn next_index(&mut self, len: usize) -> usize;
}

impl<R: Rng> RandomSource for R {
    fn next_unit(&mut self) -> f64 {
        self.random::<f64>()
    }

    fn next_index(&mut self, len: usize) -> usize {
        self.random_range(0..len)
    }
}

/// Replays a fixed sequence of unit draws.
///
/// Index draws consume one unit draw and scale it to the range. When the
/// script runs out it keeps returning `0.0`.
#[derive(Debug, Clone, Default)]
pub struct ScriptedRandom {
    draws: VecDeque<f64>,
}

impl ScriptedRandom {
    pub fn new(draws: impl IntoIterator<Item = f64>) -> Self {
        Self {
            draws: draws.into_iter().collect(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.draws.len()
    }
}

// Not an `Rng`, so it does not overlap the blanket impl.
impl RandomSource for ScriptedRandom {
    fn next_unit(&mut self) -> f64 {
        self.draws.pop_front().unwrap_or(0.0)
    }

    fn next_index(&mut self, len: usize) -> usize {
        let idx = (self.next_unit() * len as f64) as usize;
        idx.min(len.saturating_sub(1))
    }
}
