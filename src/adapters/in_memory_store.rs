//! In-memory weight store for testing.

use std::sync::{Arc, Mutex, PoisonError};

use crate::{Result, ports::WeightStore, q_learning::WeightVector};

#[derive(Debug, Default)]
struct Slots {
    latest: Option<WeightVector>,
    best: Option<WeightVector>,
    saves: usize,
    best_saves: usize,
}

/// In-memory weight store.
///
/// Clones share the same storage, so a test can keep a handle while the
/// training loop owns another.
#[derive(Debug, Clone, Default)]
pub struct InMemoryWeightStore {
    slots: Arc<Mutex<Slots>>,
}

impl InMemoryWeightStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `save` calls so far.
    pub fn save_count(&self) -> usize {
        self.with_slots(|s| s.saves)
    }

    /// Number of `save_best` calls so far.
    pub fn best_save_count(&self) -> usize {
        self.with_slots(|s| s.best_saves)
    }

    fn with_slots<T>(&self, f: impl FnOnce(&mut Slots) -> T) -> T {
        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut slots)
    }
}

impl WeightStore for InMemoryWeightStore {
    fn save(&self, weights: &WeightVector) -> Result<()> {
        self.with_slots(|s| {
            s.latest = Some(weights.clone());
            s.saves += 1;
        });
        Ok(())
    }

    fn load(&self) -> Result<Option<WeightVector>> {
        Ok(self.with_slots(|s| s.latest.clone()))
    }

    fn save_best(&self, weights: &WeightVector) -> Result<()> {
        self.with_slots(|s| {
            s.best = Some(weights.clone());
            s.best_saves += 1;
        });
        Ok(())
    }

    fn load_best(&self) -> Result<Option<WeightVector>> {
        Ok(self.with_slots(|s| s.best.clone()))
    }
}
