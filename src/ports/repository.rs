//! Repository port for weight persistence.
//!
//! This module defines the trait boundary between the training loop and
//! whatever stores its weights between runs.

use std::sync::Arc;

use crate::{Result, q_learning::WeightVector};

/// Port for persisting and loading learned weights.
///
/// Two slots are kept: the latest weights, overwritten at the end of every
/// episode, and the best weights, overwritten only when an evaluation
/// window beats the previous best.
///
/// # Examples
///
/// ```
/// use skirmish::adapters::InMemoryWeightStore;
/// use skirmish::ports::WeightStore;
/// use skirmish::q_learning::WeightVector;
///
/// let store = InMemoryWeightStore::new();
/// assert!(store.load()?.is_none());
///
/// store.save(&WeightVector::new(vec![0.5, -0.25]))?;
/// assert_eq!(store.load()?.unwrap().as_slice(), &[0.5, -0.25]);
/// # Ok::<(), skirmish::Error>(())
/// ```
pub trait WeightStore {
    /// Overwrite the latest weights.
    fn save(&self, weights: &WeightVector) -> Result<()>;

    /// Load the latest weights; `Ok(None)` when nothing has been saved.
    fn load(&self) -> Result<Option<WeightVector>>;

    /// Overwrite the best weights.
    fn save_best(&self, weights: &WeightVector) -> Result<()>;

    /// Load the best weights; `Ok(None)` when nothing has been saved.
    fn load_best(&self) -> Result<Option<WeightVector>>;
}

impl<S: WeightStore + ?Sized> WeightStore for Box<S> {
    fn save(&self, weights: &WeightVector) -> Result<()> {
        (**self).save(weights)
    }

    fn load(&self) -> Result<Option<WeightVector>> {
        (**self).load()
    }

    fn save_best(&self, weights: &WeightVector) -> Result<()> {
        (**self).save_best(weights)
    }

    fn load_best(&self) -> Result<Option<WeightVector>> {
        (**self).load_best()
    }
}

impl<S: WeightStore + ?Sized> WeightStore for Arc<S> {
    fn save(&self, weights: &WeightVector) -> Result<()> {
        (**self).save(weights)
    }

    fn load(&self) -> Result<Option<WeightVector>> {
        (**self).load()
    }

    fn save_best(&self, weights: &WeightVector) -> Result<()> {
        (**self).save_best(weights)
    }

    fn load_best(&self) -> Result<Option<WeightVector>> {
        (**self).load_best()
    }
}
