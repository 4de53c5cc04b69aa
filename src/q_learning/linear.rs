//! Linear Q-function approximation
//!
//! Q(s, a) is approximated as `w · φ(s, a)` and trained with the
//! semi-gradient TD(0) rule:
//!
//! ```text
//! w[i] ← w[i] + α · (r + γ · max_a' Q(s', a') − w·φ(s, a)) · φ(s, a)[i]
//! ```

use std::ops::Index;

use serde::{Deserialize, Serialize};

use crate::{
    Error, Result,
    q_learning::{
        features::{Feature, FeatureContext, FeatureExtractor, FeatureVector},
        random::RandomSource,
    },
    types::UnitId,
};

/// Learned weights, one per feature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WeightVector(Vec<f64>);

impl WeightVector {
    pub fn new(values: Vec<f64>) -> Self {
        Self(values)
    }

    pub fn zeros(len: usize) -> Self {
        Self(vec![0.0; len])
    }

    /// Uniform random weights in `[-1, 1)`.
    pub fn random<R: RandomSource + ?Sized>(len: usize, rng: &mut R) -> Self {
        Self((0..len).map(|_| rng.next_unit() * 2.0 - 1.0).collect())
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Weights paired with the feature they multiply.
    pub fn named(&self) -> impl Iterator<Item = (Feature, f64)> + '_ {
        Feature::ALL.iter().copied().zip(self.0.iter().copied())
    }
}

impl Index<usize> for WeightVector {
    type Output = f64;

    fn index(&self, index: usize) -> &f64 {
        &self.0[index]
    }
}

/// Dot product of weights and features.
///
/// # Errors
///
/// Returns [`Error::DimensionMismatch`] if the lengths differ. Vectors are
/// never truncated to a common length.
pub fn dot(weights: &WeightVector, features: &FeatureVector) -> Result<f64> {
    if weights.len() != features.len() {
        return Err(Error::DimensionMismatch {
            weights: weights.len(),
            features: features.len(),
        });
    }
    Ok(weights
        .as_slice()
        .iter()
        .zip(features.as_slice())
        .map(|(w, x)| w * x)
        .sum())
}

/// One semi-gradient TD(0) step.
///
/// `old_q = old_weights · old_features` is computed once from the
/// pre-update weights and held fixed for every index.
pub fn td_update(
    old_weights: &WeightVector,
    old_features: &FeatureVector,
    reward: f64,
    next_max_q: f64,
    learning_rate: f64,
    discount: f64,
) -> Result<WeightVector> {
    let old_q = dot(old_weights, old_features)?;
    let td_error = reward + discount * next_max_q - old_q;

    Ok(WeightVector(
        old_weights
            .as_slice()
            .iter()
            .zip(old_features.as_slice())
            .map(|(w, x)| w + learning_rate * td_error * x)
            .collect(),
    ))
}

/// Weight vector plus the hyper-parameters of its update rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearQFunction {
    weights: WeightVector,
    /// Learning rate α
    learning_rate: f64,
    /// Discount factor γ
    discount: f64,
}

impl LinearQFunction {
    pub fn new(weights: WeightVector, learning_rate: f64, discount: f64) -> Self {
        Self {
            weights,
            learning_rate,
            discount,
        }
    }

    pub fn weights(&self) -> &WeightVector {
        &self.weights
    }

    pub fn learning_rate(&self) -> f64 {
        self.learning_rate
    }

    pub fn discount(&self) -> f64 {
        self.discount
    }

    /// Q-value of a feature vector under the current weights.
    pub fn q_value(&self, features: &FeatureVector) -> Result<f64> {
        dot(&self.weights, features)
    }

    /// Q-value of `attacker` attacking `candidate` in the given context.
    pub fn evaluate(
        &self,
        extractor: &FeatureExtractor,
        ctx: &FeatureContext<'_>,
        attacker: UnitId,
        candidate: UnitId,
    ) -> Result<f64> {
        let features = extractor.extract(ctx, attacker, candidate)?;
        self.q_value(&features)
    }

    /// Best Q-value over all live enemies, or `0.0` when there are none.
    pub fn max_q(
        &self,
        extractor: &FeatureExtractor,
        ctx: &FeatureContext<'_>,
        attacker: UnitId,
    ) -> Result<f64> {
        let mut best: Option<f64> = None;
        for &candidate in ctx.enemies {
            let q = self.evaluate(extractor, ctx, attacker, candidate)?;
            best = Some(best.map_or(q, |b| b.max(q)));
        }
        Ok(best.unwrap_or(0.0))
    }

    /// Apply one TD(0) update in place.
    pub fn update(
        &mut self,
        old_features: &FeatureVector,
        reward: f64,
        next_max_q: f64,
    ) -> Result<()> {
        self.weights = td_update(
            &self.weights,
            old_features,
            reward,
            next_max_q,
            self.learning_rate,
            self.discount,
        )?;
        Ok(())
    }
}
