//! Epsilon-greedy target selection

use serde::{Deserialize, Serialize};

use crate::{
    Error, Result,
    q_learning::{
        features::{FeatureContext, FeatureExtractor, FeatureVector},
        linear::LinearQFunction,
        random::RandomSource,
    },
    types::UnitId,
};

/// Outcome of a selection: the target and the features that describe
/// attacking it. The features are kept for later credit assignment.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub target: UnitId,
    pub features: FeatureVector,
    /// Whether the target came from the exploration branch.
    pub explored: bool,
}

/// ε-greedy policy over live enemy targets.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EpsilonGreedy {
    epsilon: f64,
}

impl EpsilonGreedy {
    pub const DEFAULT_EPSILON: f64 = 0.02;

    pub fn new(epsilon: f64) -> Self {
        Self { epsilon }
    }

    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    /// Choose a target for `attacker` among `ctx.enemies`.
    ///
    /// One uniform draw decides between exploring (uniform random enemy,
    /// drawn from the same source) and exploiting (highest Q, first wins
    /// ties). Either way the returned features describe the chosen pair.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoLiveEnemies`] if the enemy roster is empty.
    pub fn select<R: RandomSource + ?Sized>(
        &self,
        extractor: &FeatureExtractor,
        ctx: &FeatureContext<'_>,
        q: &LinearQFunction,
        attacker: UnitId,
        rng: &mut R,
    ) -> Result<Selection> {
        if ctx.enemies.is_empty() {
            return Err(Error::NoLiveEnemies { unit: attacker });
        }

        let explored = rng.next_unit() < self.epsilon;
        let target = if explored {
            ctx.enemies[rng.next_index(ctx.enemies.len())]
        } else {
            greedy_target(extractor, ctx, q, attacker)?
        };

        let features = extractor.extract(ctx, attacker, target)?;
        Ok(Selection {
            target,
            features,
            explored,
        })
    }
}

impl Default for EpsilonGreedy {
    fn default() -> Self {
        Self::new(Self::DEFAULT_EPSILON)
    }
}

/// Enemy with the highest Q-value; ties go to the first encountered.
fn greedy_target(
    extractor: &FeatureExtractor,
    ctx: &FeatureContext<'_>,
    q: &LinearQFunction,
    attacker: UnitId,
) -> Result<UnitId> {
    let mut best: Option<(UnitId, f64)> = None;
    for &candidate in ctx.enemies {
        let value = q.evaluate(extractor, ctx, attacker, candidate)?;
        if best.is_none_or(|(_, b)| value > b) {
            best = Some((candidate, value));
        }
    }
    best.map(|(id, _)| id)
        .ok_or(Error::NoLiveEnemies { unit: attacker })
}
