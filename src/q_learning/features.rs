//! Pairwise (attacker, candidate) feature extraction
//!
//! Every feature is computed for one attacker considering one candidate
//! target, so a single weight vector generalises across which unit is
//! attacking whom.

use std::ops::Index;

use serde::{Deserialize, Serialize};

use crate::{
    Error, Result,
    ports::WorldSnapshot,
    types::{AttackCommand, UnitId, UnitView},
};

/// Number of features (and weights) used throughout a run.
pub const FEATURE_COUNT: usize = 6;

/// Feature slots, in weight-file order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Feature {
    /// Constant bias term.
    Constant,
    /// In-flight attacks by other units on the candidate.
    FootmenAttacking,
    /// Candidate is currently attacking the attacker.
    BeingAttacked,
    /// Candidate is the attacker's nearest enemy.
    ClosestEnemy,
    /// Attacker health minus candidate health.
    Health,
    /// Candidate has the lowest health of all live enemies.
    WeakestEnemy,
}

impl Feature {
    pub const ALL: [Feature; FEATURE_COUNT] = [
        Feature::Constant,
        Feature::FootmenAttacking,
        Feature::BeingAttacked,
        Feature::ClosestEnemy,
        Feature::Health,
        Feature::WeakestEnemy,
    ];

    pub fn index(&self) -> usize {
        *self as usize
    }

    /// Name printed next to the weight in reports.
    pub fn name(&self) -> &'static str {
        match self {
            Feature::Constant => "constant",
            Feature::FootmenAttacking => "footmen attacking",
            Feature::BeingAttacked => "being attacked",
            Feature::ClosestEnemy => "closest enemy",
            Feature::Health => "health",
            Feature::WeakestEnemy => "weakest enemy",
        }
    }
}

/// Feature values for one (attacker, candidate) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureVector(Vec<f64>);

impl FeatureVector {
    pub fn new(values: Vec<f64>) -> Self {
        Self(values)
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

    pub fn get(&self, feature: Feature) -> f64 {
        self.0[feature.index()]
    }
}

impl Index<usize> for FeatureVector {
    type Output = f64;

    fn index(&self, index: usize) -> &f64 {
        &self.0[index]
    }
}

/// Everything the extractor may look at on a given tick.
#[derive(Clone, Copy)]
pub struct FeatureContext<'a> {
    /// World state the features describe.
    pub world: &'a dyn WorldSnapshot,
    /// Attacks that were still running at the end of the previous tick.
    pub in_flight: &'a [AttackCommand],
    /// Live enemy roster, in enumeration order.
    pub enemies: &'a [UnitId],
}

impl<'a> FeatureContext<'a> {
    pub fn new(
        world: &'a dyn WorldSnapshot,
        in_flight: &'a [AttackCommand],
        enemies: &'a [UnitId],
    ) -> Self {
        Self {
            world,
            in_flight,
            enemies,
        }
    }

    fn unit(&self, id: UnitId) -> Result<UnitView> {
        self.world
            .unit(id)
            .ok_or(Error::UnknownUnit { unit: id })
    }

    /// Nearest live enemy by Chebyshev distance; ties go to the first in
    /// roster order.
    pub fn closest_enemy(&self, attacker: &UnitView) -> Option<UnitId> {
        let mut best: Option<(UnitId, u32)> = None;
        for &enemy in self.enemies {
            let Some(view) = self.world.unit(enemy) else {
                continue;
            };
            let distance = attacker.position.chebyshev(&view.position);
            if best.is_none_or(|(_, d)| distance < d) {
                best = Some((enemy, distance));
            }
        }
        best.map(|(id, _)| id)
    }

    /// Live enemy with the lowest health; ties go to the first in roster
    /// order.
    pub fn weakest_enemy(&self) -> Option<UnitId> {
        let mut best: Option<(UnitId, i32)> = None;
        for &enemy in self.enemies {
            let Some(view) = self.world.unit(enemy) else {
                continue;
            };
            if best.is_none_or(|(_, hp)| view.health < hp) {
                best = Some((enemy, view.health));
            }
        }
        best.map(|(id, _)| id)
    }
}

/// Computes [`FeatureVector`]s.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureExtractor {
    bias: f64,
}

impl FeatureExtractor {
    pub const DEFAULT_BIAS: f64 = 0.1;

    /// Create an extractor with the given (non-zero) bias constant.
    pub fn new(bias: f64) -> Self {
        Self { bias }
    }

    pub fn bias(&self) -> f64 {
        self.bias
    }

    /// Number of slots in every vector this extractor produces.
    pub fn len(&self) -> usize {
        FEATURE_COUNT
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    /// Features for `attacker` considering an attack on `candidate`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownUnit`] if either unit is missing from the
    /// world snapshot.
    pub fn extract(
        &self,
        ctx: &FeatureContext<'_>,
        attacker: UnitId,
        candidate: UnitId,
    ) -> Result<FeatureVector> {
        let attacker_view = ctx.unit(attacker)?;
        let candidate_view = ctx.unit(candidate)?;

        let mut values = vec![0.0; FEATURE_COUNT];
        values[Feature::Constant.index()] = self.bias;

        values[Feature::FootmenAttacking.index()] = ctx
            .in_flight
            .iter()
            .filter(|cmd| cmd.target == candidate && cmd.unit != attacker)
            .count() as f64;

        let attacking_me = ctx
            .in_flight
            .iter()
            .any(|cmd| cmd.unit == candidate && cmd.target == attacker);
        values[Feature::BeingAttacked.index()] = indicator(attacking_me);

        values[Feature::ClosestEnemy.index()] =
            indicator(ctx.closest_enemy(&attacker_view) == Some(candidate));

        values[Feature::Health.index()] =
            f64::from(attacker_view.health) - f64::from(candidate_view.health);

        values[Feature::WeakestEnemy.index()] = indicator(ctx.weakest_enemy() == Some(candidate));

        Ok(FeatureVector(values))
    }
}

impl Default for FeatureExtractor {
    fn default() -> Self {
        Self::new(Self::DEFAULT_BIAS)
    }
}

fn indicator(flag: bool) -> f64 {
    if flag { 1.0 } else { 0.0 }
}


#[cfg(test)]
mod tests {
    use super::{test_support::GridWorld, *};
    use crate::types::Side;

    fn id(v: u32) -> UnitId {
        UnitId::new(v)
    }

    fn world() -> GridWorld {
        GridWorld::default()
            .with_unit(1, Side::Own, 0, 0, 100)
            .with_unit(2, Side::Own, 5, 5, 80)
            .with_unit(10, Side::Enemy, 2, 1, 60)
            .with_unit(11, Side::Enemy, 1, 2, 40)
            .with_unit(12, Side::Enemy, 9, 9, 40)
    }

    #[test]
    fn test_bias_is_constant() {
        let w = world();
        let enemies = w.unit_ids(Side::Enemy);
        let ctx = FeatureContext::new(&w, &[], &enemies);
        let extractor = FeatureExtractor::default();

        for &enemy in &enemies {
            let features = extractor.extract(&ctx, id(1), enemy).unwrap();
            assert_eq!(features.len(), FEATURE_COUNT);
            assert_eq!(features.get(Feature::Constant), 0.1);
        }
    }

    #[test]
    fn test_crowding_counts_other_attackers_only() {
        let w = world();
        let enemies = w.unit_ids(Side::Enemy);
        let in_flight = [
            AttackCommand::new(id(1), id(10)),
            AttackCommand::new(id(2), id(10)),
            AttackCommand::new(id(2), id(11)),
        ];
        let ctx = FeatureContext::new(&w, &in_flight, &enemies);
        let extractor = FeatureExtractor::default();

        let on_10 = extractor.extract(&ctx, id(1), id(10)).unwrap();
        assert_eq!(on_10.get(Feature::FootmenAttacking), 1.0);

        let on_11 = extractor.extract(&ctx, id(1), id(11)).unwrap();
        assert_eq!(on_11.get(Feature::FootmenAttacking), 1.0);

        let on_12 = extractor.extract(&ctx, id(1), id(12)).unwrap();
        assert_eq!(on_12.get(Feature::FootmenAttacking), 0.0);
    }

    #[test]
    fn test_being_attacked_by_candidate() {
        let w = world();
        let enemies = w.unit_ids(Side::Enemy);
        let in_flight = [
            AttackCommand::new(id(11), id(1)),
            AttackCommand::new(id(10), id(2)),
        ];
        let ctx = FeatureContext::new(&w, &in_flight, &enemies);
        let extractor = FeatureExtractor::default();

        let by_11 = extractor.extract(&ctx, id(1), id(11)).unwrap();
        assert_eq!(by_11.get(Feature::BeingAttacked), 1.0);

        let by_10 = extractor.extract(&ctx, id(1), id(10)).unwrap();
        assert_eq!(by_10.get(Feature::BeingAttacked), 0.0);
    }

    #[test]
    fn test_closest_enemy_tie_goes_to_first() {
        // Enemies 10 and 11 are both at distance 2 from unit 1.
        let w = world();
        let enemies = w.unit_ids(Side::Enemy);
        let ctx = FeatureContext::new(&w, &[], &enemies);
        let extractor = FeatureExtractor::default();

        assert_eq!(
            extractor
                .extract(&ctx, id(1), id(10))
                .unwrap()
                .get(Feature::ClosestEnemy),
            1.0
        );
        assert_eq!(
            extractor
                .extract(&ctx, id(1), id(11))
                .unwrap()
                .get(Feature::ClosestEnemy),
            0.0
        );
    }

    #[test]
    fn test_health_differential_is_signed() {
        let w = world();
        let enemies = w.unit_ids(Side::Enemy);
        let ctx = FeatureContext::new(&w, &[], &enemies);
        let extractor = FeatureExtractor::default();

        let strong = extractor.extract(&ctx, id(1), id(10)).unwrap();
        assert_eq!(strong.get(Feature::Health), 40.0);

        let weak = GridWorld::default()
            .with_unit(1, Side::Own, 0, 0, 10)
            .with_unit(10, Side::Enemy, 1, 1, 35);
        let enemies = weak.unit_ids(Side::Enemy);
        let ctx = FeatureContext::new(&weak, &[], &enemies);
        let features = extractor.extract(&ctx, id(1), id(10)).unwrap();
        assert_eq!(features.get(Feature::Health), -25.0);
    }

    #[test]
    fn test_weakest_enemy_tie_goes_to_first() {
        let w = world();
        let enemies = w.unit_ids(Side::Enemy);
        let ctx = FeatureContext::new(&w, &[], &enemies);
        let extractor = FeatureExtractor::default();

        let weakest: Vec<f64> = enemies
            .iter()
            .map(|&e| {
                extractor
                    .extract(&ctx, id(2), e)
                    .unwrap()
                    .get(Feature::WeakestEnemy)
            })
            .collect();
        assert_eq!(weakest, vec![0.0, 1.0, 0.0]);
    }

    #[test]
    fn test_unknown_candidate_is_an_error() {
        let w = world();
        let enemies = w.unit_ids(Side::Enemy);
        let ctx = FeatureContext::new(&w, &[], &enemies);
        let err = FeatureExtractor::default()
            .extract(&ctx, id(1), id(99))
            .unwrap_err();
        assert!(matches!(err, Error::UnknownUnit { unit } if unit == id(99)));
    }

    #[test]
    fn test_feature_names_follow_index_order() {
        for (i, feature) in Feature::ALL.iter().enumerate() {
            assert_eq!(feature.index(), i);
        }
        assert_eq!(Feature::ALL[4].name(), "health");
    }
}
