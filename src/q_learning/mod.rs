//! Linear function approximation Q-learning
//!
//! The learner scores an (attacker, candidate target) pair as the dot
//! product of a weight vector with a small set of hand-built features:
//!
//! ```text
//! Q(s, a) = w · φ(s, a)
//! ```
//!
//! - [`features`]: builds φ from the world snapshot and in-flight attacks
//! - [`linear`]: the weight vector, Q-values and the TD(0) update
//! - [`policy`]: ε-greedy target selection
//! - [`random`]: the injectable random source shared by all of the above
//!
//! ## Usage Example
//!
//! ```
//! use skirmish::q_learning::{FeatureVector, LinearQFunction, WeightVector};
//!
//! let mut q = LinearQFunction::new(WeightVector::new(vec![1.0]), 0.0001, 0.9);
//! let x = FeatureVector::new(vec![2.0]);
//! assert_eq!(q.q_value(&x)?, 2.0);
//!
//! q.update(&x, 10.0, 0.0)?;
//! assert!((q.weights()[0] - 1.0016).abs() < 1e-12);
//! # Ok::<(), skirmish::Error>(())
//! ```

pub mod features;
pub mod linear;
pub mod policy;
pub mod random;

// Public re-exports
pub use features::{FEATURE_COUNT, Feature, FeatureContext, FeatureExtractor, FeatureVector};
pub use linear::{LinearQFunction, WeightVector, dot, td_update};
pub use policy::{EpsilonGreedy, Selection};
pub use random::{RandomSource, ScriptedRandom};
