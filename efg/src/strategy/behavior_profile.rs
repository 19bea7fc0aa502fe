use crate::game::Player;
use crate::vector::{ActionVector, ProfileShape};

use std::sync::Arc;

/// `BehaviorProfile` is a specialized `ActionVector` holding, for every player
/// and infoset, the probability of each action.
///
/// Unlike a strict behavioral strategy, the simplex constraints are *not*
/// enforced on construction: optimizers are allowed to step outside them and
/// pay for it through their objective. Use `is_feasible` to check.
#[derive(Debug, Clone)]
pub struct BehaviorProfile(ActionVector);

impl BehaviorProfile {
    pub fn from_action_vector(vector: ActionVector) -> BehaviorProfile {
        BehaviorProfile(vector)
    }

    pub fn from_vec(shape: Arc<ProfileShape>, entries: Vec<f64>) -> BehaviorProfile {
        BehaviorProfile(ActionVector::from_vec(shape, entries))
    }

    /// The centroid profile: every infoset plays its actions uniformly.
    pub fn uniform(shape: Arc<ProfileShape>) -> BehaviorProfile {
        let mut vector = ActionVector::from_constant(shape.clone(), 0f64);
        for (_, _, range) in shape.blocks() {
            let prob = 1.0f64 / (range.len() as f64);
            for x in vector.entries[range].iter_mut() {
                *x = prob;
            }
        }
        BehaviorProfile(vector)
    }

    /// A profile playing action 0 everywhere, except where `choices` says otherwise.
    pub fn pure<F>(shape: Arc<ProfileShape>, choices: F) -> BehaviorProfile
    where
        F: Fn(Player, usize) -> usize,
    {
        let mut vector = ActionVector::from_constant(shape.clone(), 0f64);
        for (player, infoset, range) in shape.blocks() {
            let action = choices(player, infoset);
            assert!(action < range.len(), "Pure choice out of range");
            vector.entries[range.start + action] = 1.0;
        }
        BehaviorProfile(vector)
    }

    pub fn shape(&self) -> &Arc<ProfileShape> {
        self.0.shape()
    }

    pub fn get(&self, player: Player, infoset: usize, action: usize) -> f64 {
        self.0[(player, infoset, action)]
    }

    pub fn set(&mut self, player: Player, infoset: usize, action: usize, prob: f64) {
        self.0[(player, infoset, action)] = prob;
    }

    pub fn infoset(&self, player: Player, infoset: usize) -> &[f64] {
        self.0.infoset(player, infoset)
    }

    pub fn infoset_mut(&mut self, player: Player, infoset: usize) -> &mut [f64] {
        self.0.infoset_mut(player, infoset)
    }

    /// Largest violation of the simplex constraints: either the magnitude of a
    /// negative probability or the distance of an infoset's mass from one.
    pub fn simplex_violation(&self) -> f64 {
        let mut worst = 0f64;
        for (_, _, range) in self.shape().blocks() {
            let probs = &self.0.entries[range];
            let total_mass: f64 = probs.iter().sum();
            worst = worst.max((total_mass - 1.0).abs());
            for &x in probs.iter().filter(|x| **x < 0.0) {
                worst = worst.max(-x);
            }
        }
        worst
    }

    pub fn is_feasible(&self, tolerance: f64) -> bool {
        self.simplex_violation() <= tolerance
    }

    pub fn into_inner(self) -> ActionVector {
        self.0
    }

    pub fn inner(&self) -> &ActionVector {
        &self.0
    }

    pub fn inner_mut(&mut self) -> &mut ActionVector {
        &mut self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    fn shape() -> Arc<ProfileShape> {
        Arc::new(ProfileShape::new(vec![vec![2, 3], vec![1]]))
    }

    #[test]
    fn uniform_is_feasible() {
        let profile = BehaviorProfile::uniform(shape());
        assert_approx_eq!(profile.get(Player(0), 0, 1), 0.5);
        assert_approx_eq!(profile.get(Player(0), 1, 2), 1.0 / 3.0);
        assert_approx_eq!(profile.get(Player(1), 0, 0), 1.0);
        assert!(profile.is_feasible(1e-12));
    }

    #[test]
    fn pure_profile() {
        let profile = BehaviorProfile::pure(shape(), |player, infoset| {
            if player == Player(0) && infoset == 1 {
                2
            } else {
                0
            }
        });
        assert_eq!(profile.inner().as_slice(), &[1.0, 0.0, 0.0, 0.0, 1.0, 1.0]);
    }

    #[test]
    fn violations_are_measured() {
        let mut profile = BehaviorProfile::uniform(shape());
        profile.infoset_mut(Player(0), 0).copy_from_slice(&[1.1, -0.1]);
        assert_approx_eq!(profile.simplex_violation(), 0.1);
        assert!(!profile.is_feasible(1e-3));

        profile.set(Player(1), 0, 0, 0.7);
        assert_approx_eq!(profile.simplex_violation(), 0.3);
    }
}
