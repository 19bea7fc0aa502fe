use crate::errors::{LiapError, LiapResult};
use crate::objective::{LiapunovObjective, Objective};
use crate::params::LiapParams;
use crate::powell::{powell, DirectionMatrix};
use crate::status::CancellationToken;

use efg_lite::game::GameTree;
use efg_lite::strategy::BehaviorProfile;
use efg_lite::vector::ProfileShape;
use log::{debug, info};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::sync::Arc;

/// Algorithm that produced a solution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Creator {
    Liap,
    LiapBySubgame,
}

/// An accepted local minimum of the Liapunov function.
#[derive(Debug, Clone)]
pub struct Solution {
    profile: BehaviorProfile,
    value: f64,
    creator: Creator,
}

impl Solution {
    pub fn new(profile: BehaviorProfile, value: f64, creator: Creator) -> Solution {
        Solution {
            profile,
            value,
            creator,
        }
    }

    pub fn profile(&self) -> &BehaviorProfile {
        &self.profile
    }

    /// Liapunov value at the profile.
    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn creator(&self) -> Creator {
        self.creator
    }
}

#[derive(Debug, Clone)]
pub struct LiapOutcome {
    pub solutions: Vec<Solution>,
    /// Objective evaluations over all attempts.
    pub num_evals: u64,
    /// Powell outer iterations over all attempts.
    pub num_iters: u64,
    /// Attempts made.
    pub num_tries: usize,
    /// Whether cancellation was observed.
    pub cancelled: bool,
}

impl LiapOutcome {
    pub fn found(&self) -> bool {
        !self.solutions.is_empty()
    }
}

/// Searches for equilibria of `game` by minimizing its Liapunov function,
/// first from `start` and then from random profiles.
///
/// Stops after `n_tries` attempts, once `stop_after` solutions were accepted
/// (if nonzero), or when `token` is found set after an attempt. The token is
/// cleared when observed. Finding nothing is not an error.
pub fn solve(
    game: &GameTree,
    start: &BehaviorProfile,
    params: &LiapParams,
    token: &CancellationToken,
) -> LiapResult<LiapOutcome> {
    params.validate()?;
    let shape = game.shape();
    if **start.shape() != *shape {
        return Err(LiapError::DimensionMismatch {
            expected: shape.dimension(),
            found: start.shape().dimension(),
        });
    }

    let mut func = LiapunovObjective::new(game)?;
    let mut rng = make_rng(params.seed);
    let mut point = start.inner().as_slice().to_vec();
    let mut outcome = LiapOutcome {
        solutions: vec![],
        num_evals: 0,
        num_iters: 0,
        num_tries: 0,
        cancelled: false,
    };

    for attempt in 1..=params.n_tries {
        if params.stop_after > 0 && outcome.solutions.len() >= params.stop_after {
            break;
        }
        if attempt > 1 {
            point.copy_from_slice(random_profile(&mut rng, shape.clone()).inner().as_slice());
        }

        let mut directions = DirectionMatrix::tangent(&shape);
        let result = powell(&mut point, &mut directions, &mut func, params, token)?;
        outcome.num_tries += 1;
        outcome.num_iters += result.iterations as u64;

        if params.trace >= 1 {
            info!(
                "Attempt {}: value {:e} after {} iterations, converged: {}",
                attempt, result.value, result.iterations, result.converged
            );
        }
        if result.converged {
            outcome.solutions.push(Solution::new(
                BehaviorProfile::from_vec(shape.clone(), point.clone()),
                result.value,
                Creator::Liap,
            ));
        }
        if token.take() {
            debug!("Cancellation observed after attempt {}", attempt);
            outcome.cancelled = true;
            break;
        }
    }

    outcome.num_evals = func.num_evals();
    Ok(outcome)
}

/// Draws a profile that lies exactly on every infoset's simplex. Each action
/// but the last gets a uniform draw, redrawn until the running sum stays at
/// most one; the last action takes the remainder.
pub fn random_profile<R: Rng>(rng: &mut R, shape: Arc<ProfileShape>) -> BehaviorProfile {
    let mut profile = BehaviorProfile::uniform(shape.clone());
    for (player, infoset, _) in shape.blocks() {
        let probs = profile.infoset_mut(player, infoset);
        let last = match probs.len() {
            0 => continue,
            k => k - 1,
        };
        let mut sum = 0f64;
        for prob in probs[..last].iter_mut() {
            let mut x = rng.gen::<f64>();
            while x + sum > 1.0 {
                x = rng.gen::<f64>();
            }
            *prob = x;
            sum += x;
        }
        probs[last] = 1.0 - sum;
    }
    profile
}

fn make_rng(seed: Option<u64>) -> ChaCha8Rng {
    match seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use efg_lite::game::Player;

    #[test]
    fn random_profiles_lie_on_simplex() {
        let shape = Arc::new(ProfileShape::new(vec![vec![2, 3, 5], vec![4, 8]]));
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        for _ in 0..100 {
            let profile = random_profile(&mut rng, shape.clone());
            for (player, infoset, _) in shape.blocks() {
                let probs = profile.infoset(player, infoset);
                assert_eq!(probs.iter().sum::<f64>(), 1.0);
                for p in probs {
                    assert!(0.0 <= *p && *p < 1.0);
                }
            }
        }
    }

    #[test]
    fn random_profiles_follow_seed() {
        let shape = Arc::new(ProfileShape::new(vec![vec![3], vec![2]]));
        let a = random_profile(&mut make_rng(Some(5)), shape.clone());
        let b = random_profile(&mut make_rng(Some(5)), shape.clone());
        assert_eq!(a.inner().as_slice(), b.inner().as_slice());
        assert_eq!(a.infoset(Player(1), 0).len(), 2);
    }
}
