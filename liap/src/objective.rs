use crate::errors::{LiapError, LiapResult};
use efg_lite::game::GameTree;
use efg_lite::strategy::BehaviorProfile;

/// Penalty weight on negative probabilities.
pub const BIG1: f64 = 10000.0;
/// Penalty weight on infosets whose probabilities do not sum to one.
pub const BIG2: f64 = 100.0;

/// A scalar function of a flat point, as consumed by the minimizer.
pub trait Objective {
    fn value(&mut self, point: &[f64]) -> f64;

    /// Number of calls to `value` so far.
    fn num_evals(&self) -> u64;
}

/// Liapunov function of a game: non-negative everywhere, and zero exactly at
/// the (feasible) Nash equilibria in behavior strategies.
pub struct LiapunovObjective<'a> {
    game: &'a GameTree,
    profile: BehaviorProfile,
    num_evals: u64,
}

impl<'a> LiapunovObjective<'a> {
    pub fn new(game: &'a GameTree) -> LiapResult<LiapunovObjective<'a>> {
        for player in game.players() {
            for (infoset_id, infoset) in game.infosets(player).iter().enumerate() {
                if infoset.members().is_empty() {
                    return Err(LiapError::EmptyInfoset {
                        player,
                        infoset: infoset_id,
                    });
                }
            }
        }
        Ok(LiapunovObjective {
            game,
            profile: BehaviorProfile::uniform(game.shape()),
            num_evals: 0,
        })
    }

    pub fn dimension(&self) -> usize {
        self.profile.shape().dimension()
    }
}

impl<'a> Objective for LiapunovObjective<'a> {
    fn value(&mut self, point: &[f64]) -> f64 {
        self.num_evals += 1;
        self.profile.inner_mut().copy_from_slice(point);
        liap_value(self.game, &self.profile)
    }

    fn num_evals(&self) -> u64 {
        self.num_evals
    }
}

/// Liapunov value of `profile`, summed over every (player, infoset).
pub fn liap_value(game: &GameTree, profile: &BehaviorProfile) -> f64 {
    let cond_payoffs = game.conditional_payoffs(profile);
    let mut result = 0f64;

    for (player, infoset, _) in profile.shape().blocks() {
        let probs = profile.infoset(player, infoset);
        let cpay = cond_payoffs.infoset(player, infoset);

        let mut avg = 0f64;
        let mut sum = 0f64;
        for (x, c) in probs.iter().zip(cpay.iter()) {
            avg += x * c;
            sum += x;
            if *x < 0.0 {
                result += BIG1 * x * x;
            }
        }

        // Unexploited profitable deviations.
        for c in cpay.iter() {
            let d = (c - avg).max(0.0);
            result += d * d;
        }

        result += BIG2 * (sum - 1.0) * (sum - 1.0);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;
    use efg_lite::game::{GameTree, Player};
    use game_generators::{entry, pennies, rps};
    use lazy_static::lazy_static;

    lazy_static! {
        static ref PENNIES: GameTree = pennies::game().unwrap();
    }

    fn pennies_profile(p: f64, q: f64) -> BehaviorProfile {
        BehaviorProfile::from_vec(PENNIES.shape(), vec![p, 1.0 - p, q, 1.0 - q])
    }

    #[test]
    fn zero_at_equilibrium() {
        assert_eq!(liap_value(&PENNIES, &pennies_profile(0.5, 0.5)), 0.0);

        let game = rps::game().unwrap();
        let profile = BehaviorProfile::uniform(game.shape());
        assert_approx_eq!(liap_value(&game, &profile), 0.0);
    }

    #[test]
    fn positive_away_from_equilibrium() {
        // Player 2 always plays heads, which player 1 should match.
        let value = liap_value(&PENNIES, &pennies_profile(0.2, 1.0));
        // Player 1: c = (1, -1), avg = -0.6, deviation 1.6.
        // Player 2: c = (-0.2 + 0.8, 0.2 - 0.8) = (0.6, -0.6), avg = 0.6.
        assert_approx_eq!(value, 1.6 * 1.6);
    }

    #[test]
    fn zero_at_equilibrium_with_off_path_threat() {
        let game = entry::game().unwrap();
        // Entrant: (Out, In), then (High, Low); incumbent: (High, Low).
        // Pricing high after entry is not a best response, but staying out
        // means it is never played.
        let threat = BehaviorProfile::from_vec(game.shape(), vec![1.0, 0.0, 1.0, 0.0, 0.0, 1.0]);
        assert_eq!(liap_value(&game, &threat), 0.0);

        let perfect = BehaviorProfile::from_vec(game.shape(), vec![1.0, 0.0, 0.0, 1.0, 0.0, 1.0]);
        assert_eq!(liap_value(&game, &perfect), 0.0);

        // After entry the same pricing is exploitable: Low earns -1 over -2.
        let entered = BehaviorProfile::from_vec(game.shape(), vec![0.0, 1.0, 1.0, 0.0, 0.0, 1.0]);
        assert!(liap_value(&game, &entered) >= 1.0);
    }

    #[test]
    fn negative_probability_penalty() {
        let baseline = liap_value(&PENNIES, &pennies_profile(0.5, 0.5));
        let mut profile = pennies_profile(0.5, 0.5);
        profile.set(Player(0), 0, 0, -0.1);
        profile.set(Player(0), 0, 1, 1.1);

        let value = liap_value(&PENNIES, &profile);
        assert!(value - baseline >= BIG1 * 0.1 * 0.1);
        // Player 2 believes heads with weight -0.1 / 1.0: c = (1.2, -1.2), avg = 0.
        assert_approx_eq!(value, 100.0 + 1.2 * 1.2);
    }

    #[test]
    fn sum_penalty() {
        let profile = BehaviorProfile::from_vec(PENNIES.shape(), vec![0.5, 0.5, 0.6, 0.6]);
        // Player 1 faces c = (0, 0); player 2 faces c = (0, 0) with avg 0.
        assert_approx_eq!(liap_value(&PENNIES, &profile), BIG2 * 0.2 * 0.2);
    }

    #[test]
    fn counts_evaluations() {
        let mut objective = LiapunovObjective::new(&PENNIES).unwrap();
        assert_eq!(objective.dimension(), 4);
        let point = [0.3, 0.7, 0.9, 0.1];
        let first = objective.value(&point);
        let second = objective.value(&[0.5, 0.5, 0.5, 0.5]);
        let third = objective.value(&point);
        assert_eq!(first, third);
        assert_eq!(second, 0.0);
        assert_eq!(objective.num_evals(), 3);
    }

    #[test]
    fn non_negative_on_random_points() {
        use rand::{Rng, SeedableRng};
        use rand_chacha::ChaCha8Rng;

        let game = entry::game().unwrap();
        let shape = game.shape();
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for _ in 0..200 {
            let entries = (0..shape.dimension())
                .map(|_| rng.gen::<f64>() * 3.0 - 1.0)
                .collect();
            let profile = BehaviorProfile::from_vec(shape.clone(), entries);
            assert!(liap_value(&game, &profile) >= 0.0);
        }
    }

    #[test]
    fn empty_infoset() {
        let mut game = GameTree::new(1);
        game.add_infoset(Player(0), 2).unwrap();
        game.add_terminal(None, vec![0.0]).unwrap();
        match LiapunovObjective::new(&game) {
            Err(err) => {
                assert_eq!(
                    err,
                    LiapError::EmptyInfoset {
                        player: Player(0),
                        infoset: 0
                    }
                );
                assert!(err.is_arithmetic_fault());
            }
            Ok(_) => panic!("Expected an arithmetic fault"),
        }
    }
}
