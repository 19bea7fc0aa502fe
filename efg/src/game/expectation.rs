use crate::game::{GameTree, NodeKind, Player};
use crate::strategy::BehaviorProfile;
use crate::vector::ActionVector;

/// Below this total reach an infoset counts as unreached and its conditional
/// payoffs are left unnormalised.
const EFFECTIVELY_ZERO: f64 = 1e-12;

impl GameTree {
    /// Probability of reaching every node when `profile` is played, chance included.
    /// Probabilities are taken as given, so an infeasible profile yields
    /// infeasible (possibly negative) reach values.
    pub fn realization_probs(&self, profile: &BehaviorProfile) -> Vec<f64> {
        self.check_shape(profile);
        let mut reach = vec![0f64; self.num_nodes()];
        reach[self.root()] = 1.0;

        // Parents precede their children, so a forward sweep is top-down.
        for node_id in 0..self.num_nodes() {
            match self.node(node_id).kind() {
                NodeKind::Terminal { .. } => {}
                NodeKind::Chance { probs, children } => {
                    for (child, prob) in children.iter().zip(probs.iter()) {
                        reach[*child] = reach[node_id] * prob;
                    }
                }
                NodeKind::Decision {
                    player,
                    infoset,
                    children,
                } => {
                    let probs = profile.infoset(*player, *infoset);
                    for (child, prob) in children.iter().zip(probs.iter()) {
                        reach[*child] = reach[node_id] * prob;
                    }
                }
            }
        }
        reach
    }

    /// Expected payoff of every player at every node under `profile`.
    /// `values[node][player]`.
    pub fn node_values(&self, profile: &BehaviorProfile) -> Vec<Vec<f64>> {
        self.check_shape(profile);
        let num_players = self.num_players();
        let mut values = vec![vec![0f64; num_players]; self.num_nodes()];

        // Children follow their parents, so a backward sweep is bottom-up.
        for node_id in (0..self.num_nodes()).rev() {
            let mut value = vec![0f64; num_players];
            match self.node(node_id).kind() {
                NodeKind::Terminal { payoffs } => value.copy_from_slice(payoffs),
                NodeKind::Chance { probs, children } => {
                    for (child, prob) in children.iter().zip(probs.iter()) {
                        for (v, c) in value.iter_mut().zip(values[*child].iter()) {
                            *v += prob * c;
                        }
                    }
                }
                NodeKind::Decision {
                    player,
                    infoset,
                    children,
                } => {
                    let probs = profile.infoset(*player, *infoset);
                    for (child, prob) in children.iter().zip(probs.iter()) {
                        for (v, c) in value.iter_mut().zip(values[*child].iter()) {
                            *v += prob * c;
                        }
                    }
                }
            }
            values[node_id] = value;
        }
        values
    }

    /// Expected payoff to the acting player of every (player, infoset, action),
    /// conditional on the infoset being reached and the action being taken,
    /// with the rest of the play following `profile`.
    ///
    /// Members of an infoset are weighted by their reach probabilities
    /// (the player's beliefs). An unreached infoset keeps the reach-weighted
    /// sums, which vanish with the reach, so no action there looks profitable
    /// and off-path play is never penalised.
    pub fn conditional_payoffs(&self, profile: &BehaviorProfile) -> ActionVector {
        let reach = self.realization_probs(profile);
        let values = self.node_values(profile);
        let mut cond_payoffs = ActionVector::from_constant(profile.shape().clone(), 0f64);

        for player in self.players() {
            for (infoset_id, infoset) in self.infosets(player).iter().enumerate() {
                let members = infoset.members();
                let infoset_prob: f64 = members.iter().map(|m| reach[*m]).sum();

                let cond = cond_payoffs.infoset_mut(player, infoset_id);
                for member in members.iter() {
                    for (c, child) in cond.iter_mut().zip(self.node(*member).children()) {
                        *c += reach[*member] * values[*child][player.index()];
                    }
                }
                if infoset_prob.abs() >= EFFECTIVELY_ZERO {
                    for c in cond.iter_mut() {
                        *c /= infoset_prob;
                    }
                }
            }
        }
        cond_payoffs
    }

    /// Expected payoff of `player` at the root.
    pub fn expected_payoff(&self, profile: &BehaviorProfile, player: Player) -> f64 {
        self.node_values(profile)[self.root()][player.index()]
    }

    fn check_shape(&self, profile: &BehaviorProfile) {
        let shape = profile.shape();
        let fits = shape.num_players() == self.num_players()
            && self.players().all(|player| {
                shape.num_infosets(player) == self.num_infosets(player)
                    && (0..self.num_infosets(player))
                        .all(|i| shape.num_actions(player, i) == self.num_actions(player, i))
            });
        assert!(fits, "Profile does not belong to this game");
    }
}

#[cfg(test)]
mod tests {
    use crate::game::game_tree::test_fixtures::*;
    use crate::game::{GameTree, Player};
    use crate::strategy::BehaviorProfile;
    use crate::vector::ProfileShape;
    use assert_approx_eq::assert_approx_eq;
    use std::sync::Arc;

    #[test]
    fn pennies_values() {
        let game = matching_pennies();
        let mut profile = BehaviorProfile::uniform(game.shape());
        profile.infoset_mut(Player(0), 0).copy_from_slice(&[0.8, 0.2]);
        profile.infoset_mut(Player(1), 0).copy_from_slice(&[0.3, 0.7]);

        let reach = game.realization_probs(&profile);
        assert_approx_eq!(reach[0], 1.0);
        assert_approx_eq!(reach[1], 0.8);
        assert_approx_eq!(reach[3], 0.8 * 0.7);

        // P(match) = 0.8 * 0.3 + 0.2 * 0.7 = 0.38.
        assert_approx_eq!(game.expected_payoff(&profile, Player(0)), 0.38 - 0.62);
        assert_approx_eq!(game.expected_payoff(&profile, Player(1)), 0.62 - 0.38);
    }

    #[test]
    fn pennies_conditional_payoffs() {
        let game = matching_pennies();
        let mut profile = BehaviorProfile::uniform(game.shape());
        profile.infoset_mut(Player(0), 0).copy_from_slice(&[0.8, 0.2]);
        profile.infoset_mut(Player(1), 0).copy_from_slice(&[0.3, 0.7]);

        let cpay = game.conditional_payoffs(&profile);
        // Heads for player 1 wins against the 0.3 heads of player 2.
        assert_approx_eq!(cpay[(Player(0), 0, 0)], 0.3 - 0.7);
        assert_approx_eq!(cpay[(Player(0), 0, 1)], 0.7 - 0.3);
        // Player 2 believes heads with probability 0.8.
        assert_approx_eq!(cpay[(Player(1), 0, 0)], -0.8 + 0.2);
        assert_approx_eq!(cpay[(Player(1), 0, 1)], 0.8 - 0.2);
    }

    #[test]
    fn unreached_infoset_has_zero_payoffs() {
        let game = matching_pennies();
        let mut profile = BehaviorProfile::uniform(game.shape());
        profile.infoset_mut(Player(0), 0).copy_from_slice(&[0.0, 0.0]);

        let reach = game.realization_probs(&profile);
        assert_approx_eq!(reach[1] + reach[4], 0.0);

        let cpay = game.conditional_payoffs(&profile);
        assert_eq!(cpay[(Player(1), 0, 0)], 0.0);
        assert_eq!(cpay[(Player(1), 0, 1)], 0.0);
    }

    #[test]
    fn chance_weights_beliefs() {
        let (game, _) = chance_then_pennies();
        let profile = BehaviorProfile::pure(game.shape(), |_, _| 0);

        let cpay = game.conditional_payoffs(&profile);
        // Copy 2 pays 2 on a match; conditional on reaching it, that is all that matters.
        assert_approx_eq!(cpay[(Player(0), 1, 0)], 2.0);
        assert_approx_eq!(cpay[(Player(0), 1, 1)], -1.0);
        assert_approx_eq!(
            game.expected_payoff(&profile, Player(0)),
            0.25 * 1.0 + 0.75 * 2.0
        );
    }

    #[test]
    #[should_panic]
    fn foreign_profile() {
        let game = matching_pennies();
        let other = GameTree::new(2);
        let profile = BehaviorProfile::uniform(other.shape());
        game.realization_probs(&profile);
    }

    #[test]
    #[should_panic]
    fn profile_with_other_action_counts() {
        let game = matching_pennies();
        let shape = Arc::new(ProfileShape::new(vec![vec![3], vec![2]]));
        game.conditional_payoffs(&BehaviorProfile::uniform(shape));
    }
}
