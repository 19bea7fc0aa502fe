// Rock-paper-scissors, played sequentially with player 2 not observing
// player 1's throw. The unique equilibrium mixes uniformly.

use efg_lite::game::{GameResult, GameTree, Player};
use libgt::{ChanceOrPlayer, GameTreeBuilder, GameTreeVertex, Leaf, VertexOrLeaf};

#[derive(Debug, Clone, Ord, PartialOrd, Eq, PartialEq)]
pub struct State {
    action_pl1: Option<Action>,
}

#[derive(Debug, Clone, Ord, PartialOrd, Eq, PartialEq)]
pub enum Action {
    Rock,
    Paper,
    Scissors,
}

#[derive(Debug, Clone, Ord, PartialOrd, Eq, PartialEq)]
pub struct DummyInfo {}

#[derive(Debug, Clone, Ord, PartialOrd, Eq, PartialEq)]
pub struct DummySubgame {}

impl State {
    pub fn initial_state() -> State {
        State {
            action_pl1: Option::None,
        }
    }
}

impl GameTreeVertex for State {
    type Action = Action;

    // There is only one information set per player.
    type PlayerInfo = DummyInfo;

    type Subgame = DummySubgame;

    fn next_player(&self) -> ChanceOrPlayer {
        match self.action_pl1 {
            None => ChanceOrPlayer::Player(Player(0)),
            Some(_) => ChanceOrPlayer::Player(Player(1)),
        }
    }

    fn player_information(&self) -> Self::PlayerInfo {
        Self::PlayerInfo {}
    }

    fn available_actions(&self) -> Box<[(Self::Action, f64)]> {
        vec![
            (Action::Rock, 1.0f64),
            (Action::Scissors, 1.0f64),
            (Action::Paper, 1.0f64),
        ]
        .into_boxed_slice()
    }

    fn next_state(&self, action: &Self::Action) -> VertexOrLeaf<Self> {
        match &self.action_pl1 {
            None => VertexOrLeaf::Vertex(State {
                action_pl1: Option::Some(action.clone()),
            }),
            Some(action_pl1) => {
                let payoff_pl1 = match action_pl1 {
                    Action::Rock => match action {
                        Action::Scissors => 1.0,
                        Action::Rock => 0.0,
                        Action::Paper => -1.0,
                    },
                    Action::Paper => match action {
                        Action::Scissors => -1.0,
                        Action::Rock => 1.0,
                        Action::Paper => 0.0,
                    },
                    Action::Scissors => match action {
                        Action::Scissors => 0.0,
                        Action::Rock => -1.0,
                        Action::Paper => 1.0,
                    },
                };
                VertexOrLeaf::Leaf(Leaf::zero_sum(payoff_pl1))
            }
        }
    }
}

pub fn game() -> GameResult<GameTree> {
    GameTreeBuilder::new(2).make_game(&State::initial_state())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;
    use efg_lite::strategy::BehaviorProfile;

    #[test]
    fn uniform_is_stable() {
        let game = game().unwrap();
        assert_eq!(game.num_nodes(), 1 + 3 + 9);
        assert_eq!(game.shape().dimension(), 6);

        let profile = BehaviorProfile::uniform(game.shape());
        let cpay = game.conditional_payoffs(&profile);
        for x in cpay.as_slice() {
            assert_approx_eq!(*x, 0.0);
        }
    }

    #[test]
    fn actions_sorted() {
        let game = game().unwrap();
        // Rock < Paper < Scissors; rock against all-paper loses.
        let profile = BehaviorProfile::pure(game.shape(), |_, _| 1);
        let cpay = game.conditional_payoffs(&profile);
        assert_approx_eq!(cpay[(Player(0), 0, 0)], -1.0);
        assert_approx_eq!(cpay[(Player(0), 0, 2)], 1.0);
    }
}
