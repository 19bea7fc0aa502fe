// Centipede game of perfect information. Players alternate; at stage `k`
// the mover may take, earning `k + 2` while the other earns `k`, or pass.
// If everyone passes through all stages both earn the number of stages.
// Every decision node roots its own (nested) subgame, and taking at once
// is the unique subgame-perfect play.

use efg_lite::game::{GameResult, GameTree, Player};
use libgt::{ChanceOrPlayer, GameTreeBuilder, GameTreeVertex, Leaf, VertexOrLeaf};

#[derive(Debug, Copy, Clone, Ord, PartialOrd, Eq, PartialEq)]
pub enum Action {
    Take,
    Pass,
}

#[derive(Debug, Clone)]
pub struct State {
    num_stages: usize,
    stage: usize,
}

impl State {
    pub fn initial_state(num_stages: usize) -> State {
        assert!(num_stages > 0);
        State {
            num_stages,
            stage: 0,
        }
    }

    fn mover(&self) -> Player {
        Player(self.stage % 2)
    }
}

impl GameTreeVertex for State {
    type Action = Action;

    // Perfect information: the stage identifies the node.
    type PlayerInfo = usize;

    type Subgame = usize;

    fn next_player(&self) -> ChanceOrPlayer {
        ChanceOrPlayer::Player(self.mover())
    }

    fn player_information(&self) -> usize {
        self.stage
    }

    fn available_actions(&self) -> Box<[(Action, f64)]> {
        vec![(Action::Take, 1.0), (Action::Pass, 1.0)].into_boxed_slice()
    }

    fn next_state(&self, action: &Action) -> VertexOrLeaf<Self> {
        match action {
            Action::Take => {
                let k = self.stage as f64;
                let mut payoffs = vec![k; 2];
                payoffs[self.mover().index()] = k + 2.0;
                VertexOrLeaf::Leaf(Leaf::new(payoffs))
            }
            Action::Pass if self.stage + 1 == self.num_stages => {
                VertexOrLeaf::Leaf(Leaf::new(vec![self.num_stages as f64; 2]))
            }
            Action::Pass => VertexOrLeaf::Vertex(State {
                num_stages: self.num_stages,
                stage: self.stage + 1,
            }),
        }
    }

    fn subgame(&self) -> Option<usize> {
        Some(self.stage)
    }

    fn validate(&self) {
        assert!(self.stage < self.num_stages);
    }
}

pub fn game(num_stages: usize) -> GameResult<GameTree> {
    GameTreeBuilder::new(2).make_game(&State::initial_state(num_stages))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nested_subgames() {
        let game = game(3).unwrap();
        // Decision nodes 0, 2, 4; each followed by a take leaf.
        assert_eq!(game.num_nodes(), 7);
        assert_eq!(game.marked_subgame_roots(), vec![4, 2, 0]);
        assert_eq!(game.subgame_depth(4), 2);
        assert_eq!(game.num_infosets(Player(0)), 2);
        assert_eq!(game.num_infosets(Player(1)), 1);
    }
}
