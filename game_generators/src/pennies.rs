// Matching pennies. Player 1 wins one unit on a match, player 2 wins on a
// mismatch; the unique equilibrium is (1/2, 1/2) for both.

use efg_lite::game::{GameResult, GameTree, Player};
use libgt::{ChanceOrPlayer, GameTreeBuilder, GameTreeVertex, Leaf, VertexOrLeaf};

#[derive(Debug, Copy, Clone, Ord, PartialOrd, Eq, PartialEq)]
pub enum Coin {
    Heads,
    Tails,
}

#[derive(Debug, Clone)]
pub struct State {
    coin_pl1: Option<Coin>,
}

impl GameTreeVertex for State {
    type Action = Coin;

    // Player 2 never observes player 1's coin.
    type PlayerInfo = ();

    type Subgame = ();

    fn next_player(&self) -> ChanceOrPlayer {
        match self.coin_pl1 {
            None => ChanceOrPlayer::Player(Player(0)),
            Some(_) => ChanceOrPlayer::Player(Player(1)),
        }
    }

    fn player_information(&self) -> Self::PlayerInfo {}

    fn available_actions(&self) -> Box<[(Coin, f64)]> {
        vec![(Coin::Heads, 1.0), (Coin::Tails, 1.0)].into_boxed_slice()
    }

    fn next_state(&self, action: &Coin) -> VertexOrLeaf<Self> {
        match self.coin_pl1 {
            None => VertexOrLeaf::Vertex(State {
                coin_pl1: Some(*action),
            }),
            Some(coin) if coin == *action => VertexOrLeaf::Leaf(Leaf::zero_sum(1.0)),
            Some(_) => VertexOrLeaf::Leaf(Leaf::zero_sum(-1.0)),
        }
    }
}

pub fn game() -> GameResult<GameTree> {
    GameTreeBuilder::new(2).make_game(&State { coin_pl1: None })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shape() {
        let game = game().unwrap();
        assert_eq!(game.num_nodes(), 7);
        assert_eq!(game.infoset(Player(1), 0).members(), &[1, 4]);
        assert_eq!(game.marked_subgame_roots(), vec![0]);
    }
}
