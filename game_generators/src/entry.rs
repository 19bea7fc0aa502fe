// Market entry. The entrant (player 1) stays out or enters; after entry both
// firms set prices simultaneously. The pricing stage is a subgame in which
// pricing low is dominant for both firms, so the entrant is better off
// staying out.

use efg_lite::game::{GameResult, GameTree, Player};
use libgt::{ChanceOrPlayer, GameTreeBuilder, GameTreeVertex, Leaf, VertexOrLeaf};

#[derive(Debug, Copy, Clone, Ord, PartialOrd, Eq, PartialEq)]
pub enum Action {
    Out,
    In,
    High,
    Low,
}

#[derive(Debug, Copy, Clone, Ord, PartialOrd, Eq, PartialEq)]
pub enum Stage {
    Entry,
    PriceEntrant,
    PriceIncumbent(Action),
}

#[derive(Debug, Copy, Clone, Ord, PartialOrd, Eq, PartialEq)]
pub struct PricingStage;

#[derive(Debug, Clone)]
pub struct State {
    stage: Stage,
}

/// Payoffs (entrant, incumbent) when staying out.
pub const OUT_PAYOFFS: [f64; 2] = [0.0, 5.0];

fn pricing_payoffs(entrant: Action, incumbent: Action) -> Vec<f64> {
    match (entrant, incumbent) {
        (Action::High, Action::High) => vec![3.0, 3.0],
        (Action::High, Action::Low) => vec![-2.0, 4.0],
        (Action::Low, Action::High) => vec![4.0, -2.0],
        (Action::Low, Action::Low) => vec![-1.0, 1.0],
        _ => panic!("Not a pricing action"),
    }
}

impl GameTreeVertex for State {
    type Action = Action;

    // The incumbent does not observe the entrant's price.
    type PlayerInfo = u8;

    type Subgame = PricingStage;

    fn next_player(&self) -> ChanceOrPlayer {
        match self.stage {
            Stage::Entry | Stage::PriceEntrant => ChanceOrPlayer::Player(Player(0)),
            Stage::PriceIncumbent(_) => ChanceOrPlayer::Player(Player(1)),
        }
    }

    fn player_information(&self) -> u8 {
        match self.stage {
            Stage::Entry => 0,
            _ => 1,
        }
    }

    fn available_actions(&self) -> Box<[(Action, f64)]> {
        match self.stage {
            Stage::Entry => vec![(Action::Out, 1.0), (Action::In, 1.0)],
            _ => vec![(Action::High, 1.0), (Action::Low, 1.0)],
        }
        .into_boxed_slice()
    }

    fn next_state(&self, action: &Action) -> VertexOrLeaf<Self> {
        match self.stage {
            Stage::Entry => match action {
                Action::Out => VertexOrLeaf::Leaf(Leaf::new(OUT_PAYOFFS.to_vec())),
                _ => VertexOrLeaf::Vertex(State {
                    stage: Stage::PriceEntrant,
                }),
            },
            Stage::PriceEntrant => VertexOrLeaf::Vertex(State {
                stage: Stage::PriceIncumbent(*action),
            }),
            Stage::PriceIncumbent(entrant) => {
                VertexOrLeaf::Leaf(Leaf::new(pricing_payoffs(entrant, *action)))
            }
        }
    }

    fn subgame(&self) -> Option<PricingStage> {
        match self.stage {
            Stage::Entry => None,
            _ => Some(PricingStage),
        }
    }
}

pub fn game() -> GameResult<GameTree> {
    GameTreeBuilder::new(2).make_game(&State {
        stage: Stage::Entry,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pricing_is_a_subgame() {
        let game = game().unwrap();
        // Entry, out leaf, entrant price, two incumbent prices with two leaves each.
        assert_eq!(game.num_nodes(), 9);
        assert_eq!(game.marked_subgame_roots(), vec![2, 0]);
        assert_eq!(game.subgame_depth(2), 1);
        assert_eq!(game.subgame_depth(3), 2);
        assert_eq!(game.infoset(Player(1), 0).members(), &[3, 6]);
    }
}
