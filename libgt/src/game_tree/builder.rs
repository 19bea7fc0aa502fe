use crate::game_tree::{GameTreeVertex, Leaf, VertexOrLeaf};
use efg_lite::game::{ChanceOrPlayer, GameResult, GameTree, NodeId, Player};

use itertools::sorted;
use log::debug;
use std::collections::BTreeMap;

/// Builder for a `GameTree`. Traverses the game tree implied by a
/// `GameTreeVertex`, registers information sets the first time they are seen
/// and marks the roots of the subgames announced by the vertices.
pub struct GameTreeBuilder<T: GameTreeVertex> {
    num_players: usize,

    // Mapping from each player's information to infoset indices.
    infosets: Vec<BTreeMap<T::PlayerInfo, usize>>,

    // Mapping from subgames to the nodes rooting them.
    subgames: BTreeMap<T::Subgame, NodeId>,
}

impl<T> GameTreeBuilder<T>
where
    T: GameTreeVertex,
{
    pub fn new(num_players: usize) -> GameTreeBuilder<T> {
        GameTreeBuilder {
            num_players,
            infosets: vec![BTreeMap::new(); num_players],
            subgames: BTreeMap::new(),
        }
    }

    /// Creates a `GameTree` by starting a traversal from `initial_vertex`.
    /// Actions within a given infoset are ordered by `GameTreeVertex::Action`;
    /// chance outcomes keep the order given by the vertex.
    pub fn make_game(mut self, initial_vertex: &T) -> GameResult<GameTree> {
        let mut game = GameTree::new(self.num_players);

        // (vertex or leaf, parent node, subgame of the parent)
        let mut vertex_stack = Vec::<(VertexOrLeaf<T>, Option<NodeId>, Option<T::Subgame>)>::new();
        vertex_stack.push((VertexOrLeaf::Vertex(initial_vertex.clone()), None, None));

        while let Some((next, parent, prev_subgame)) = vertex_stack.pop() {
            let vertex = match next {
                VertexOrLeaf::Leaf(leaf) => {
                    Self::handle_leaf(&mut game, parent, leaf)?;
                    continue;
                }
                VertexOrLeaf::Vertex(vertex) => vertex,
            };
            vertex.validate();

            let (node, actions) = match vertex.next_player() {
                ChanceOrPlayer::Chance => self.handle_chance(&mut game, parent, &vertex)?,
                ChanceOrPlayer::Player(player) => {
                    self.handle_player(&mut game, parent, player, &vertex)?
                }
            };

            let subgame = vertex.subgame();
            self.check_subgame_consistency(node, &subgame, &prev_subgame);

            // Children are pushed in reverse so that they are added in action order.
            for action in actions.iter().rev() {
                vertex_stack.push((vertex.next_state(action), Some(node), subgame.clone()));
            }
        }

        game.validate()?;
        let root = game.root();
        for node in self.subgames.values() {
            if *node != root {
                game.mark_subgame(*node)?;
            }
        }
        debug!(
            "Built game with {} nodes and {} subgame roots",
            game.num_nodes(),
            game.marked_subgame_roots().len()
        );
        Ok(game)
    }

    fn handle_leaf(game: &mut GameTree, parent: Option<NodeId>, leaf: Leaf) -> GameResult<()> {
        game.add_terminal(parent, leaf.payoffs)?;
        Ok(())
    }

    fn handle_chance(
        &mut self,
        game: &mut GameTree,
        parent: Option<NodeId>,
        vertex: &T,
    ) -> GameResult<(NodeId, Vec<T::Action>)> {
        let (actions, probs): (Vec<_>, Vec<_>) = vertex.available_actions().iter().cloned().unzip();
        let node = game.add_chance(parent, probs)?;
        Ok((node, actions))
    }

    /// Adds a decision node, registering its infoset if this is the first time
    /// the player's information is encountered.
    fn handle_player(
        &mut self,
        game: &mut GameTree,
        parent: Option<NodeId>,
        player: Player,
        vertex: &T,
    ) -> GameResult<(NodeId, Vec<T::Action>)> {
        let actions: Vec<T::Action> =
            sorted(vertex.available_actions().iter().map(|p| p.0.clone())).collect();
        let cur_infoset = vertex.player_information();

        let infoset = match self
            .infosets
            .get(player.index())
            .and_then(|x| x.get(&cur_infoset))
        {
            Some(infoset) => {
                assert_eq!(
                    game.num_actions(player, *infoset),
                    actions.len(),
                    "Vertices in infoset {:?} disagree on the number of actions",
                    cur_infoset
                );
                *infoset
            }
            None => {
                let infoset = game.add_infoset(player, actions.len())?;
                self.infosets[player.index()].insert(cur_infoset, infoset);
                infoset
            }
        };

        let node = game.add_decision(parent, player, infoset)?;
        Ok((node, actions))
    }

    /// Leaving a subgame for a free vertex is impossible. A vertex whose
    /// subgame differs from its parent's roots a new subgame, which may not
    /// have been entered before.
    fn check_subgame_consistency(
        &mut self,
        node: NodeId,
        subgame_description: &Option<T::Subgame>,
        prev_subgame: &Option<T::Subgame>,
    ) {
        match (subgame_description, prev_subgame) {
            (None, None) => {}
            (None, Some(_)) => {
                panic!("Parent was in a subgame but children was not");
            }
            (Some(new_subgame), prev) => {
                if prev.as_ref() == Some(new_subgame) {
                    return;
                }
                assert!(
                    !self.subgames.contains_key(new_subgame),
                    "Subgame {:?} is entered from more than one vertex",
                    new_subgame
                );
                self.subgames.insert(new_subgame.clone(), node);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;
    use efg_lite::game::{GameError, NodeKind};
    use efg_lite::strategy::BehaviorProfile;

    /// Chance flips a biased coin, player 1 sees it and calls, player 2 does
    /// not see it and guesses. Player 1's node is a subgame only when
    /// `split` is set, and then only if player 2 is not involved.
    #[derive(Debug, Clone)]
    struct Guess {
        coin: Option<usize>,
        call: Option<usize>,
        split: bool,
        two_players: bool,
    }

    impl GameTreeVertex for Guess {
        type PlayerInfo = Option<usize>;
        type Action = usize;
        type Subgame = usize;

        fn next_player(&self) -> ChanceOrPlayer {
            match (self.coin, self.call) {
                (None, _) => ChanceOrPlayer::Chance,
                (Some(_), None) => ChanceOrPlayer::Player(Player(0)),
                (Some(_), Some(_)) => ChanceOrPlayer::Player(Player(1)),
            }
        }

        fn player_information(&self) -> Self::PlayerInfo {
            match self.call {
                None => self.coin,
                Some(_) => None,
            }
        }

        fn available_actions(&self) -> Box<[(usize, f64)]> {
            match self.coin {
                None => vec![(0, 0.3), (1, 0.7)].into_boxed_slice(),
                Some(_) => vec![(1, 1.0), (0, 1.0)].into_boxed_slice(),
            }
        }

        fn next_state(&self, action: &usize) -> VertexOrLeaf<Self> {
            let mut next = self.clone();
            match (self.coin, self.call) {
                (None, _) => next.coin = Some(*action),
                (Some(_), None) => {
                    if !self.two_players {
                        let u = if *action == self.coin.unwrap() { 1.0 } else { 0.0 };
                        return VertexOrLeaf::Leaf(Leaf::zero_sum(u));
                    }
                    next.call = Some(*action)
                }
                (Some(coin), Some(_)) => {
                    let u = if *action == coin { -1.0 } else { 1.0 };
                    return VertexOrLeaf::Leaf(Leaf::zero_sum(u));
                }
            }
            VertexOrLeaf::Vertex(next)
        }

        fn subgame(&self) -> Option<usize> {
            match (self.split, self.coin, self.call) {
                (true, Some(coin), None) => Some(coin),
                (true, Some(coin), Some(_)) => Some(coin),
                _ => None,
            }
        }
    }

    fn initial(split: bool, two_players: bool) -> Guess {
        Guess {
            coin: None,
            call: None,
            split,
            two_players,
        }
    }

    #[test]
    fn build_guess() {
        let _ = env_logger::try_init();
        let game = GameTreeBuilder::new(2)
            .make_game(&initial(false, true))
            .unwrap();

        // Chance root, two player 1 nodes, four player 2 nodes, eight leaves.
        assert_eq!(game.num_nodes(), 15);
        assert_eq!(game.num_infosets(Player(0)), 2);
        assert_eq!(game.num_infosets(Player(1)), 1);
        assert_eq!(game.infoset(Player(1), 0).members().len(), 4);
        match game.node(0).kind() {
            NodeKind::Chance { probs, .. } => assert_eq!(&probs[..], &[0.3, 0.7]),
            _ => panic!("Root should be a chance node"),
        }
        assert_eq!(game.marked_subgame_roots(), vec![0]);

        // Actions are sorted, so action 0 comes first even though it was listed last.
        let profile = BehaviorProfile::pure(game.shape(), |_, _| 0);
        assert_approx_eq!(game.expected_payoff(&profile, Player(0)), 0.3 * -1.0 + 0.7 * 1.0);
    }

    #[test]
    fn build_subgames() {
        let game = GameTreeBuilder::new(2)
            .make_game(&initial(true, false))
            .unwrap();
        assert_eq!(game.num_nodes(), 7);
        assert_eq!(game.marked_subgame_roots(), vec![1, 4, 0]);
    }

    #[test]
    fn illegal_subgame() {
        // Player 2's infoset spans both coin outcomes, so neither is a subgame.
        let err = GameTreeBuilder::new(2)
            .make_game(&initial(true, true))
            .unwrap_err();
        assert_eq!(err, GameError::IllegalSubgame { node: 1 });
    }

    #[test]
    fn unknown_player() {
        let err = GameTreeBuilder::new(1)
            .make_game(&initial(false, true))
            .unwrap_err();
        assert_eq!(err, GameError::UnknownPlayer { player: Player(1) });
    }
}
