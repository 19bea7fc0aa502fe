use crate::game::{GameError, GameResult, Infoset, Node, NodeId, NodeKind, Player};
use crate::vector::ProfileShape;

use std::sync::Arc;

/// An extensive-form game stored as an arena of nodes.
///
/// Nodes refer to each other by index only: every node records its parent,
/// and non-terminal nodes record their children in action order. Nodes are
/// appended after their parent, so `parent < child` holds for every edge;
/// passes that need a top-down order simply walk the arena forwards, and
/// bottom-up passes walk it backwards.
///
/// Information sets are numbered per player, in registration order. Each
/// infoset knows its member nodes; the first member is its representative.
///
/// Subgame roots are kept as marks on nodes. The root of the whole game is
/// always treated as marked.
#[derive(Debug, Clone)]
pub struct GameTree {
    num_players: usize,
    nodes: Vec<Node>,
    infosets: Vec<Vec<Infoset>>,
    marked: Vec<bool>,
}

impl GameTree {
    pub fn new(num_players: usize) -> GameTree {
        GameTree {
            num_players,
            nodes: vec![],
            infosets: vec![vec![]; num_players],
            marked: vec![],
        }
    }

    /// Registers a new information set for `player` and returns its index.
    pub fn add_infoset(&mut self, player: Player, num_actions: usize) -> GameResult<usize> {
        self.check_player(player)?;
        let infosets = &mut self.infosets[player.index()];
        infosets.push(Infoset::new(player, num_actions));
        Ok(infosets.len() - 1)
    }

    /// Adds a decision node belonging to an already registered infoset.
    pub fn add_decision(
        &mut self,
        parent: Option<NodeId>,
        player: Player,
        infoset: usize,
    ) -> GameResult<NodeId> {
        self.check_player(player)?;
        let num_actions = self
            .infosets
            .get(player.index())
            .and_then(|x| x.get(infoset))
            .map(|x| x.num_actions())
            .ok_or(GameError::UnknownInfoset { player, infoset })?;

        let node = self.push_node(
            parent,
            NodeKind::Decision {
                player,
                infoset,
                children: Vec::with_capacity(num_actions),
            },
        )?;
        self.infosets[player.index()][infoset].push_member(node);
        Ok(node)
    }

    /// Adds a chance node; its children are attached in the order of `probs`.
    pub fn add_chance(&mut self, parent: Option<NodeId>, probs: Vec<f64>) -> GameResult<NodeId> {
        let total: f64 = probs.iter().sum();
        if probs.iter().any(|p| *p < 0.0) || !abs_diff_eq!(total, 1.0, epsilon = 1e-9) {
            return Err(GameError::ChanceProbabilities { total });
        }
        let num_children = probs.len();
        self.push_node(
            parent,
            NodeKind::Chance {
                probs: probs.into_boxed_slice(),
                children: Vec::with_capacity(num_children),
            },
        )
    }

    pub fn add_terminal(&mut self, parent: Option<NodeId>, payoffs: Vec<f64>) -> GameResult<NodeId> {
        if payoffs.len() != self.num_players {
            return Err(GameError::PayoffLength {
                expected: self.num_players,
                found: payoffs.len(),
            });
        }
        self.push_node(
            parent,
            NodeKind::Terminal {
                payoffs: payoffs.into_boxed_slice(),
            },
        )
    }

    /// Checks that the tree is complete: it has a root, every non-terminal
    /// node has one child per action, and every infoset has members.
    pub fn validate(&self) -> GameResult<()> {
        if self.nodes.is_empty() {
            return Err(GameError::EmptyTree);
        }
        for (node_id, node) in self.nodes.iter().enumerate() {
            let expected = self.num_children_expected(node);
            if node.children().len() != expected {
                return Err(GameError::MissingChildren {
                    node: node_id,
                    expected,
                    found: node.children().len(),
                });
            }
        }
        for (pl, infosets) in self.infosets.iter().enumerate() {
            for (infoset_id, infoset) in infosets.iter().enumerate() {
                if infoset.members().is_empty() {
                    return Err(GameError::EmptyInfoset {
                        player: Player(pl),
                        infoset: infoset_id,
                    });
                }
            }
        }
        Ok(())
    }

    pub fn num_players(&self) -> usize {
        self.num_players
    }

    pub fn players(&self) -> impl Iterator<Item = Player> {
        (0..self.num_players).map(Player)
    }

    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// The root is always the first node added.
    pub fn root(&self) -> NodeId {
        assert!(!self.nodes.is_empty(), "Game tree has no root yet");
        0
    }

    pub fn node(&self, node: NodeId) -> &Node {
        &self.nodes[node]
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes[node].parent
    }

    pub fn num_infosets(&self, player: Player) -> usize {
        self.infosets[player.index()].len()
    }

    pub fn infoset(&self, player: Player, infoset: usize) -> &Infoset {
        &self.infosets[player.index()][infoset]
    }

    pub fn infosets(&self, player: Player) -> &[Infoset] {
        &self.infosets[player.index()]
    }

    pub fn num_actions(&self, player: Player, infoset: usize) -> usize {
        self.infosets[player.index()][infoset].num_actions()
    }

    /// Layout of behavior profiles over this game.
    pub fn shape(&self) -> Arc<ProfileShape> {
        Arc::new(ProfileShape::new(
            self.infosets
                .iter()
                .map(|infosets| infosets.iter().map(|x| x.num_actions()).collect())
                .collect(),
        ))
    }

    /// Whether `ancestor` lies on the path from the root to `node` (inclusive).
    pub fn is_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut cur = Some(node);
        while let Some(n) = cur {
            if n == ancestor {
                return true;
            }
            // Ancestors always carry smaller indices.
            if n < ancestor {
                return false;
            }
            cur = self.nodes[n].parent;
        }
        false
    }

    pub(crate) fn is_marked(&self, node: NodeId) -> bool {
        node == self.root() || self.marked[node]
    }

    pub(crate) fn set_marked(&mut self, node: NodeId, value: bool) {
        self.marked[node] = value;
    }

    fn check_player(&self, player: Player) -> GameResult<()> {
        if player.index() < self.num_players {
            Ok(())
        } else {
            Err(GameError::UnknownPlayer { player })
        }
    }

    fn num_children_expected(&self, node: &Node) -> usize {
        match &node.kind {
            NodeKind::Terminal { .. } => 0,
            NodeKind::Chance { probs, .. } => probs.len(),
            NodeKind::Decision {
                player, infoset, ..
            } => self.num_actions(*player, *infoset),
        }
    }

    fn push_node(&mut self, parent: Option<NodeId>, kind: NodeKind) -> GameResult<NodeId> {
        let node_id = self.nodes.len();
        match parent {
            None => {
                if !self.nodes.is_empty() {
                    return Err(GameError::DuplicateRoot);
                }
            }
            Some(parent_id) => {
                let expected = match self.nodes.get(parent_id) {
                    Some(parent_node) => self.num_children_expected(parent_node),
                    None => return Err(GameError::UnknownNode { node: parent_id }),
                };
                let children = match &mut self.nodes[parent_id].kind {
                    NodeKind::Terminal { .. } => {
                        return Err(GameError::ChildOverflow { node: parent_id })
                    }
                    NodeKind::Chance { children, .. } => children,
                    NodeKind::Decision { children, .. } => children,
                };
                if children.len() >= expected {
                    return Err(GameError::ChildOverflow { node: parent_id });
                }
                children.push(node_id);
            }
        }

        self.nodes.push(Node { parent, kind });
        self.marked.push(false);
        Ok(node_id)
    }
}

#[cfg(test)]
pub mod test_fixtures {
    use crate::game::{GameTree, NodeId, Player};

    /// Matching pennies as a sequential tree: player 1 moves first, player 2
    /// moves without observing the choice. Player 1 wins on a match.
    pub fn matching_pennies() -> GameTree {
        let mut game = GameTree::new(2);
        let iset_pl1 = game.add_infoset(Player(0), 2).unwrap();
        let iset_pl2 = game.add_infoset(Player(1), 2).unwrap();
        let root = game.add_decision(None, Player(0), iset_pl1).unwrap();
        for a in 0..2 {
            let node = game.add_decision(Some(root), Player(1), iset_pl2).unwrap();
            for b in 0..2 {
                let u = if a == b { 1.0 } else { -1.0 };
                game.add_terminal(Some(node), vec![u, -u]).unwrap();
            }
        }
        game.validate().unwrap();
        game
    }

    /// Chance picks one of two copies of matching pennies with probabilities
    /// 1/4 and 3/4; each copy is its own subgame. Returns the game and the two
    /// copy roots.
    pub fn chance_then_pennies() -> (GameTree, Vec<NodeId>) {
        let mut game = GameTree::new(2);
        let root = game.add_chance(None, vec![0.25, 0.75]).unwrap();
        let mut copies = vec![];
        for copy in 0..2 {
            let iset_pl1 = game.add_infoset(Player(0), 2).unwrap();
            let iset_pl2 = game.add_infoset(Player(1), 2).unwrap();
            let node = game.add_decision(Some(root), Player(0), iset_pl1).unwrap();
            copies.push(node);
            for a in 0..2 {
                let reply = game.add_decision(Some(node), Player(1), iset_pl2).unwrap();
                for b in 0..2 {
                    let u = if a == b { 1.0 + copy as f64 } else { -1.0 };
                    game.add_terminal(Some(reply), vec![u, -u]).unwrap();
                }
            }
        }
        game.validate().unwrap();
        (game, copies)
    }
}
