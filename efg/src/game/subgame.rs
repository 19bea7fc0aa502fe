use crate::game::{GameError, GameResult, GameTree, NodeId, NodeKind, Player};
use log::debug;
use std::collections::{BTreeMap, BTreeSet};

impl GameTree {
    /// Whether `node` can root a subgame: every infoset with a member inside
    /// the subtree below `node` has all of its members inside it.
    pub fn is_legal_subgame_root(&self, node: NodeId) -> bool {
        if node >= self.num_nodes() || self.node(node).is_terminal() {
            return false;
        }
        self.subtree(node).into_iter().all(|n| match self.node(n).kind() {
            NodeKind::Decision {
                player, infoset, ..
            } => self
                .infoset(*player, *infoset)
                .members()
                .iter()
                .all(|m| self.is_ancestor(node, *m)),
            _ => true,
        })
    }

    pub fn mark_subgame(&mut self, node: NodeId) -> GameResult<()> {
        if node >= self.num_nodes() {
            return Err(GameError::UnknownNode { node });
        }
        if !self.is_legal_subgame_root(node) {
            return Err(GameError::IllegalSubgame { node });
        }
        self.set_marked(node, true);
        Ok(())
    }

    /// Removes a mark. The root of the game stays a subgame root regardless.
    pub fn unmark_subgame(&mut self, node: NodeId) -> GameResult<()> {
        if node >= self.num_nodes() {
            return Err(GameError::UnknownNode { node });
        }
        self.set_marked(node, false);
        Ok(())
    }

    /// Marks every legal subgame root in the tree and returns how many nodes
    /// are marked afterwards, the game root included.
    pub fn mark_all_subgames(&mut self) -> usize {
        for node in 0..self.num_nodes() {
            if self.is_legal_subgame_root(node) {
                self.set_marked(node, true);
            }
        }
        let count = (0..self.num_nodes()).filter(|n| self.is_marked(*n)).count();
        debug!("{} of {} nodes marked as subgame roots", count, self.num_nodes());
        count
    }

    /// Marked subgame roots in post-order: a nested root always precedes the
    /// roots enclosing it, and the root of the game comes last.
    pub fn marked_subgame_roots(&self) -> Vec<NodeId> {
        let mut roots = vec![];
        if self.num_nodes() == 0 {
            return roots;
        }

        // (node, whether its children were already pushed)
        let mut stack = vec![(self.root(), false)];
        while let Some((node, expanded)) = stack.pop() {
            if expanded {
                if self.is_marked(node) {
                    roots.push(node);
                }
                continue;
            }
            stack.push((node, true));
            for child in self.node(node).children().iter().rev() {
                stack.push((*child, false));
            }
        }
        roots
    }

    /// Number of marked subgame roots strictly above `node`.
    pub fn subgame_depth(&self, node: NodeId) -> usize {
        let mut depth = 0;
        let mut cur = self.parent(node);
        while let Some(n) = cur {
            if self.is_marked(n) {
                depth += 1;
            }
            cur = self.parent(n);
        }
        depth
    }

    /// Copies the subtree below `root` into a standalone game.
    ///
    /// Every node listed in `cuts` is replaced by a terminal node carrying the
    /// given payoffs, and nothing below it is copied. Infosets are renumbered
    /// per player, keeping their relative order, and children keep their
    /// action order. Marks on copied nodes are carried over.
    pub fn extract_subgame(
        &self,
        root: NodeId,
        cuts: &BTreeMap<NodeId, Vec<f64>>,
    ) -> GameResult<GameTree> {
        if root >= self.num_nodes() {
            return Err(GameError::UnknownNode { node: root });
        }
        if !self.is_legal_subgame_root(root) {
            return Err(GameError::IllegalSubgame { node: root });
        }

        // Collect the infosets that survive the cuts.
        let mut kept: Vec<BTreeSet<usize>> = vec![BTreeSet::new(); self.num_players()];
        let mut stack = vec![root];
        while let Some(node) = stack.pop() {
            if cuts.contains_key(&node) {
                continue;
            }
            if let NodeKind::Decision {
                player, infoset, ..
            } = self.node(node).kind()
            {
                kept[player.index()].insert(*infoset);
            }
            stack.extend(self.node(node).children().iter().cloned());
        }

        let mut game = GameTree::new(self.num_players());
        let mut infoset_map: Vec<BTreeMap<usize, usize>> = vec![BTreeMap::new(); self.num_players()];
        for (pl, infosets) in kept.iter().enumerate() {
            for old_id in infosets.iter() {
                let num_actions = self.num_actions(Player(pl), *old_id);
                let new_id = game.add_infoset(Player(pl), num_actions)?;
                infoset_map[pl].insert(*old_id, new_id);
            }
        }

        // Pre-order copy; children are pushed in reverse to be added in order.
        let mut stack: Vec<(NodeId, Option<NodeId>)> = vec![(root, None)];
        while let Some((node, new_parent)) = stack.pop() {
            let new_node = match cuts.get(&node) {
                Some(payoffs) => {
                    game.add_terminal(new_parent, payoffs.clone())?;
                    continue;
                }
                None => match self.node(node).kind() {
                    NodeKind::Terminal { payoffs } => {
                        game.add_terminal(new_parent, payoffs.to_vec())?;
                        continue;
                    }
                    NodeKind::Chance { probs, .. } => game.add_chance(new_parent, probs.to_vec())?,
                    NodeKind::Decision {
                        player, infoset, ..
                    } => game.add_decision(
                        new_parent,
                        *player,
                        infoset_map[player.index()][infoset],
                    )?,
                },
            };
            if node != root && self.is_marked(node) {
                game.set_marked(new_node, true);
            }
            for child in self.node(node).children().iter().rev() {
                stack.push((*child, Some(new_node)));
            }
        }

        game.validate()?;
        Ok(game)
    }

    fn subtree(&self, node: NodeId) -> Vec<NodeId> {
        let mut nodes = vec![];
        let mut stack = vec![node];
        while let Some(n) = stack.pop() {
            nodes.push(n);
            stack.extend(self.node(n).children().iter().cloned());
        }
        nodes
    }
}
