use crate::game::{NodeId, Player};

/// An information set: the decision nodes its owner cannot tell apart.
/// Every member offers the same number of actions.
#[derive(Debug, Clone)]
pub struct Infoset {
    player: Player,
    num_actions: usize,
    members: Vec<NodeId>,
}

impl Infoset {
    pub fn new(player: Player, num_actions: usize) -> Infoset {
        Infoset {
            player,
            num_actions,
            members: vec![],
        }
    }

    pub fn player(&self) -> Player {
        self.player
    }

    pub fn num_actions(&self) -> usize {
        self.num_actions
    }

    pub fn members(&self) -> &[NodeId] {
        &self.members
    }

    /// First member in construction order, used to locate the infoset in the tree.
    pub fn representative(&self) -> Option<NodeId> {
        self.members.first().cloned()
    }

    pub(crate) fn push_member(&mut self, node: NodeId) {
        self.members.push(node);
    }
}
