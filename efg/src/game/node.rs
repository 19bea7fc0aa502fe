use crate::game::Player;

/// Index of a node within a `GameTree` arena.
pub type NodeId = usize;

#[derive(Debug, Clone)]
pub enum NodeKind {
    /// Leaf carrying one payoff per player.
    Terminal { payoffs: Box<[f64]> },
    /// Chance move; `probs[i]` is the probability of reaching `children[i]`.
    Chance { probs: Box<[f64]>, children: Vec<NodeId> },
    /// Decision point of `player`; `children[a]` follows action `a` of `infoset`.
    Decision {
        player: Player,
        infoset: usize,
        children: Vec<NodeId>,
    },
}

#[derive(Debug, Clone)]
pub struct Node {
    pub(crate) parent: Option<NodeId>,
    pub(crate) kind: NodeKind,
}

impl Node {
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn children(&self) -> &[NodeId] {
        match &self.kind {
            NodeKind::Terminal { .. } => &[],
            NodeKind::Chance { children, .. } => children,
            NodeKind::Decision { children, .. } => children,
        }
    }

    pub fn is_terminal(&self) -> bool {
        match self.kind {
            NodeKind::Terminal { .. } => true,
            _ => false,
        }
    }
}
