use crate::game::{NodeId, Player};

pub type GameResult<T> = Result<T, GameError>;

/// Errors raised while assembling or querying a `GameTree`.
#[derive(Debug, Clone, PartialEq)]
pub enum GameError {
    /// A second parentless node was added.
    DuplicateRoot,
    /// A node index outside the arena.
    UnknownNode { node: NodeId },
    /// An infoset index that was never registered.
    UnknownInfoset { player: Player, infoset: usize },
    /// A player index outside `0..num_players`.
    UnknownPlayer { player: Player },
    /// A child was attached to a node whose actions are all taken, or to a leaf.
    ChildOverflow { node: NodeId },
    /// A non-terminal node has fewer children than actions.
    MissingChildren { node: NodeId, expected: usize, found: usize },
    /// Chance probabilities must be non-negative and sum to one.
    ChanceProbabilities { total: f64 },
    /// Leaves carry exactly one payoff per player.
    PayoffLength { expected: usize, found: usize },
    /// The node's subtree splits some infoset.
    IllegalSubgame { node: NodeId },
    /// An infoset was registered but never given a member node.
    EmptyInfoset { player: Player, infoset: usize },
    /// The tree has no nodes.
    EmptyTree,
}

impl std::error::Error for GameError {}

impl std::fmt::Display for GameError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GameError::DuplicateRoot => write!(f, "Game tree already has a root"),
            GameError::UnknownNode { node } => write!(f, "Unknown node {}", node),
            GameError::UnknownInfoset { player, infoset } => {
                write!(f, "Unknown infoset {} of {}", infoset, player)
            }
            GameError::UnknownPlayer { player } => write!(f, "Unknown {}", player),
            GameError::ChildOverflow { node } => {
                write!(f, "Node {} cannot take another child", node)
            }
            GameError::MissingChildren {
                node,
                expected,
                found,
            } => write!(
                f,
                "Node {} has {} children, expected {}",
                node, found, expected
            ),
            GameError::ChanceProbabilities { total } => {
                write!(f, "Chance probabilities sum to {}, expected 1", total)
            }
            GameError::PayoffLength { expected, found } => {
                write!(f, "Payoff vector has {} entries, expected {}", found, expected)
            }
            GameError::IllegalSubgame { node } => {
                write!(f, "Node {} is not the root of a subgame", node)
            }
            GameError::EmptyInfoset { player, infoset } => {
                write!(f, "Infoset {} of {} has no member nodes", infoset, player)
            }
            GameError::EmptyTree => write!(f, "Game tree has no nodes"),
        }
    }
}
