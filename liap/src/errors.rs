use efg_lite::game::{GameError, Player};
use std::fmt;

pub type LiapResult<T> = Result<T, LiapError>;

/// Failures of the solver. Non-convergence and cancellation are not errors;
/// they show up as an empty (or short) list of solutions.
#[derive(Debug, Clone, PartialEq)]
pub enum LiapError {
    /// An infoset lies below none of the subgame roots.
    UnmappedInfoset { player: Player, infoset: usize },
    /// A subgame's restricted profile does not fit the extracted subgame.
    SubgameShapeMismatch {
        subgame: usize,
        expected: usize,
        found: usize,
    },
    /// A line search was asked to move along the zero vector.
    DegenerateDirection { index: usize },
    /// Beliefs cannot be formed at an infoset without members.
    EmptyInfoset { player: Player, infoset: usize },
    DimensionMismatch { expected: usize, found: usize },
    InvalidParams(String),
    Game(GameError),
}

impl LiapError {
    /// Malformed subgame structure supplied by the game model.
    pub fn is_consistency_fault(&self) -> bool {
        match self {
            LiapError::UnmappedInfoset { .. } | LiapError::SubgameShapeMismatch { .. } => true,
            _ => false,
        }
    }

    /// Numerically pathological input, distinct from ordinary non-convergence.
    pub fn is_arithmetic_fault(&self) -> bool {
        match self {
            LiapError::DegenerateDirection { .. } | LiapError::EmptyInfoset { .. } => true,
            _ => false,
        }
    }
}

impl std::error::Error for LiapError {}

impl fmt::Display for LiapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LiapError::UnmappedInfoset { player, infoset } => write!(
                f,
                "infoset {} of {} is not below any marked subgame root",
                infoset, player
            ),
            LiapError::SubgameShapeMismatch {
                subgame,
                expected,
                found,
            } => write!(
                f,
                "subgame {} expects a profile of dimension {}, restriction has {}",
                subgame, expected, found
            ),
            LiapError::DegenerateDirection { index } => {
                write!(f, "search direction {} is the zero vector", index)
            }
            LiapError::EmptyInfoset { player, infoset } => {
                write!(f, "infoset {} of {} has no members", infoset, player)
            }
            LiapError::DimensionMismatch { expected, found } => write!(
                f,
                "dimension mismatch: expected {}, found {}",
                expected, found
            ),
            LiapError::InvalidParams(msg) => write!(f, "invalid parameters: {}", msg),
            LiapError::Game(err) => write!(f, "game error: {}", err),
        }
    }
}

impl From<GameError> for LiapError {
    fn from(err: GameError) -> LiapError {
        LiapError::Game(err)
    }
}
