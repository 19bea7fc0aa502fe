mod errors;
mod expectation;
mod game_tree;
mod infoset;
mod node;
mod player;
mod subgame;

pub use self::errors::{GameError, GameResult};
pub use self::game_tree::GameTree;
pub use self::infoset::Infoset;
pub use self::node::{Node, NodeId, NodeKind};
pub use self::player::{ChanceOrPlayer, Player};
