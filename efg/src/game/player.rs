use std::fmt;

/// A (non-chance) player, identified by a zero-based index.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Player(pub usize);

impl Player {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "player {}", self.0 + 1)
    }
}

/// Indicates if the node is a chance node or a player's decision point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChanceOrPlayer {
    Player(Player),
    Chance,
}
