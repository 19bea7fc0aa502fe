use efg_lite::game::ChanceOrPlayer;
use std::fmt::Debug;

/// `GameTreeVertex` is the main trait that should be implemented by the game generator.
/// The game generator implicitly defines a game tree based on the implemented functions.
pub trait GameTreeVertex
where
    Self: Debug + Clone,
{
    // Information set for a given state (assuming its a player's move).
    // Two vertices of the same player with equal `PlayerInfo` share an infoset.
    type PlayerInfo: Eq + Ord + Debug + Clone;

    // Actions which could be taken. These could be either from a player's move or chance.
    type Action: Eq + Ord + Debug + Clone;

    // Description of a subgame. If there are no subgames, one still has to
    // define a dummy type in the implementation, e.g.,
    // type Subgame = usize;
    type Subgame: Eq + Ord + Debug + Clone;

    fn next_player(&self) -> ChanceOrPlayer;
    fn player_information(&self) -> Self::PlayerInfo;

    /// Actions paired with their probabilities. Probabilities are only read
    /// at chance vertices.
    fn available_actions(&self) -> Box<[(Self::Action, f64)]>;
    fn next_state(&self, action: &Self::Action) -> VertexOrLeaf<Self>;

    /// Return subgame that the vertex belongs to, and None if the vertex is not
    /// in a subgame. A vertex whose subgame differs from its parent's starts a
    /// new (possibly nested) subgame.
    fn subgame(&self) -> Option<Self::Subgame> {
        None
    }

    /// Used for sanity checks during tree traversals. Can possibly panic when
    /// we reach an impossible state.
    fn validate(&self) {}
}

/// Indicates if we are at a vertex (chance or player) or a leaf (terminal) vertex.
pub enum VertexOrLeaf<T: GameTreeVertex> {
    Leaf(Leaf),
    Vertex(T),
}

/// Payoffs at a terminal state, one per player. Chance factors are not folded
/// in; the game tree keeps chance nodes explicitly.
#[derive(Clone, Debug, PartialEq)]
pub struct Leaf {
    pub payoffs: Vec<f64>,
}

impl Leaf {
    pub fn new(payoffs: Vec<f64>) -> Leaf {
        Leaf { payoffs }
    }

    /// Leaf of a two-player zero-sum game.
    pub fn zero_sum(payoff_pl1: f64) -> Leaf {
        Leaf {
            payoffs: vec![payoff_pl1, -payoff_pl1],
        }
    }
}
