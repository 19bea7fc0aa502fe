// (LIB)rary for (G)ame (T)rees.
// Game generators describe a game implicitly through `GameTreeVertex`; the
// builder walks that description and produces an explicit `GameTree`.

extern crate efg_lite;

pub mod game_tree;

pub use efg_lite::game::ChanceOrPlayer;
pub use game_tree::{GameTreeBuilder, GameTreeVertex, Leaf, VertexOrLeaf};
