/// Defines the main components used to specify an entire game tree.

mod builder;
mod vertex;

pub use builder::GameTreeBuilder;
pub use vertex::GameTreeVertex;
pub use vertex::Leaf;
pub use vertex::VertexOrLeaf;
