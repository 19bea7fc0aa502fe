mod action_vector;
mod shape;

pub use self::action_vector::ActionVector;
pub use self::shape::ProfileShape;
