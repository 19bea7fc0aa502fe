// Nash equilibria of extensive-form games by minimizing a Liapunov function
// over behavior profiles with Powell's method, with random restarts and an
// optional subgame-by-subgame decomposition.

extern crate efg_lite;

pub mod driver;
pub mod errors;
pub mod line_search;
pub mod objective;
pub mod params;
pub mod powell;
pub mod status;
pub mod subgame;

pub use driver::{random_profile, solve, Creator, LiapOutcome, Solution};
pub use errors::{LiapError, LiapResult};
pub use objective::{liap_value, LiapunovObjective, Objective};
pub use params::LiapParams;
pub use powell::{powell, DirectionMatrix, PowellOutcome};
pub use status::CancellationToken;
pub use subgame::{solve_decomposed, DecomposedOutcome, SubgameDecomposer, SubgameMap};
