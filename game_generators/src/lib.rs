// Small reference games, built through `libgt::GameTreeBuilder`.

extern crate efg_lite;
extern crate libgt;

pub mod centipede;
pub mod entry;
pub mod pennies;
pub mod rps;
