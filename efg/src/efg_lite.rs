#[macro_use]
extern crate approx;

pub mod game;
pub mod strategy;
pub mod vector;
