//! **mazes** generates rectangular mazes with Wilson's algorithm, optionally adds loops,
//! solves them and saves them in a compact hex text format.

#[macro_use]
extern crate error_chain;

pub mod cells;
pub mod codec;
pub mod config;
pub mod errors;
pub mod generators;
pub mod grid;
pub mod grid_displays;
pub mod grid_iterators;
pub mod maze;
pub mod pathing;
pub mod units;
mod utils;
