//! Core data models for the player catalog.

mod player;
mod stats;

pub use player::*;
pub use stats::*;
