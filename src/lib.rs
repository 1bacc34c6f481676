//! # Tennis Stats
//!
//! A REST API over a catalog of tennis players with per-country statistics.
//!
//! ## Architecture
//!
//! - **models**: Core data structures (players, countries, statistics)
//! - **calculate**: Win rate, BMI and per-country aggregates
//! - **storage**: In-memory player store and snapshot import
//! - **service**: Player use-cases over the store
//! - **api**: REST API endpoints
//! - **config**: Configuration loading and validation

pub mod api;
pub mod calculate;
pub mod config;
pub mod models;
pub mod service;
pub mod storage;

pub use models::*;
