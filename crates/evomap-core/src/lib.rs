//! Core types and utilities shared by the evomap map generator and grid-world simulation.

pub mod types;
pub mod tile;
pub mod config;
pub mod error;

pub use error::{Error, Result};
pub use types::*;
pub use tile::*;
pub use config::*;
