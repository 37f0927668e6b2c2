//! Grid-world simulation engine.
//!
//! The evolved map is frozen into a [`WorldGrid`]. An observer driven by
//! external input and a set of autonomous creatures move on it one tick at a
//! time, and the observer only ever sees a square [`VisibilityWindow`] around
//! itself.

pub mod grid;
pub mod entity;
pub mod behavior;
pub mod window;
pub mod simulation;
pub mod export;

pub use grid::WorldGrid;
pub use entity::{Entity, SpawnRecord, VisualHandle};
pub use behavior::{behavior_for, Aggressive, Behavior, Passive, Surroundings};
pub use window::VisibilityWindow;
pub use simulation::{ObserverMove, SimulationWorld, TickReport, WorldStatus};
pub use export::{generate_batch, MapExport};
