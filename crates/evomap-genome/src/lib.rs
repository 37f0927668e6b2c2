//! Map genomes and the evolutionary search that produces a world grid.
//!
//! A genome is a full candidate map. The search keeps a small population,
//! scores each member by how close its walkable share is to the target,
//! carries the best two forward untouched and fills the rest with their
//! row-band offspring.

pub mod genome;
pub mod mutation;
pub mod fitness;
pub mod evolution;
pub mod validation;

pub use genome::{draw_tile, MapGenome, SafeZone};
pub use mutation::{Mutator, MutationConfig};
pub use fitness::{Coverage, FitnessEvaluator};
pub use evolution::{EvolutionOutcome, GenerationStats, MapEvolver};
pub use validation::{validate_genome, validate_parents};
