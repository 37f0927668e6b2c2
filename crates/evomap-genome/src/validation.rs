//! Validation for map genomes.

use crate::genome::MapGenome;
use evomap_core::{Error, Result, TileKind};

/// Validate that a genome is a well-formed, non-empty rectangle of map symbols
pub fn validate_genome(genome: &MapGenome) -> Result<()> {
    if genome.rows() == 0 || genome.cols() == 0 {
        return Err(Error::Validation(format!(
            "Genome must be non-empty, got {}x{}",
            genome.rows(),
            genome.cols()
        )));
    }

    if genome.len() != genome.rows() * genome.cols() {
        return Err(Error::Validation(format!(
            "Genome has {} cells, expected {}x{}",
            genome.len(),
            genome.rows(),
            genome.cols()
        )));
    }

    if let Some(idx) = genome.cells().iter().position(|k| *k == TileKind::Void) {
        return Err(Error::Validation(format!(
            "Genome cell {} is outside the map alphabet",
            idx
        )));
    }

    Ok(())
}

/// Validate that two genomes can be crossed
pub fn validate_parents(a: &MapGenome, b: &MapGenome) -> Result<()> {
    if a.rows() != b.rows() || a.cols() != b.cols() {
        return Err(Error::Validation(format!(
            "Parents differ in shape: {}x{} vs {}x{}",
            a.rows(),
            a.cols(),
            b.rows(),
            b.cols()
        )));
    }
    Ok(())
}
