//! Frozen 2D grid the simulation runs on.

use evomap_core::{Error, Position, Result, Tile, TileCatalog, TileKind};
use evomap_genome::MapGenome;
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// A bounded, read-only grid. Anything outside it reads as the void tile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorldGrid {
    pub width: i32,
    pub height: i32,
    tiles: Vec<TileKind>,
}

impl WorldGrid {
    /// Freeze a finished genome into the world grid
    pub fn freeze(genome: &MapGenome) -> Self {
        Self {
            width: genome.cols() as i32,
            height: genome.rows() as i32,
            tiles: genome.cells().to_vec(),
        }
    }

    /// A grid entities can be placed on: at least one cell, and a tile for every cell
    pub fn validate(&self) -> Result<()> {
        if self.width <= 0 || self.height <= 0 {
            return Err(Error::Validation(format!(
                "World grid must be non-empty, got {}x{}",
                self.width, self.height
            )));
        }

        let expected = (self.width * self.height) as usize;
        if self.tiles.len() != expected {
            return Err(Error::Validation(format!(
                "World grid has {} tiles, expected {}",
                self.tiles.len(),
                expected
            )));
        }

        Ok(())
    }

    pub fn in_bounds(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.y >= 0 && pos.x < self.width && pos.y < self.height
    }

    /// Tile at position; off-grid positions resolve to the void tile
    pub fn tile_at(&self, pos: Position) -> Tile {
        let catalog = TileCatalog::global();
        if !self.in_bounds(pos) {
            return catalog.void();
        }
        catalog.tile(self.tiles[self.pos_to_index(pos)])
    }

    /// Off-grid or not walkable
    pub fn is_blocked(&self, pos: Position) -> bool {
        !self.in_bounds(pos) || self.tile_at(pos).is_blocked()
    }

    /// Grid midpoint, `(width / 2, height / 2)`
    pub fn center(&self) -> Position {
        Position::new(self.width / 2, self.height / 2)
    }

    /// Uniformly random in-bounds position. The grid must be non-empty.
    pub fn random_position(&self, rng: &mut ChaCha8Rng) -> Position {
        let x = rng.gen_range(0..self.width);
        let y = rng.gen_range(0..self.height);
        Position::new(x, y)
    }

    fn pos_to_index(&self, pos: Position) -> usize {
        (pos.y * self.width + pos.x) as usize
    }

    /// Get position from index
    pub fn index_to_pos(&self, index: usize) -> Position {
        let x = (index as i32) % self.width;
        let y = (index as i32) / self.width;
        Position::new(x, y)
    }

    /// Iterator over all tiles with positions
    pub fn iter(&self) -> impl Iterator<Item = (Position, Tile)> + '_ {
        let catalog = TileCatalog::global();
        self.tiles
            .iter()
            .enumerate()
            .map(move |(i, kind)| (self.index_to_pos(i), catalog.tile(*kind)))
    }

    pub fn walkable_count(&self) -> usize {
        self.iter().filter(|(_, tile)| tile.walkable).count()
    }

    /// Symbol rows for export
    pub fn to_rows(&self) -> Vec<String> {
        self.tiles
            .chunks(self.width.max(1) as usize)
            .map(|row| row.iter().map(|kind| kind.symbol()).collect())
            .collect()
    }
}

impl From<&MapGenome> for WorldGrid {
    fn from(genome: &MapGenome) -> Self {
        Self::freeze(genome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(rows: &[&str]) -> WorldGrid {
        WorldGrid::freeze(&MapGenome::from_rows(rows).unwrap())
    }

    #[test]
    fn test_grid_creation() {
        let grid = grid(&["222", "204"]);
        assert_eq!(grid.width, 3);
        assert_eq!(grid.height, 2);
        assert_eq!(grid.center(), Position::new(1, 1));
        assert_eq!(grid.walkable_count(), 5);
    }

    #[test]
    fn test_empty_grid_fails_validation() {
        assert!(grid(&["22"]).validate().is_ok());

        for genome in [
            MapGenome::filled(0, 5, TileKind::Grass),
            MapGenome::filled(5, 0, TileKind::Grass),
        ] {
            let empty = WorldGrid::freeze(&genome);
            assert!(matches!(empty.validate(), Err(Error::Validation(_))));
        }
    }

    #[test]
    fn test_out_of_bounds_is_void_but_blocked() {
        let grid = grid(&["22", "22"]);
        for pos in [
            Position::new(-1, 0),
            Position::new(0, -1),
            Position::new(2, 0),
            Position::new(0, 2),
        ] {
            assert_eq!(grid.tile_at(pos).kind, TileKind::Void);
            assert!(grid.tile_at(pos).walkable);
            assert!(grid.is_blocked(pos));
        }
    }

    #[test]
    fn test_blocked_tiles() {
        let grid = grid(&["01234"]);
        assert!(grid.is_blocked(Position::new(0, 0)));
        assert!(grid.is_blocked(Position::new(1, 0)));
        assert!(!grid.is_blocked(Position::new(2, 0)));
        assert!(grid.is_blocked(Position::new(3, 0)));
        assert!(!grid.is_blocked(Position::new(4, 0)));
    }

    #[test]
    fn test_index_round_trip() {
        let grid = grid(&["2222", "2222", "2222"]);
        for (i, (pos, _)) in grid.iter().enumerate() {
            assert_eq!(grid.index_to_pos(i), pos);
            assert_eq!(grid.pos_to_index(pos), i);
        }
    }

    #[test]
    fn test_to_rows() {
        let rows = ["0123", "4222"];
        assert_eq!(grid(&rows).to_rows(), rows);
    }
}
