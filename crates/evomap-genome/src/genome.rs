//! Map genome: a rectangular grid of tile kinds.

use evomap_core::{Error, Result, TileKind};
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Draw one tile kind from the weighted map distribution
pub fn draw_tile(rng: &mut ChaCha8Rng) -> TileKind {
    let roll = rng.gen::<f64>();
    let mut cumulative = 0.0;

    for kind in TileKind::ALPHABET {
        cumulative += kind.spawn_weight();
        if roll < cumulative {
            return kind;
        }
    }

    // Rounding slack at the top of the range
    TileKind::RiverRock
}

/// Inclusive cell bounds of the forced-grass block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SafeZone {
    pub row_min: usize,
    pub row_max: usize,
    pub col_min: usize,
    pub col_max: usize,
}

impl SafeZone {
    /// Block of half-width `radius` around the grid midpoint, clipped to the grid
    pub fn centered(rows: usize, cols: usize, radius: usize) -> Self {
        let mid_row = rows / 2;
        let mid_col = cols / 2;

        Self {
            row_min: mid_row.saturating_sub(radius),
            row_max: (mid_row + radius).min(rows.saturating_sub(1)),
            col_min: mid_col.saturating_sub(radius),
            col_max: (mid_col + radius).min(cols.saturating_sub(1)),
        }
    }

    pub fn contains(&self, row: usize, col: usize) -> bool {
        (self.row_min..=self.row_max).contains(&row) && (self.col_min..=self.col_max).contains(&col)
    }

    /// Iterator over every `(row, col)` in the zone
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        (self.row_min..=self.row_max)
            .flat_map(move |row| (self.col_min..=self.col_max).map(move |col| (row, col)))
    }
}

/// One candidate map. Every transform returns a new genome.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MapGenome {
    rows: usize,
    cols: usize,
    cells: Vec<TileKind>,
}

impl MapGenome {
    /// Grid where every cell is `kind`
    pub fn filled(rows: usize, cols: usize, kind: TileKind) -> Self {
        Self {
            rows,
            cols,
            cells: vec![kind; rows * cols],
        }
    }

    /// Grid with every cell drawn independently from the map distribution
    pub fn random(rows: usize, cols: usize, rng: &mut ChaCha8Rng) -> Self {
        let cells = (0..rows * cols).map(|_| draw_tile(rng)).collect();
        Self { rows, cols, cells }
    }

    /// Build from row-major cells. `cells.len()` must equal `rows * cols`.
    pub fn from_cells(rows: usize, cols: usize, cells: Vec<TileKind>) -> Result<Self> {
        let genome = Self { rows, cols, cells };
        crate::validation::validate_genome(&genome)?;
        Ok(genome)
    }

    /// Parse symbol rows such as `"22042"`. Rows must be non-empty, equal
    /// length, and use only map symbols.
    pub fn from_rows<S: AsRef<str>>(rows: &[S]) -> Result<Self> {
        let first = rows
            .first()
            .ok_or_else(|| Error::Validation("Genome has no rows".to_string()))?;
        let cols = first.as_ref().chars().count();

        let mut cells = Vec::with_capacity(rows.len() * cols);
        for (row_idx, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            let len = row.chars().count();
            if len != cols {
                return Err(Error::Validation(format!(
                    "Row {} has {} cells, expected {}",
                    row_idx, len, cols
                )));
            }

            for (col_idx, symbol) in row.chars().enumerate() {
                let kind = TileKind::from_symbol(symbol);
                if kind == TileKind::Void {
                    return Err(Error::Validation(format!(
                        "Unknown tile symbol {:?} at row {} column {}",
                        symbol, row_idx, col_idx
                    )));
                }
                cells.push(kind);
            }
        }

        Self::from_cells(rows.len(), cols, cells)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn get(&self, row: usize, col: usize) -> Option<TileKind> {
        if row < self.rows && col < self.cols {
            Some(self.cells[row * self.cols + col])
        } else {
            None
        }
    }

    pub fn row(&self, row: usize) -> &[TileKind] {
        let start = row * self.cols;
        &self.cells[start..start + self.cols]
    }

    /// Row-major cells
    pub fn cells(&self) -> &[TileKind] {
        &self.cells
    }

    pub fn iter_rows(&self) -> impl Iterator<Item = &[TileKind]> + '_ {
        self.cells.chunks(self.cols.max(1))
    }

    /// Copy with the centered block of half-width `radius` forced to grass
    pub fn with_safe_zone(&self, radius: usize) -> Self {
        let mut child = self.clone();
        if child.is_empty() {
            return child;
        }

        let zone = SafeZone::centered(self.rows, self.cols, radius);
        for (row, col) in zone.cells() {
            child.cells[row * self.cols + col] = TileKind::Grass;
        }
        child
    }

    pub fn safe_zone(&self, radius: usize) -> SafeZone {
        SafeZone::centered(self.rows, self.cols, radius)
    }

    /// Symbol rows, the inverse of [`MapGenome::from_rows`]
    pub fn to_rows(&self) -> Vec<String> {
        self.iter_rows()
            .map(|row| row.iter().map(|kind| kind.symbol()).collect())
            .collect()
    }

    /// Serialize the genome to bytes
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(bincode::serialize(self)?)
    }

    /// Deserialize a genome from bytes, rejecting inconsistent dimensions
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let genome: MapGenome = bincode::deserialize(bytes)?;
        crate::validation::validate_genome(&genome)?;
        Ok(genome)
    }

    /// Take ownership of the cells, bypassing validation. Only for operators in this crate
    /// that preserve the shape of an already valid genome.
    pub(crate) fn from_parts(rows: usize, cols: usize, cells: Vec<TileKind>) -> Self {
        debug_assert_eq!(cells.len(), rows * cols);
        Self { rows, cols, cells }
    }
}

impl fmt::Display for MapGenome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, row) in self.to_rows().iter().enumerate() {
            if idx > 0 {
                writeln!(f)?;
            }
            f.write_str(row)?;
        }
        Ok(())
    }
}
