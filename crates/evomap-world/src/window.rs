//! Square view of the world centered on the observer.

use crate::entity::Entity;
use crate::grid::WorldGrid;
use evomap_core::{Position, Role, Tile};
use serde::{Deserialize, Serialize};

/// Snapshot of the `(2r+1) x (2r+1)` cells around a center, plus the
/// entities standing inside them. Cells off the grid hold the void tile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VisibilityWindow {
    /// World position of the top-left cell
    pub origin: Position,
    /// Side length, always `2 * radius + 1`
    pub size: i32,
    tiles: Vec<Tile>,
    pub entities: Vec<Entity>,
}

impl VisibilityWindow {
    pub fn capture<'a>(
        grid: &WorldGrid,
        center: Position,
        radius: i32,
        entities: impl IntoIterator<Item = &'a Entity>,
    ) -> Self {
        let size = radius * 2 + 1;
        let origin = center.add(-radius, -radius);

        let mut tiles = Vec::with_capacity((size * size) as usize);
        for row in 0..size {
            for col in 0..size {
                tiles.push(grid.tile_at(origin.add(col, row)));
            }
        }

        let mut window = Self {
            origin,
            size,
            tiles,
            entities: Vec::new(),
        };
        let visible: Vec<Entity> = entities
            .into_iter()
            .filter(|entity| window.contains(entity.position))
            .cloned()
            .collect();
        window.entities = visible;
        window
    }

    /// Whether a world position falls in `[origin, origin + size)` on both axes
    pub fn contains(&self, pos: Position) -> bool {
        pos.x >= self.origin.x
            && pos.x < self.origin.x + self.size
            && pos.y >= self.origin.y
            && pos.y < self.origin.y + self.size
    }

    /// Tile at window-relative column and row
    pub fn tile(&self, col: i32, row: i32) -> Option<Tile> {
        if col < 0 || row < 0 || col >= self.size || row >= self.size {
            return None;
        }
        self.tiles.get((row * self.size + col) as usize).copied()
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    /// Window-relative cell of a world position, if visible
    pub fn to_local(&self, pos: Position) -> Option<(i32, i32)> {
        self.contains(pos)
            .then(|| (pos.x - self.origin.x, pos.y - self.origin.y))
    }

    /// Symbol rows with entities drawn over the terrain
    /// (`@` observer, `p` passive, `A` aggressive)
    pub fn render_ascii(&self) -> Vec<String> {
        let mut rows: Vec<Vec<char>> = (0..self.size)
            .map(|row| {
                (0..self.size)
                    .map(|col| self.tile(col, row).map(|t| t.kind.symbol()).unwrap_or(' '))
                    .collect()
            })
            .collect();

        for entity in &self.entities {
            if let Some((col, row)) = self.to_local(entity.position) {
                let glyph = match entity.role {
                    Role::Observer => '@',
                    Role::Passive => 'p',
                    Role::Aggressive => 'A',
                };
                rows[row as usize][col as usize] = glyph;
            }
        }

        rows.into_iter().map(|row| row.into_iter().collect()).collect()
    }
}
