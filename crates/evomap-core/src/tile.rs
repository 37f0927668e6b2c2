//! Tile kinds and the static tile catalog.

use serde::{Deserialize, Serialize};

/// Closed set of tile kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TileKind {
    Mountain,
    River,
    Grass,
    Rock,
    RiverRock,
    /// Anything off the grid or not in the alphabet
    Void,
}

impl TileKind {
    /// Kinds a generated map may contain, in symbol order
    pub const ALPHABET: [TileKind; 5] = [
        TileKind::Mountain,
        TileKind::River,
        TileKind::Grass,
        TileKind::Rock,
        TileKind::RiverRock,
    ];

    pub fn from_symbol(symbol: char) -> TileKind {
        match symbol {
            '0' => TileKind::Mountain,
            '1' => TileKind::River,
            '2' => TileKind::Grass,
            '3' => TileKind::Rock,
            '4' => TileKind::RiverRock,
            _ => TileKind::Void,
        }
    }

    pub fn symbol(&self) -> char {
        match self {
            TileKind::Mountain => '0',
            TileKind::River => '1',
            TileKind::Grass => '2',
            TileKind::Rock => '3',
            TileKind::RiverRock => '4',
            TileKind::Void => ' ',
        }
    }

    /// Water-bearing tiles. Only walkable ones are usable as flee targets.
    pub fn is_liquid(&self) -> bool {
        matches!(self, TileKind::River | TileKind::RiverRock)
    }

    /// Weight of this kind in the random map distribution
    pub fn spawn_weight(&self) -> f64 {
        match self {
            TileKind::Mountain => 0.05,
            TileKind::River => 0.05,
            TileKind::Grass => 0.70,
            TileKind::Rock => 0.05,
            TileKind::RiverRock => 0.15,
            TileKind::Void => 0.0,
        }
    }
}

/// Resolved tile: its kind plus movement permission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    pub kind: TileKind,
    pub walkable: bool,
}

impl Tile {
    pub const fn new(kind: TileKind, walkable: bool) -> Self {
        Self { kind, walkable }
    }

    pub fn is_blocked(&self) -> bool {
        !self.walkable
    }

    /// Walkable water a threatened passive creature will run to
    pub fn is_flee_target(&self) -> bool {
        self.walkable && self.kind.is_liquid()
    }
}

/// Immutable registry from tile kind to its walkability
#[derive(Debug)]
pub struct TileCatalog {
    mountain: Tile,
    river: Tile,
    grass: Tile,
    rock: Tile,
    river_rock: Tile,
    void: Tile,
}

/// The process-wide catalog
pub static CATALOG: TileCatalog = TileCatalog {
    mountain: Tile::new(TileKind::Mountain, false),
    river: Tile::new(TileKind::River, false),
    grass: Tile::new(TileKind::Grass, true),
    rock: Tile::new(TileKind::Rock, false),
    river_rock: Tile::new(TileKind::RiverRock, true),
    void: Tile::new(TileKind::Void, true),
};

impl TileCatalog {
    pub fn global() -> &'static TileCatalog {
        &CATALOG
    }

    /// Resolve a map symbol. Unknown symbols degrade to the void tile.
    pub fn resolve(&self, symbol: char) -> Tile {
        self.tile(TileKind::from_symbol(symbol))
    }

    pub fn tile(&self, kind: TileKind) -> Tile {
        match kind {
            TileKind::Mountain => self.mountain,
            TileKind::River => self.river,
            TileKind::Grass => self.grass,
            TileKind::Rock => self.rock,
            TileKind::RiverRock => self.river_rock,
            TileKind::Void => self.void,
        }
    }

    pub fn void(&self) -> Tile {
        self.void
    }
}
