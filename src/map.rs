use std::collections::HashMap;
use std::fmt;

use macroquad::prelude::*;
use serde::{Deserialize, Serialize};

use crate::autotile::autotile_variants;
use crate::helpers::{floor_div, rect_contains};
use crate::render::Canvas;

/// Cells checked around a position by [`TileMap::nearby_solid_rects`], in scan order.
pub const NEIGHBOR_OFFSETS: [(i32, i32); 9] = [
    (-1, 0),
    (-1, -1),
    (0, -1),
    (1, -1),
    (1, 0),
    (0, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GridIndex {
    pub x: i32,
    pub y: i32,
}

impl GridIndex {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn from_world(position: Vec2, tile_size: f32) -> Self {
        Self {
            x: floor_div(position.x, tile_size),
            y: floor_div(position.y, tile_size),
        }
    }

    /// Neighboring cell, or `None` past the edge of the `i32` key space.
    pub fn offset(self, dx: i32, dy: i32) -> Option<Self> {
        Some(Self::new(self.x.checked_add(dx)?, self.y.checked_add(dy)?))
    }

    pub fn to_world(self, tile_size: f32) -> Vec2 {
        vec2(self.x as f32 * tile_size, self.y as f32 * tile_size)
    }

    pub fn key(self) -> String {
        self.to_string()
    }

    pub fn parse_key(key: &str) -> Option<Self> {
        let (x, y) = key.split_once(';')?;
        Some(Self::new(x.trim().parse().ok()?, y.trim().parse().ok()?))
    }
}

impl fmt::Display for GridIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{};{}", self.x, self.y)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TileKind {
    Grass,
    Stone,
    Dungeon,
    Decor,
    LargeDecor,
    Spawners,
    Other(String),
}

impl TileKind {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Grass => "grass",
            Self::Stone => "stone",
            Self::Dungeon => "dungeon",
            Self::Decor => "decor",
            Self::LargeDecor => "large_decor",
            Self::Spawners => "spawners",
            Self::Other(name) => name,
        }
    }

    /// Participates in collision queries.
    pub fn is_solid(&self) -> bool {
        matches!(self, Self::Grass | Self::Stone | Self::Dungeon)
    }

    pub fn is_autotile(&self) -> bool {
        matches!(self, Self::Grass | Self::Stone | Self::Dungeon)
    }
}

impl From<String> for TileKind {
    fn from(value: String) -> Self {
        match value.as_str() {
            "grass" => Self::Grass,
            "stone" => Self::Stone,
            "dungeon" => Self::Dungeon,
            "decor" => Self::Decor,
            "large_decor" => Self::LargeDecor,
            "spawners" => Self::Spawners,
            _ => Self::Other(value),
        }
    }
}

impl From<&str> for TileKind {
    fn from(value: &str) -> Self {
        Self::from(value.to_string())
    }
}

impl From<TileKind> for String {
    fn from(value: TileKind) -> Self {
        value.as_str().to_string()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Tile {
    pub kind: TileKind,
    pub variant: usize,
    pub pos: GridIndex,
}

/// Freely placed decoration, anchored at a world position and never solid.
#[derive(Clone, Debug, PartialEq)]
pub struct OffgridTile {
    pub kind: TileKind,
    pub variant: usize,
    pub pos: Vec2,
}

/// A tile pulled out of either layer by [`TileMap::extract`], in world units.
#[derive(Clone, Debug, PartialEq)]
pub struct Placed {
    pub kind: TileKind,
    pub variant: usize,
    pub pos: Vec2,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MapDims {
    #[serde(rename = "map_width")]
    pub width: f32,
    #[serde(rename = "map_height")]
    pub height: f32,
}

#[derive(Clone, Debug)]
pub struct TileMap {
    tile_size: f32,
    tiles: HashMap<GridIndex, Tile>,
    offgrid: Vec<OffgridTile>,
    dims: MapDims,
}

impl TileMap {
    pub fn new(tile_size: f32) -> Self {
        debug_assert!(tile_size.is_finite() && tile_size > 0.0, "tile size must be positive");
        let tile_size = if tile_size.is_finite() && tile_size > 0.0 { tile_size } else { 1.0 };
        Self {
            tile_size,
            tiles: HashMap::new(),
            offgrid: Vec::new(),
            dims: MapDims::default(),
        }
    }

    pub(crate) fn from_parts(
        tile_size: f32,
        tiles: Vec<Tile>,
        offgrid: Vec<OffgridTile>,
        dims: MapDims,
    ) -> Self {
        let mut map = Self::new(tile_size);
        map.tiles = tiles.into_iter().map(|tile| (tile.pos, tile)).collect();
        map.offgrid = offgrid;
        map.dims = dims;
        map
    }

    pub fn tile_size(&self) -> f32 {
        self.tile_size
    }

    pub fn dims(&self) -> MapDims {
        self.dims
    }

    pub fn tile_count(&self) -> usize {
        self.tiles.len()
    }

    pub fn tiles(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.values()
    }

    pub fn offgrid(&self) -> &[OffgridTile] {
        &self.offgrid
    }

    pub fn grid_index(&self, position: Vec2) -> GridIndex {
        GridIndex::from_world(position, self.tile_size)
    }

    pub fn grid_to_world(&self, grid: GridIndex) -> Vec2 {
        grid.to_world(self.tile_size)
    }

    pub fn tile_bounds(&self, grid: GridIndex) -> Rect {
        let origin = self.grid_to_world(grid);
        Rect::new(origin.x, origin.y, self.tile_size, self.tile_size)
    }

    pub fn tile(&self, grid: GridIndex) -> Option<&Tile> {
        self.tiles.get(&grid)
    }

    pub fn tile_at(&self, position: Vec2) -> Option<&Tile> {
        self.tile(self.grid_index(position))
    }

    /// Tile under `position` when it is solid.
    pub fn solid_check(&self, position: Vec2) -> Option<&Tile> {
        self.tile_at(position).filter(|tile| tile.kind.is_solid())
    }

    pub fn place(&mut self, grid: GridIndex, kind: TileKind, variant: usize) {
        let origin = self.grid_to_world(grid);
        self.dims.width = self.dims.width.max(origin.x);
        self.dims.height = self.dims.height.max(origin.y);
        self.tiles.insert(grid, Tile { kind, variant, pos: grid });
    }

    pub fn place_offgrid(&mut self, kind: TileKind, variant: usize, pos: Vec2) {
        self.offgrid.push(OffgridTile { kind, variant, pos });
    }

    pub fn erase(&mut self, grid: GridIndex) -> Option<Tile> {
        self.tiles.remove(&grid)
    }

    /// Removes every off-grid tile anchored inside `area`.
    pub fn erase_offgrid(&mut self, area: Rect) -> usize {
        let before = self.offgrid.len();
        self.offgrid.retain(|tile| !rect_contains(area, tile.pos));
        before - self.offgrid.len()
    }

    /// Collects tiles matching any `(kind, variant)` pair, off-grid layer first.
    ///
    /// Grid matches come back in grid order with their position scaled to world units.
    /// With `keep == false` every match is removed from its layer.
    pub fn extract(&mut self, pairs: &[(TileKind, usize)], keep: bool) -> Vec<Placed> {
        let matches = |kind: &TileKind, variant: usize| {
            pairs.iter().any(|(k, v)| k == kind && *v == variant)
        };

        let mut out: Vec<Placed> = self
            .offgrid
            .iter()
            .filter(|tile| matches(&tile.kind, tile.variant))
            .map(|tile| Placed {
                kind: tile.kind.clone(),
                variant: tile.variant,
                pos: tile.pos,
            })
            .collect();

        let mut grid_hits: Vec<GridIndex> = self
            .tiles
            .values()
            .filter(|tile| matches(&tile.kind, tile.variant))
            .map(|tile| tile.pos)
            .collect();
        grid_hits.sort_unstable();

        for grid in &grid_hits {
            if let Some(tile) = self.tiles.get(grid) {
                out.push(Placed {
                    kind: tile.kind.clone(),
                    variant: tile.variant,
                    pos: self.grid_to_world(*grid),
                });
            }
        }

        if !keep {
            self.offgrid.retain(|tile| !matches(&tile.kind, tile.variant));
            for grid in &grid_hits {
                self.tiles.remove(grid);
            }
        }

        out
    }

    pub fn nearby_solid_rects(&self, position: Vec2) -> Vec<Rect> {
        let mut rects = Vec::with_capacity(NEIGHBOR_OFFSETS.len());
        self.fill_nearby_solid_rects(position, &mut rects);
        rects
    }

    pub fn fill_nearby_solid_rects(&self, position: Vec2, out: &mut Vec<Rect>) {
        out.clear();
        let center = self.grid_index(position);
        for &(dx, dy) in &NEIGHBOR_OFFSETS {
            let Some(grid) = center.offset(dx, dy) else {
                continue;
            };
            if let Some(tile) = self.tiles.get(&grid) {
                if tile.kind.is_solid() {
                    out.push(self.tile_bounds(tile.pos));
                }
            }
        }
    }

    pub fn autotile(&mut self) -> usize {
        let updates = autotile_variants(&self.tiles);
        let mut changed = 0;
        for (grid, variant) in updates {
            if let Some(tile) = self.tiles.get_mut(&grid) {
                if tile.variant != variant {
                    tile.variant = variant;
                    changed += 1;
                }
            }
        }
        changed
    }

    pub fn render(&self, canvas: &mut dyn Canvas, offset: Vec2) {
        for tile in &self.offgrid {
            canvas.draw_sprite(tile.kind.as_str(), tile.variant, tile.pos - offset, false);
        }

        let view = canvas.view_size();
        let start = self.grid_index(offset);
        let end = self.grid_index(offset + view);
        for x in start.x..=end.x {
            for y in start.y..=end.y {
                if let Some(tile) = self.tiles.get(&GridIndex::new(x, y)) {
                    let pos = self.grid_to_world(tile.pos) - offset;
                    canvas.draw_sprite(tile.kind.as_str(), tile.variant, pos, false);
                }
            }
        }
    }
}
