use std::collections::HashMap;

use crate::map::{GridIndex, Tile};

/// Orthogonal neighbor directions, as bits of a neighbor mask.
const RIGHT: u8 = 0b0001;
const LEFT: u8 = 0b0010;
const UP: u8 = 0b0100;
const DOWN: u8 = 0b1000;

const SHIFTS: [((i32, i32), u8); 4] = [
    ((1, 0), RIGHT),
    ((-1, 0), LEFT),
    ((0, -1), UP),
    ((0, 1), DOWN),
];

/// Recognized same-type neighbor sets and the variant each one selects.
const AUTOTILE_MAP: [(u8, usize); 9] = [
    (RIGHT | DOWN, 0),
    (RIGHT | DOWN | LEFT, 1),
    (LEFT | DOWN, 2),
    (LEFT | UP | DOWN, 3),
    (LEFT | UP, 4),
    (LEFT | UP | RIGHT, 5),
    (RIGHT | UP, 6),
    (RIGHT | UP | DOWN, 7),
    (RIGHT | LEFT | DOWN | UP, 8),
];

pub fn neighbor_mask(tiles: &HashMap<GridIndex, Tile>, tile: &Tile) -> u8 {
    SHIFTS
        .iter()
        .filter(|((dx, dy), _)| {
            tile.pos
                .offset(*dx, *dy)
                .and_then(|grid| tiles.get(&grid))
                .is_some_and(|other| other.kind == tile.kind)
        })
        .fold(0, |mask, (_, bit)| mask | bit)
}

pub fn variant_for(mask: u8) -> Option<usize> {
    AUTOTILE_MAP
        .iter()
        .find(|(set, _)| *set == mask)
        .map(|(_, variant)| *variant)
}

/// Computes the variant every eligible tile should carry, without touching the map.
///
/// Only tile kinds are read, so the result does not depend on iteration order and applying
/// it twice changes nothing the second time.
pub fn autotile_variants(tiles: &HashMap<GridIndex, Tile>) -> Vec<(GridIndex, usize)> {
    tiles
        .values()
        .filter(|tile| tile.kind.is_autotile())
        .filter_map(|tile| {
            variant_for(neighbor_mask(tiles, tile)).map(|variant| (tile.pos, variant))
        })
        .collect()
}
