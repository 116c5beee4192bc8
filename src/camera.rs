use macroquad::prelude::*;

use crate::map::TileMap;

/// Scroll position that keeps the player centered without showing past the map edges.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Camera {
    pub scroll: Vec2,
}

impl Camera {
    pub fn follow(&mut self, target: Vec2, view: Vec2, map: &TileMap) {
        let dims = map.dims();
        let extent = vec2(dims.width, dims.height) + Vec2::splat(map.tile_size());
        let max = (extent - view).max(Vec2::ZERO);
        self.scroll = (target - view * 0.5).clamp(Vec2::ZERO, max);
    }

    /// Whole-pixel render offset.
    pub fn offset(&self) -> Vec2 {
        self.scroll.floor()
    }
}
