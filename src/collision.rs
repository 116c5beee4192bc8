use macroquad::prelude::*;

use crate::helpers::rects_collide;
use crate::map::TileMap;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CollisionFlags {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl CollisionFlags {
    pub fn horizontal(&self) -> bool {
        self.left || self.right
    }

    pub fn vertical(&self) -> bool {
        self.up || self.down
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

/// Clamps an already displaced rect against `candidates` on one axis.
///
/// Candidates are visited in order and each hit clamps the leading edge, so a later hit
/// overrides an earlier one. A zero delta never clamps.
pub fn clamp_axis(
    mut rect: Rect,
    delta: f32,
    axis: Axis,
    candidates: &[Rect],
    flags: &mut CollisionFlags,
) -> Rect {
    for &other in candidates {
        if !rects_collide(rect, other) {
            continue;
        }
        match axis {
            Axis::X => {
                if delta > 0.0 {
                    rect.x = other.x - rect.w;
                    flags.right = true;
                } else if delta < 0.0 {
                    rect.x = other.x + other.w;
                    flags.left = true;
                }
            }
            Axis::Y => {
                if delta > 0.0 {
                    rect.y = other.y - rect.h;
                    flags.down = true;
                } else if delta < 0.0 {
                    rect.y = other.y + other.h;
                    flags.up = true;
                }
            }
        }
    }
    rect
}

pub fn resolve_axis(
    mut rect: Rect,
    delta: f32,
    axis: Axis,
    candidates: &[Rect],
    flags: &mut CollisionFlags,
) -> Rect {
    match axis {
        Axis::X => rect.x += delta,
        Axis::Y => rect.y += delta,
    }
    clamp_axis(rect, delta, axis, candidates, flags)
}

/// Two-pass resolution against a fixed candidate set: x fully, then y.
pub fn sweep(rect: Rect, delta: Vec2, candidates: &[Rect]) -> (Rect, CollisionFlags) {
    let mut flags = CollisionFlags::default();
    let rect = resolve_axis(rect, delta.x, Axis::X, candidates, &mut flags);
    let rect = resolve_axis(rect, delta.y, Axis::Y, candidates, &mut flags);
    (rect, flags)
}

/// Moves on one axis and resolves against the solid tiles around the moved position.
pub fn move_axis(
    map: &TileMap,
    rect: Rect,
    delta: f32,
    axis: Axis,
    scratch: &mut Vec<Rect>,
    flags: &mut CollisionFlags,
) -> Rect {
    let origin = match axis {
        Axis::X => vec2(rect.x + delta, rect.y),
        Axis::Y => vec2(rect.x, rect.y + delta),
    };
    map.fill_nearby_solid_rects(origin, scratch);
    resolve_axis(rect, delta, axis, scratch, flags)
}
