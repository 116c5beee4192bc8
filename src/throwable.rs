use macroquad::prelude::*;

use crate::animation::{Animation, AnimationLibrary};
use crate::config::{ExplosionConfig, ThrowableConfig};
use crate::helpers::{rect_center, rects_collide};
use crate::map::TileMap;
use crate::render::Canvas;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ThrowOutcome {
    Flying,
    Detonated,
    OutOfBounds,
}

/// Which face of a tile the throwable struck.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Contact {
    Floor,
    Ceiling,
    WallOnRight,
    WallOnLeft,
}

/// Dominant axis of the center-to-center offset picks the face.
fn contact_side(body: Rect, tile: Rect) -> Contact {
    let delta = rect_center(tile) - rect_center(body);
    if delta.x.abs() > delta.y.abs() {
        if delta.x > 0.0 {
            Contact::WallOnRight
        } else {
            Contact::WallOnLeft
        }
    } else if delta.y > 0.0 {
        Contact::Floor
    } else {
        Contact::Ceiling
    }
}

#[derive(Clone, Debug)]
pub struct Throwable {
    pub pos: Vec2,
    pub velocity: Vec2,
    pub size: f32,
    pub flip: bool,
    pub fuse: u32,
    animation: Animation,
}

impl Throwable {
    pub fn grenade(
        pos: Vec2,
        cfg: &ThrowableConfig,
        flip: bool,
        animations: &AnimationLibrary,
    ) -> Self {
        let vx = if flip { -cfg.velocity[0] } else { cfg.velocity[0] };
        Self {
            pos,
            velocity: vec2(vx, cfg.velocity[1]),
            size: cfg.size,
            flip,
            fuse: cfg.fuse,
            animation: animations.animation("throwable/grenade"),
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.pos.x, self.pos.y, self.size, self.size)
    }

    /// `bounds` is the far corner of the playable area; the near edge is the origin.
    pub fn update(&mut self, map: &TileMap, cfg: &ThrowableConfig, bounds: Vec2) -> ThrowOutcome {
        self.pos += self.velocity;

        for tile in map.nearby_solid_rects(self.pos) {
            let body = self.rect();
            if !rects_collide(body, tile) {
                continue;
            }
            match contact_side(body, tile) {
                Contact::Floor => {
                    self.pos.y = tile.y - self.size;
                    self.velocity.y *= -cfg.bounce;
                }
                Contact::Ceiling => {
                    self.pos.y = tile.bottom();
                    self.velocity.y = 0.0;
                }
                Contact::WallOnRight => {
                    self.pos.x = tile.x - self.size;
                    self.velocity.x *= -cfg.bounce;
                }
                Contact::WallOnLeft => {
                    self.pos.x = tile.right();
                    self.velocity.x *= -cfg.bounce;
                }
            }
        }

        let far = self.pos + Vec2::splat(self.size);
        if self.pos.x <= 0.0 || far.x >= bounds.x || far.y >= bounds.y {
            return ThrowOutcome::OutOfBounds;
        }

        self.velocity.y += cfg.gravity;
        self.animation.update();

        if self.fuse == 0 {
            return ThrowOutcome::Detonated;
        }
        self.fuse -= 1;
        ThrowOutcome::Flying
    }

    pub fn render(&self, canvas: &mut dyn Canvas, offset: Vec2) {
        canvas.draw_sprite(
            "throwable/grenade",
            self.animation.frame_index(),
            self.pos - offset,
            self.flip,
        );
    }
}

/// Far corner past which throwables are discarded.
pub fn throw_bounds(map: &TileMap, view: Vec2, size: f32) -> Vec2 {
    let dims = map.dims();
    vec2((dims.width + size).max(view.x), dims.height.max(view.y))
}

/// Blast area anchored up and to the left of the detonation point.
#[derive(Clone, Debug, PartialEq)]
pub struct Explosion {
    pub pos: Vec2,
    pub size: f32,
    lifetime: u32,
    remaining: u32,
}

impl Explosion {
    pub fn new(pos: Vec2, cfg: &ExplosionConfig) -> Self {
        Self {
            pos,
            size: cfg.size,
            lifetime: cfg.lifetime.max(1),
            remaining: cfg.lifetime.max(1),
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.pos.x - self.size, self.pos.y - self.size, self.size, self.size)
    }

    pub fn is_active(&self) -> bool {
        self.remaining > 0
    }

    /// Returns false once the blast has burnt out.
    pub fn update(&mut self) -> bool {
        self.remaining = self.remaining.saturating_sub(1);
        self.is_active()
    }

    pub fn render(&self, canvas: &mut dyn Canvas, offset: Vec2) {
        let progress = 1.0 - self.remaining as f32 / self.lifetime as f32;
        let radius = self.size * (0.25 + 0.75 * progress);
        let alpha = 1.0 - progress;
        canvas.draw_disc(
            rect_center(self.rect()) - offset,
            radius,
            Color::new(1.0, 0.55, 0.1, alpha),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::{GridIndex, TileKind};

    fn grenade_at(pos: Vec2, flip: bool) -> Throwable {
        Throwable::grenade(pos, &ThrowableConfig::default(), flip, &AnimationLibrary::new())
    }

    const FAR: Vec2 = Vec2::new(1000.0, 1000.0);

    #[test]
    fn launch_direction_follows_facing() {
        assert_eq!(grenade_at(vec2(50.0, 50.0), false).velocity, vec2(1.5, -2.0));
        assert_eq!(grenade_at(vec2(50.0, 50.0), true).velocity, vec2(-1.5, -2.0));
    }

    #[test]
    fn floor_contact_bounces_and_rests_on_top() {
        let mut map = TileMap::new(16.0);
        map.place(GridIndex::new(3, 4), TileKind::Stone, 0);
        let cfg = ThrowableConfig::default();
        let mut grenade = grenade_at(vec2(52.0, 57.0), false);
        grenade.velocity = vec2(0.0, 2.0);

        assert_eq!(grenade.update(&map, &cfg, FAR), ThrowOutcome::Flying);
        assert_eq!(grenade.pos.y, 56.0);
        assert!((grenade.velocity.y - (-1.4 + 0.1)).abs() < 1e-5);
    }

    #[test]
    fn ceiling_contact_stops_vertical_motion() {
        let mut map = TileMap::new(16.0);
        map.place(GridIndex::new(3, 2), TileKind::Stone, 0);
        let cfg = ThrowableConfig::default();
        let mut grenade = grenade_at(vec2(52.0, 49.0), false);
        grenade.velocity = vec2(0.0, -2.0);

        grenade.update(&map, &cfg, FAR);
        assert_eq!(grenade.pos.y, 48.0);
        assert!((grenade.velocity.y - 0.1).abs() < 1e-6);
    }

    #[test]
    fn walls_reflect_horizontal_motion() {
        let mut map = TileMap::new(16.0);
        map.place(GridIndex::new(4, 3), TileKind::Grass, 0);
        let cfg = ThrowableConfig::default();
        let mut grenade = grenade_at(vec2(55.0, 52.0), false);
        grenade.velocity = vec2(2.0, 0.0);

        grenade.update(&map, &cfg, FAR);
        assert_eq!(grenade.pos.x, 56.0);
        assert!((grenade.velocity.x + 1.4).abs() < 1e-5);
    }

    #[test]
    fn fuse_runs_out_into_detonation() {
        let map = TileMap::new(16.0);
        let mut cfg = ThrowableConfig::default();
        cfg.fuse = 3;
        cfg.gravity = 0.0;
        let animations = AnimationLibrary::new();
        let mut grenade = Throwable::grenade(vec2(100.0, 100.0), &cfg, false, &animations);
        grenade.velocity = Vec2::ZERO;
        for _ in 0..3 {
            assert_eq!(grenade.update(&map, &cfg, FAR), ThrowOutcome::Flying);
        }
        assert_eq!(grenade.update(&map, &cfg, FAR), ThrowOutcome::Detonated);
    }

    #[test]
    fn leaving_bounds_discards() {
        let map = TileMap::new(16.0);
        let cfg = ThrowableConfig::default();
        let bounds = throw_bounds(&map, vec2(640.0, 350.0), 8.0);
        assert_eq!(bounds, vec2(640.0, 350.0));

        let mut grenade = grenade_at(vec2(1.0, 100.0), true);
        assert_eq!(grenade.update(&map, &cfg, bounds), ThrowOutcome::OutOfBounds);
        let mut grenade = grenade_at(vec2(100.0, 345.0), false);
        grenade.velocity = vec2(0.0, 1.0);
        assert_eq!(grenade.update(&map, &cfg, bounds), ThrowOutcome::OutOfBounds);
    }

    #[test]
    fn explosion_area_and_lifetime() {
        let mut blast = Explosion::new(vec2(100.0, 100.0), &ExplosionConfig::default());
        assert_eq!(blast.rect(), Rect::new(84.0, 84.0, 16.0, 16.0));
        let mut ticks = 0;
        while blast.update() {
            ticks += 1;
        }
        assert_eq!(ticks, 36);
        assert!(!blast.is_active());
    }
}
