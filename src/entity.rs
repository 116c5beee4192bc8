use macroquad::prelude::*;

use crate::animation::{Animation, AnimationLibrary};
use crate::collision::{move_axis, Axis, CollisionFlags};
use crate::config::GameConfig;
use crate::door::Direction;
use crate::map::TileMap;
use crate::projectile::Projectile;
use crate::render::Canvas;
use crate::throwable::Throwable;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Player,
    Enemy,
    FloatingEnemy,
}

impl EntityKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Player => "player",
            Self::Enemy => "enemy",
            Self::FloatingEnemy => "floatingEnemy",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Action {
    Idle,
    Walk,
    Jump,
    WallSlide,
}

impl Action {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Walk => "walk",
            Self::Jump => "jump",
            Self::WallSlide => "wall_slide",
        }
    }
}

pub fn asset_key(kind: EntityKind, action: Action) -> String {
    format!("{}/{}", kind.as_str(), action.as_str())
}

/// Objects created during a tick, appended to the world after the phase that produced them.
#[derive(Default)]
pub struct SpawnQueue {
    pub projectiles: Vec<Projectile>,
    pub throwables: Vec<Throwable>,
}

impl SpawnQueue {
    pub fn is_empty(&self) -> bool {
        self.projectiles.is_empty() && self.throwables.is_empty()
    }
}

/// What enemies may observe about the player during their update.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlayerView {
    pub pos: Vec2,
    pub rect: Rect,
    /// Dash is at full strength: the player is untouchable and kills what it touches.
    pub dash_attack: bool,
}

pub struct TickContext<'a> {
    pub map: &'a TileMap,
    pub config: &'a GameConfig,
    pub animations: &'a AnimationLibrary,
    /// Set while the player is still gliding in from this side.
    pub entry: Option<Direction>,
    pub player: Option<PlayerView>,
    pub spawns: &'a mut SpawnQueue,
}

impl TickContext<'_> {
    pub fn entering(&self) -> bool {
        self.entry.is_some()
    }

    /// Entries from every side but the top skip displacement and collision entirely.
    pub fn physics_suspended(&self) -> bool {
        matches!(self.entry, Some(dir) if dir != Direction::Up)
    }
}

pub struct PhysicsEntity {
    pub kind: EntityKind,
    pub pos: Vec2,
    pub size: Vec2,
    pub velocity: Vec2,
    pub collisions: CollisionFlags,
    pub flip: bool,
    pub last_movement: Vec2,
    action: Action,
    animation: Animation,
    scratch: Vec<Rect>,
}

impl PhysicsEntity {
    pub fn new(kind: EntityKind, pos: Vec2, size: Vec2, animations: &AnimationLibrary) -> Self {
        debug_assert!(size.x > 0.0 && size.y > 0.0, "entity size must be positive");
        Self {
            kind,
            pos,
            size: size.max(Vec2::ONE),
            velocity: Vec2::ZERO,
            collisions: CollisionFlags::default(),
            flip: false,
            last_movement: Vec2::ZERO,
            action: Action::Idle,
            animation: animations.animation(&asset_key(kind, Action::Idle)),
            scratch: Vec::with_capacity(9),
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.pos.x, self.pos.y, self.size.x, self.size.y)
    }

    pub fn center(&self) -> Vec2 {
        self.pos + self.size * 0.5
    }

    pub fn action(&self) -> Action {
        self.action
    }

    pub fn animation(&self) -> &Animation {
        &self.animation
    }

    pub fn set_action(&mut self, action: Action, animations: &AnimationLibrary) {
        if action != self.action {
            self.action = action;
            self.animation = animations.animation(&asset_key(self.kind, action));
        }
    }

    pub fn update(&mut self, ctx: &TickContext<'_>, movement: Vec2) {
        self.collisions = CollisionFlags::default();
        let frame = movement + self.velocity;

        if !ctx.physics_suspended() {
            let dx = frame.x * ctx.config.physics.horizontal_step_scale;
            debug_assert!(
                dx.abs() <= 2.0 * ctx.map.tile_size(),
                "horizontal step {dx} outruns the 9-cell query"
            );
            let mut flags = CollisionFlags::default();
            let rect = move_axis(ctx.map, self.rect(), dx, Axis::X, &mut self.scratch, &mut flags);
            let rect = move_axis(ctx.map, rect, frame.y, Axis::Y, &mut self.scratch, &mut flags);
            self.pos = rect.point();
            self.collisions = flags;
        }

        self.face(movement.x);
        self.last_movement = movement;

        let physics = &ctx.config.physics;
        self.velocity.y = (self.velocity.y + physics.gravity).min(physics.max_fall_speed);
        if self.collisions.vertical() {
            self.velocity.y = 0.0;
        }

        self.animation.update();
    }

    /// Horizontal pass only, no gravity. Used by bodies that place themselves vertically.
    pub fn update_horizontal(&mut self, ctx: &TickContext<'_>, movement: Vec2) {
        self.collisions = CollisionFlags::default();
        let frame_x = movement.x + self.velocity.x;

        if !ctx.physics_suspended() {
            let dx = frame_x * ctx.config.physics.horizontal_step_scale;
            debug_assert!(
                dx.abs() <= 2.0 * ctx.map.tile_size(),
                "horizontal step {dx} outruns the 9-cell query"
            );
            let mut flags = CollisionFlags::default();
            let rect = move_axis(ctx.map, self.rect(), dx, Axis::X, &mut self.scratch, &mut flags);
            self.pos.x = rect.x;
            self.collisions = flags;
        }

        self.face(movement.x);
        self.last_movement = movement;
        self.animation.update();
    }

    fn face(&mut self, dx: f32) {
        if dx > 0.0 {
            self.flip = false;
        }
        if dx < 0.0 {
            self.flip = true;
        }
    }

    pub fn render(&self, canvas: &mut dyn Canvas, offset: Vec2) {
        canvas.draw_sprite(
            &asset_key(self.kind, self.action),
            self.animation.frame_index(),
            self.pos - offset,
            self.flip,
        );
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::level::Level;
    use crate::map::{GridIndex, TileKind};

    pub(crate) struct Fixture {
        pub map: TileMap,
        pub config: GameConfig,
        pub animations: AnimationLibrary,
        pub spawns: SpawnQueue,
    }

    impl Fixture {
        pub fn new(map: TileMap) -> Self {
            Self {
                map,
                config: GameConfig::default(),
                animations: AnimationLibrary::new(),
                spawns: SpawnQueue::default(),
            }
        }

        pub fn ctx(&mut self) -> TickContext<'_> {
            TickContext {
                map: &self.map,
                config: &self.config,
                animations: &self.animations,
                entry: None,
                player: None,
                spawns: &mut self.spawns,
            }
        }
    }

    pub(crate) fn floor_map(y: i32, xs: std::ops::Range<i32>) -> TileMap {
        let mut map = TileMap::new(16.0);
        for x in xs {
            map.place(GridIndex::new(x, y), TileKind::Stone, 0);
        }
        map
    }

    #[test]
    fn landing_inside_a_solid_tile_clamps_bottom_edge() {
        let level = Level::from_json(
            r#"{
                "tilemap": { "5;5": { "type": "grass", "variant": 0, "pos": [5, 5] } },
                "tile_size": 16,
                "offgrid": [],
                "map_dims": { "map_width": 80, "map_height": 80 },
                "lvl": { "next_lvl": [] }
            }"#,
        )
        .expect("level");
        let mut fx = Fixture::new(level.map);
        let mut body = PhysicsEntity::new(
            EntityKind::Player,
            vec2(80.0, 81.0),
            vec2(1.0, 1.0),
            &fx.animations,
        );
        body.velocity.y = 1.0;

        let ctx = fx.ctx();
        body.update(&ctx, Vec2::ZERO);

        assert!(body.collisions.down);
        assert_eq!(body.rect().bottom(), 80.0);
        assert_eq!(body.velocity.y, 0.0);
    }

    #[test]
    fn gravity_accumulates_up_to_the_cap() {
        let mut fx = Fixture::new(TileMap::new(16.0));
        let mut body = PhysicsEntity::new(
            EntityKind::Enemy,
            vec2(0.0, 0.0),
            vec2(8.0, 8.0),
            &fx.animations,
        );
        let ctx = fx.ctx();
        for _ in 0..100 {
            body.update(&ctx, Vec2::ZERO);
        }
        assert_eq!(body.velocity.y, 5.0);
        assert!(!body.collisions.down);
    }

    #[test]
    fn horizontal_intent_is_scaled_and_sets_facing() {
        let mut fx = Fixture::new(TileMap::new(16.0));
        let mut body = PhysicsEntity::new(
            EntityKind::Player,
            vec2(0.0, 0.0),
            vec2(8.0, 8.0),
            &fx.animations,
        );
        let ctx = fx.ctx();
        body.update(&ctx, vec2(-1.0, 0.0));
        assert_eq!(body.pos.x, -2.0);
        assert!(body.flip);
        body.update(&ctx, vec2(1.0, 0.0));
        assert_eq!(body.pos.x, 0.0);
        assert!(!body.flip);
    }

    #[test]
    fn flags_are_recomputed_every_update() {
        let mut fx = Fixture::new(floor_map(2, 0..4));
        let mut body = PhysicsEntity::new(
            EntityKind::Player,
            vec2(4.0, 16.0),
            vec2(13.0, 16.0),
            &fx.animations,
        );
        body.velocity.y = 1.0;
        let ctx = fx.ctx();
        body.update(&ctx, Vec2::ZERO);
        assert!(body.collisions.down);
        body.pos.y = -100.0;
        body.update(&ctx, Vec2::ZERO);
        assert!(!body.collisions.down);
    }

    #[test]
    fn side_entry_freezes_displacement_but_not_gravity() {
        let mut fx = Fixture::new(TileMap::new(16.0));
        let mut body = PhysicsEntity::new(
            EntityKind::Player,
            vec2(5.0, 5.0),
            vec2(8.0, 8.0),
            &fx.animations,
        );
        body.velocity.y = 1.0;
        let mut ctx = fx.ctx();
        ctx.entry = Some(Direction::Left);
        body.update(&ctx, vec2(1.0, 0.0));
        assert_eq!(body.pos, vec2(5.0, 5.0));
        assert!((body.velocity.y - 1.1).abs() < 1e-6);

        ctx.entry = Some(Direction::Up);
        body.update(&ctx, Vec2::ZERO);
        assert!(body.pos.y > 5.0);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "outruns the 9-cell query")]
    fn steps_longer_than_two_tiles_are_rejected() {
        let mut fx = Fixture::new(TileMap::new(16.0));
        fx.config.physics.horizontal_step_scale = 10.0;
        let mut body = PhysicsEntity::new(
            EntityKind::Player,
            Vec2::ZERO,
            vec2(8.0, 8.0),
            &fx.animations,
        );
        let ctx = fx.ctx();
        body.update(&ctx, vec2(4.0, 0.0));
    }

    #[test]
    fn full_dash_stays_within_the_step_bound() {
        let fx = Fixture::new(TileMap::new(16.0));
        let cfg = &fx.config;
        let step = (cfg.player.dash_speed + 1.0) * cfg.physics.horizontal_step_scale;
        assert!(step <= 2.0 * fx.map.tile_size());
    }

    #[test]
    fn top_entry_still_lands_on_the_floor() {
        let mut fx = Fixture::new(floor_map(2, 0..4));
        let mut body = PhysicsEntity::new(
            EntityKind::Player,
            vec2(4.0, 16.0),
            vec2(13.0, 16.0),
            &fx.animations,
        );
        body.velocity.y = 1.0;
        let mut ctx = fx.ctx();

        ctx.entry = Some(Direction::Left);
        body.update(&ctx, Vec2::ZERO);
        assert_eq!(body.pos.y, 16.0);
        assert!(!body.collisions.down);

        ctx.entry = Some(Direction::Up);
        body.update(&ctx, Vec2::ZERO);
        assert!(body.collisions.down);
        assert_eq!(body.rect().bottom(), 32.0);
        assert_eq!(body.velocity.y, 0.0);
    }

    #[test]
    fn action_change_swaps_animation_and_render_uses_key() {
        use crate::animation::AnimationSpec;
        use crate::render::testing::RecordingCanvas;

        let mut fx = Fixture::new(TileMap::new(16.0));
        fx.animations.insert("player/walk", AnimationSpec::new(4, 2, true));
        let mut body = PhysicsEntity::new(
            EntityKind::Player,
            vec2(30.0, 40.0),
            vec2(8.0, 8.0),
            &fx.animations,
        );
        body.set_action(Action::Walk, &fx.animations);
        {
            let ctx = fx.ctx();
            body.update(&ctx, Vec2::ZERO);
            body.update(&ctx, Vec2::ZERO);
        }
        let mut canvas = RecordingCanvas::new(100.0, 100.0);
        body.render(&mut canvas, vec2(10.0, 10.0));
        let sprites = canvas.sprites();
        assert_eq!(sprites[0].0, "player/walk");
        assert_eq!(sprites[0].1, 1);
        assert_eq!(sprites[0].2.x, 20.0);
    }
}
