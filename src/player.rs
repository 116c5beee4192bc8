use macroquad::prelude::*;

use crate::animation::AnimationLibrary;
use crate::config::{PlayerConfig, ProjectileConfig, ThrowableConfig};
use crate::entity::{Action, EntityKind, PhysicsEntity, PlayerView, SpawnQueue, TickContext};
use crate::helpers::signum_or_zero;
use crate::projectile::{Owner, Projectile};
use crate::render::Canvas;
use crate::throwable::Throwable;

pub struct Player {
    pub body: PhysicsEntity,
    pub air_time: u32,
    pub jumps: u32,
    pub wall_slide: bool,
    /// Signed dash countdown; the sign is the dash direction.
    pub dashing: i32,
    dash_threshold: i32,
}

impl Player {
    pub fn new(pos: Vec2, config: &PlayerConfig, animations: &AnimationLibrary) -> Self {
        let size = vec2(config.size[0], config.size[1]);
        Self {
            body: PhysicsEntity::new(EntityKind::Player, pos, size, animations),
            air_time: 0,
            jumps: config.max_jumps,
            wall_slide: false,
            dashing: 0,
            dash_threshold: config.dash_threshold,
        }
    }

    pub fn rect(&self) -> Rect {
        self.body.rect()
    }

    pub fn position(&self) -> Vec2 {
        self.body.pos
    }

    pub fn respawn(&mut self, pos: Vec2, flip: bool) {
        self.body.pos = pos;
        self.body.flip = flip;
        self.body.velocity = Vec2::ZERO;
        self.dashing = 0;
    }

    pub fn update(&mut self, ctx: &TickContext<'_>, movement: Vec2) {
        self.body.update(ctx, movement);
        if ctx.entering() {
            return;
        }
        let cfg = &ctx.config.player;

        self.air_time += 1;
        if self.body.collisions.down {
            self.air_time = 0;
            self.jumps = cfg.max_jumps;
        }

        self.wall_slide = false;
        if self.body.collisions.horizontal() && self.air_time > cfg.wall_slide_air_time {
            self.wall_slide = true;
            self.body.velocity.y = self.body.velocity.y.min(cfg.wall_slide_speed);
            self.body.flip = !self.body.collisions.right;
            self.body.set_action(Action::WallSlide, ctx.animations);
            self.jumps = cfg.max_jumps;
        }

        if !self.wall_slide {
            let action = if self.air_time > cfg.wall_slide_air_time {
                Action::Jump
            } else if movement.x != 0.0 {
                Action::Walk
            } else {
                Action::Idle
            };
            self.body.set_action(action, ctx.animations);
        }

        if self.dashing > 0 {
            self.dashing -= 1;
        } else if self.dashing < 0 {
            self.dashing += 1;
        }

        if self.dashing.abs() > cfg.dash_threshold {
            self.body.velocity.x = signum_or_zero(self.dashing as f32) * cfg.dash_speed;
            if self.dashing.abs() == cfg.dash_threshold + 1 {
                self.body.velocity.x *= cfg.dash_tail_factor;
            }
        }

        let vx = self.body.velocity.x;
        self.body.velocity.x = if vx > 0.0 {
            (vx - cfg.friction).max(0.0)
        } else {
            (vx + cfg.friction).min(0.0)
        };
    }

    /// Wall jumps fire only while pushing into the wall being slid on, and kick away from it.
    pub fn jump(&mut self, cfg: &PlayerConfig) -> bool {
        if self.wall_slide {
            let pushing_into_wall = (self.body.flip && self.body.last_movement.x < 0.0)
                || (!self.body.flip && self.body.last_movement.x > 0.0);
            if !pushing_into_wall {
                return false;
            }
            let away = if self.body.flip { 1.0 } else { -1.0 };
            self.body.velocity.x = away * cfg.wall_jump_kick;
            self.body.velocity.y = cfg.wall_jump_velocity;
            self.air_time = cfg.jump_air_time;
            self.jumps = self.jumps.saturating_sub(1);
            return true;
        }
        if self.jumps > 0 {
            self.body.velocity.y = cfg.jump_velocity;
            self.jumps -= 1;
            self.air_time = cfg.jump_air_time;
            return true;
        }
        false
    }

    pub fn dash(&mut self, cfg: &PlayerConfig) -> bool {
        if self.dashing != 0 {
            return false;
        }
        self.dashing = if self.body.flip {
            -cfg.dash_length
        } else {
            cfg.dash_length
        };
        true
    }

    pub fn shoot(&self, cfg: &ProjectileConfig, spawns: &mut SpawnQueue) {
        let center = self.body.center();
        let dir = if self.body.flip { -1.0 } else { 1.0 };
        let muzzle = vec2(center.x + dir * cfg.muzzle_offset, center.y);
        spawns.projectiles.push(Projectile::new(muzzle, Owner::Player, dir, cfg.speed));
    }

    pub fn throw(
        &self,
        cfg: &ThrowableConfig,
        animations: &AnimationLibrary,
        spawns: &mut SpawnQueue,
    ) {
        spawns
            .throwables
            .push(Throwable::grenade(self.body.pos, cfg, self.body.flip, animations));
    }

    /// Hostile projectiles pass through while the dash is at full strength.
    pub fn is_invulnerable(&self) -> bool {
        self.dashing.abs() >= self.dash_threshold
    }

    /// Hidden during the peak of a dash, drawn again during its wind-down.
    pub fn is_visible(&self) -> bool {
        self.dashing.abs() <= self.dash_threshold
    }

    pub fn view(&self) -> PlayerView {
        PlayerView {
            pos: self.body.pos,
            rect: self.rect(),
            dash_attack: self.is_invulnerable(),
        }
    }

    pub fn render(&self, canvas: &mut dyn Canvas, offset: Vec2) {
        if self.is_visible() {
            self.body.render(canvas, offset);
        }
    }
}
