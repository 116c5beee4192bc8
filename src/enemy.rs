use macroquad::prelude::*;
use macroquad::rand::gen_range;

use crate::animation::AnimationLibrary;
use crate::config::{EnemyConfig, EnemyVariant};
use crate::entity::{Action, EntityKind, PhysicsEntity, TickContext};
use crate::helpers::rects_collide;
use crate::projectile::{Owner, Projectile};
use crate::render::Canvas;

#[derive(Clone, Debug, PartialEq)]
pub enum Behavior {
    /// Random bursts along the ground, turning at ledges and walls.
    Walker { walking: u32 },
    /// Hovers above its spawn point and patrols a window around `anchor_x`.
    Floating {
        walking: u32,
        anchor_x: f32,
        spawn_y: f32,
        bob: f32,
    },
}

pub struct Enemy {
    pub body: PhysicsEntity,
    pub behavior: Behavior,
}

impl Enemy {
    pub fn spawn(
        variant: EnemyVariant,
        pos: Vec2,
        cfg: &EnemyConfig,
        animations: &AnimationLibrary,
    ) -> Self {
        match variant {
            EnemyVariant::Walker => Self::walker(pos, cfg, animations),
            EnemyVariant::Floating => Self::floating(pos, cfg, animations),
        }
    }

    pub fn walker(pos: Vec2, cfg: &EnemyConfig, animations: &AnimationLibrary) -> Self {
        let size = vec2(cfg.size[0], cfg.size[1]);
        Self {
            body: PhysicsEntity::new(EntityKind::Enemy, pos, size, animations),
            behavior: Behavior::Walker { walking: 0 },
        }
    }

    pub fn floating(pos: Vec2, cfg: &EnemyConfig, animations: &AnimationLibrary) -> Self {
        let size = vec2(cfg.size[0], cfg.size[1]);
        Self {
            body: PhysicsEntity::new(EntityKind::FloatingEnemy, pos, size, animations),
            behavior: Behavior::Floating {
                walking: 0,
                anchor_x: pos.x,
                spawn_y: pos.y,
                bob: 0.0,
            },
        }
    }

    pub fn rect(&self) -> Rect {
        self.body.rect()
    }

    /// Advances one tick. Returns true when a dashing player ran into this enemy.
    pub fn update(&mut self, ctx: &mut TickContext<'_>) -> bool {
        let movement = match self.behavior {
            Behavior::Walker { .. } => self.walk(ctx),
            Behavior::Floating { .. } => self.hover(ctx),
        };

        let action = if movement.x != 0.0 { Action::Walk } else { Action::Idle };
        self.body.set_action(action, ctx.animations);

        let rect = self.body.rect();
        ctx.player
            .is_some_and(|player| player.dash_attack && rects_collide(rect, player.rect))
    }

    fn walk(&mut self, ctx: &mut TickContext<'_>) -> Vec2 {
        let config = ctx.config;
        let cfg = &config.enemy;
        let mut movement = Vec2::ZERO;

        if let Behavior::Walker { walking } = &mut self.behavior {
            if !ctx.entering() {
                if *walking > 0 {
                    let body = &mut self.body;
                    let ahead = if body.flip { -cfg.ledge_probe[0] } else { cfg.ledge_probe[0] };
                    let probe = vec2(body.center().x + ahead, body.pos.y + cfg.ledge_probe[1]);
                    if ctx.map.solid_check(probe).is_some() {
                        if body.collisions.horizontal() {
                            body.flip = !body.flip;
                        } else {
                            movement.x = if body.flip { -cfg.walk_speed } else { cfg.walk_speed };
                        }
                    } else {
                        body.flip = !body.flip;
                    }

                    *walking -= 1;
                    if *walking == 0 {
                        fire_at_player(body, ctx);
                    }
                } else if gen_range(0.0f32, 1.0) < cfg.walk_chance {
                    *walking = gen_range(cfg.walk_burst[0], cfg.walk_burst[1] + 1);
                }
            }
        }

        self.body.update(ctx, movement);
        movement
    }

    fn hover(&mut self, ctx: &mut TickContext<'_>) -> Vec2 {
        let config = ctx.config;
        let cfg = &config.enemy;
        let mut movement = Vec2::ZERO;

        if let Behavior::Floating { walking, anchor_x, spawn_y, bob } = &mut self.behavior {
            let body = &mut self.body;
            let drift = *anchor_x - body.pos.x;
            if !ctx.entering() {
                if *walking > 0 {
                    if body.collisions.horizontal() || drift.abs() >= cfg.patrol_window {
                        body.flip = !body.flip;
                        *anchor_x = body.pos.x;
                    } else {
                        movement.x = if body.flip { -cfg.patrol_speed } else { cfg.patrol_speed };
                    }
                    *walking -= 1;
                } else if gen_range(0.0f32, 1.0) < cfg.patrol_chance {
                    *walking = cfg.patrol_burst;
                }
            }

            *bob = (*bob + cfg.bob_speed) % 360.0;
            body.pos.y = *spawn_y - body.size.y - cfg.float_height
                + (cfg.bob_amplitude * bob.to_radians().sin()).trunc();
        }

        self.body.update_horizontal(ctx, movement);
        movement
    }

    pub fn render(&self, canvas: &mut dyn Canvas, offset: Vec2) {
        self.body.render(canvas, offset);
    }
}

/// Shoots along the facing direction when the player is level with and in front of `body`.
fn fire_at_player(body: &PhysicsEntity, ctx: &mut TickContext<'_>) {
    let Some(player) = ctx.player else {
        return;
    };
    let distance = player.pos - body.pos;
    if distance.y.abs() >= ctx.config.enemy.shoot_range_y {
        return;
    }
    let facing_player = (body.flip && distance.x < 0.0) || (!body.flip && distance.x > 0.0);
    if !facing_player {
        return;
    }

    let config = ctx.config;
    let cfg = &config.projectile;
    let dir = if body.flip { -1.0 } else { 1.0 };
    let center = body.center();
    let muzzle = vec2(center.x + dir * cfg.muzzle_offset, center.y);
    ctx.spawns
        .projectiles
        .push(Projectile::new(muzzle, Owner::Enemy, dir, cfg.speed));
}
