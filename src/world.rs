use log::{debug, info, warn};
use macroquad::prelude::*;

use crate::ambient::Ambient;
use crate::animation::AnimationLibrary;
use crate::camera::Camera;
use crate::config::GameConfig;
use crate::door::Direction;
use crate::enemy::Enemy;
use crate::entity::{SpawnQueue, TickContext};
use crate::helpers::rects_collide;
use crate::level::{Level, LevelLoadError, LevelSource};
use crate::map::TileKind;
use crate::player::Player;
use crate::projectile::{travel_limit, Projectile, ProjectileEvent};
use crate::render::Canvas;
use crate::throwable::{throw_bounds, Explosion, ThrowOutcome, Throwable};

const CANOPY: (TileKind, usize) = (TileKind::LargeDecor, 2);

/// Input sampled once per tick by the shell.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameInput {
    /// -1 left, +1 right, 0 idle.
    pub movement: f32,
    pub jump: bool,
    pub dash: bool,
    pub shoot: bool,
    pub throw: bool,
}

pub struct World {
    config: GameConfig,
    animations: AnimationLibrary,
    source: Box<dyn LevelSource>,
    level_index: usize,
    /// Level as loaded, before spawners and canopies were pulled out.
    pristine: Level,
    level: Level,
    player: Player,
    enemies: Vec<Enemy>,
    projectiles: Vec<Projectile>,
    throwables: Vec<Throwable>,
    explosions: Vec<Explosion>,
    ambient: Ambient,
    camera: Camera,
    direction: Direction,
    entry: Option<Direction>,
    entry_timer: u32,
    pending_door: bool,
    /// Fade counter: negative while fading in, positive while fading out.
    transition: i32,
    /// Ticks since the player died, 0 while alive.
    dead: u32,
}

impl World {
    pub fn new(
        config: GameConfig,
        animations: AnimationLibrary,
        source: Box<dyn LevelSource>,
        start: usize,
    ) -> Result<Self, LevelLoadError> {
        let level = source.load(start)?;
        let player = Player::new(Vec2::ZERO, &config.player, &animations);
        let mut world = Self {
            config,
            animations,
            source,
            level_index: start,
            pristine: level.clone(),
            level: level.clone(),
            player,
            enemies: Vec::new(),
            projectiles: Vec::new(),
            throwables: Vec::new(),
            explosions: Vec::new(),
            ambient: Ambient::default(),
            camera: Camera::default(),
            direction: Direction::Left,
            entry: None,
            entry_timer: 0,
            pending_door: false,
            transition: 0,
            dead: 0,
        };
        world.install(level, Direction::Left);
        Ok(world)
    }

    /// Swaps in level `index`. On failure the current level keeps running untouched.
    pub fn load_level(&mut self, index: usize, dir: Direction) -> Result<(), LevelLoadError> {
        match self.source.load(index) {
            Ok(level) => {
                self.level_index = index;
                self.pristine = level.clone();
                self.install(level, dir);
                Ok(())
            }
            Err(err) => {
                warn!("level {index} failed to load, keeping level {}: {err}", self.level_index);
                Err(err)
            }
        }
    }

    fn install(&mut self, mut level: Level, dir: Direction) {
        let canopies = level.map.extract(&[CANOPY], true);
        let spawners = level.map.extract(&self.config.enemy.spawner_pairs(), false);

        self.enemies = spawners
            .iter()
            .filter_map(|spawner| {
                let variant = self.config.enemy.variant_for_spawner(spawner.variant)?;
                Some(Enemy::spawn(variant, spawner.pos, &self.config.enemy, &self.animations))
            })
            .collect();
        self.ambient = Ambient::from_canopies(&canopies);
        debug!("{} leaf emitters", canopies.len());
        self.projectiles.clear();
        self.throwables.clear();
        self.explosions.clear();
        self.camera = Camera::default();

        let spawn = self.config.entry.spawn(dir);
        self.player.respawn(spawn.position(), spawn.flip);
        self.direction = dir;
        self.entry = Some(dir);
        self.entry_timer = self.config.entry.ticks;
        self.pending_door = false;
        self.transition = -self.config.transition.fade_ticks;
        self.dead = 0;

        info!(
            "level {} loaded: {} tiles, {} doors, {} enemies, entering from {}",
            self.level_index,
            level.map.tile_count(),
            level.doors.len(),
            self.enemies.len(),
            dir.as_str()
        );
        self.level = level;
    }

    fn reload_after_death(&mut self) {
        if self.load_level(self.level_index, self.direction).is_err() {
            let level = self.pristine.clone();
            self.install(level, self.direction);
        }
        info!("player respawned in level {}", self.level_index);
    }

    fn kill_player(&mut self) {
        if self.dead == 0 {
            self.dead = 1;
            info!("player died in level {}", self.level_index);
        }
    }

    pub fn tick(&mut self, input: &FrameInput) {
        self.update_transition();
        if self.dead > 0 {
            self.update_death();
        }

        let mut spawns = SpawnQueue::default();
        let view = self.config.display.size();
        let player_view = (self.dead == 0).then(|| self.player.view());

        {
            let mut ctx = TickContext {
                map: &self.level.map,
                config: &self.config,
                animations: &self.animations,
                entry: self.entry,
                player: player_view,
                spawns: &mut spawns,
            };
            self.enemies.retain_mut(|enemy| !enemy.update(&mut ctx));

            if self.dead == 0 {
                let movement = if ctx.entering() { 0.0 } else { input.movement };
                self.player.update(&ctx, vec2(movement, 0.0));
            }
        }

        self.projectiles.append(&mut spawns.projectiles);
        self.update_projectiles(view.x);
        self.update_throwables(view);
        self.update_explosions();
        self.ambient.update(&self.animations);
        self.update_entry();
        self.apply_actions(input, &mut spawns);
        self.projectiles.append(&mut spawns.projectiles);
        self.throwables.append(&mut spawns.throwables);

        self.camera.follow(self.player.body.center(), view, &self.level.map);
    }

    fn update_transition(&mut self) {
        if self.entry.is_none() {
            if let Some(door) = self.level.doors.check(self.player.rect()) {
                if !self.pending_door {
                    info!(
                        "door {} touched, entering next level from {}",
                        door.pos,
                        door.next_dir.as_str()
                    );
                }
                self.pending_door = true;
                self.direction = door.next_dir;
            }
        }

        if self.pending_door && self.entry.is_none() {
            self.transition += 1;
            if self.transition > self.config.transition.fade_ticks {
                let last = self.source.level_count().saturating_sub(1);
                let next = (self.level_index + 1).min(last);
                if self.load_level(next, self.direction).is_err() {
                    self.pending_door = false;
                    self.transition = 0;
                }
            }
        }
        if self.transition < 0 {
            self.transition += 1;
        }
    }

    fn update_death(&mut self) {
        let cfg = &self.config.transition;
        self.dead += 1;
        if self.dead >= cfg.death_fade_start {
            self.transition = (self.transition + 1).min(cfg.fade_ticks);
        }
        if self.dead > cfg.death_reload {
            self.reload_after_death();
        }
    }

    fn update_projectiles(&mut self, view_width: f32) {
        let limit = travel_limit(&self.level.map, view_width, self.config.projectile.bounds_margin);
        let mut i = 0;
        while i < self.projectiles.len() {
            let targets: Vec<Rect> = self.enemies.iter().map(Enemy::rect).collect();
            let player_view = (self.dead == 0).then(|| self.player.view());
            let event =
                self.projectiles[i].update(&self.level.map, limit, &targets, player_view.as_ref());
            match event {
                ProjectileEvent::Flying => {
                    i += 1;
                    continue;
                }
                ProjectileEvent::HitEnemy(index) => {
                    self.enemies.remove(index);
                }
                ProjectileEvent::HitPlayer => self.kill_player(),
                ProjectileEvent::HitWall | ProjectileEvent::OutOfBounds => {}
            }
            self.projectiles.remove(i);
        }
    }

    fn update_throwables(&mut self, view: Vec2) {
        let cfg = &self.config.throwable;
        let bounds = throw_bounds(&self.level.map, view, cfg.size);
        let mut detonations = Vec::new();
        let map = &self.level.map;
        self.throwables.retain_mut(|throwable| match throwable.update(map, cfg, bounds) {
            ThrowOutcome::Flying => true,
            ThrowOutcome::Detonated => {
                detonations.push(throwable.pos);
                false
            }
            ThrowOutcome::OutOfBounds => false,
        });
        for pos in detonations {
            self.explosions.push(Explosion::new(pos, &self.config.explosion));
        }
    }

    fn update_explosions(&mut self) {
        for blast in &self.explosions {
            let area = blast.rect();
            self.enemies.retain(|enemy| !rects_collide(enemy.rect(), area));
        }
        self.explosions.retain_mut(Explosion::update);
    }

    fn update_entry(&mut self) {
        let Some(dir) = self.entry else {
            return;
        };
        self.player.body.pos += self.config.entry.spawn(dir).glide_velocity();
        if self.entry_timer == 0 {
            self.entry = None;
        } else {
            self.entry_timer -= 1;
        }
    }

    fn apply_actions(&mut self, input: &FrameInput, spawns: &mut SpawnQueue) {
        if self.dead > 0 || self.entry.is_some() {
            return;
        }
        if input.jump {
            self.player.jump(&self.config.player);
        }
        if input.dash {
            self.player.dash(&self.config.player);
        }
        if input.shoot {
            self.player.shoot(&self.config.projectile, spawns);
        }
        if input.throw {
            self.player.throw(&self.config.throwable, &self.animations, spawns);
        }
    }

    pub fn render(&self, canvas: &mut dyn Canvas) {
        let offset = self.camera.offset();
        self.level.map.render(canvas, offset);
        for enemy in &self.enemies {
            enemy.render(canvas, offset);
        }
        if self.dead == 0 {
            self.player.render(canvas, offset);
        }
        for projectile in &self.projectiles {
            projectile.render(canvas, offset);
        }
        for throwable in &self.throwables {
            throwable.render(canvas, offset);
        }
        for blast in &self.explosions {
            blast.render(canvas, offset);
        }
        self.ambient.render(canvas, offset);
    }

    /// Radius of the visible hole in the fade overlay, `None` when no fade is running.
    pub fn fade_radius(&self) -> Option<f32> {
        let elapsed = (self.config.transition.fade_ticks - self.transition.abs()).max(0);
        (self.transition != 0).then(|| elapsed as f32 * 8.0)
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn level(&self) -> &Level {
        &self.level
    }

    pub fn level_index(&self) -> usize {
        self.level_index
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn enemies(&self) -> &[Enemy] {
        &self.enemies
    }

    pub fn projectiles(&self) -> &[Projectile] {
        &self.projectiles
    }

    pub fn throwables(&self) -> &[Throwable] {
        &self.throwables
    }

    pub fn explosions(&self) -> &[Explosion] {
        &self.explosions
    }

    pub fn ambient(&self) -> &Ambient {
        &self.ambient
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn entry(&self) -> Option<Direction> {
        self.entry
    }

    pub fn is_dead(&self) -> bool {
        self.dead > 0
    }
}
