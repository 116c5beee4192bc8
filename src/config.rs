use std::path::Path;

use macroquad::prelude::*;
use serde::Deserialize;
use thiserror::Error;

use crate::door::Direction;
use crate::map::TileKind;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("yaml error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub display: DisplayConfig,
    pub physics: PhysicsConfig,
    pub player: PlayerConfig,
    pub enemy: EnemyConfig,
    pub projectile: ProjectileConfig,
    pub throwable: ThrowableConfig,
    pub explosion: ExplosionConfig,
    pub entry: EntryConfig,
    pub transition: TransitionConfig,
}

impl GameConfig {
    pub fn from_yaml(raw: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(raw)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::from_yaml(&std::fs::read_to_string(path)?)
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub width: f32,
    pub height: f32,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            width: 640.0,
            height: 350.0,
        }
    }
}

impl DisplayConfig {
    pub fn size(&self) -> Vec2 {
        vec2(self.width, self.height)
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    pub gravity: f32,
    pub max_fall_speed: f32,
    /// Multiplier on the horizontal part of each frame's displacement.
    pub horizontal_step_scale: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: 0.1,
            max_fall_speed: 5.0,
            horizontal_step_scale: 2.0,
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub size: [f32; 2],
    pub max_jumps: u32,
    pub jump_velocity: f32,
    pub wall_jump_kick: f32,
    pub wall_jump_velocity: f32,
    pub wall_slide_speed: f32,
    pub wall_slide_air_time: u32,
    pub jump_air_time: u32,
    pub friction: f32,
    pub dash_length: i32,
    pub dash_threshold: i32,
    pub dash_speed: f32,
    pub dash_tail_factor: f32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            size: [13.0, 16.0],
            max_jumps: 1,
            jump_velocity: -3.0,
            wall_jump_kick: 2.0,
            wall_jump_velocity: -2.5,
            wall_slide_speed: 0.5,
            wall_slide_air_time: 4,
            jump_air_time: 5,
            friction: 0.1,
            dash_length: 60,
            dash_threshold: 50,
            dash_speed: 8.0,
            dash_tail_factor: 0.3,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnemyVariant {
    Walker,
    Floating,
}

#[derive(Clone, Debug, Deserialize)]
pub struct SpawnerBinding {
    pub variant: usize,
    pub enemy: EnemyVariant,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct EnemyConfig {
    pub size: [f32; 2],
    pub spawners: Vec<SpawnerBinding>,
    pub walk_speed: f32,
    pub walk_burst: [u32; 2],
    pub walk_chance: f32,
    pub ledge_probe: [f32; 2],
    pub shoot_range_y: f32,
    pub float_height: f32,
    pub bob_amplitude: f32,
    pub bob_speed: f32,
    pub patrol_speed: f32,
    pub patrol_window: f32,
    pub patrol_burst: u32,
    pub patrol_chance: f32,
}

impl Default for EnemyConfig {
    fn default() -> Self {
        Self {
            size: [13.0, 16.0],
            spawners: vec![SpawnerBinding {
                variant: 1,
                enemy: EnemyVariant::Floating,
            }],
            walk_speed: 0.5,
            walk_burst: [30, 60],
            walk_chance: 0.01,
            ledge_probe: [7.0, 23.0],
            shoot_range_y: 30.0,
            float_height: 10.0,
            bob_amplitude: 10.0,
            bob_speed: 6.0,
            patrol_speed: 0.25,
            patrol_window: 60.0,
            patrol_burst: 60,
            patrol_chance: 0.1,
        }
    }
}

impl EnemyConfig {
    pub fn spawner_pairs(&self) -> Vec<(TileKind, usize)> {
        self.spawners
            .iter()
            .map(|binding| (TileKind::Spawners, binding.variant))
            .collect()
    }

    pub fn variant_for_spawner(&self, variant: usize) -> Option<EnemyVariant> {
        self.spawners
            .iter()
            .find(|binding| binding.variant == variant)
            .map(|binding| binding.enemy)
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct ProjectileConfig {
    pub speed: f32,
    pub muzzle_offset: f32,
    pub bounds_margin: f32,
}

impl Default for ProjectileConfig {
    fn default() -> Self {
        Self {
            speed: 2.5,
            muzzle_offset: 7.0,
            bounds_margin: 6.0,
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct ThrowableConfig {
    pub velocity: [f32; 2],
    pub gravity: f32,
    pub bounce: f32,
    pub fuse: u32,
    pub size: f32,
}

impl Default for ThrowableConfig {
    fn default() -> Self {
        Self {
            velocity: [1.5, -2.0],
            gravity: 0.1,
            bounce: 0.7,
            fuse: 120,
            size: 8.0,
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct ExplosionConfig {
    pub size: f32,
    pub lifetime: u32,
}

impl Default for ExplosionConfig {
    fn default() -> Self {
        Self {
            size: 16.0,
            lifetime: 37,
        }
    }
}

#[derive(Clone, Copy, Debug, Deserialize)]
pub struct EntrySpawn {
    pub pos: [f32; 2],
    pub glide: [f32; 2],
    #[serde(default)]
    pub flip: bool,
}

impl EntrySpawn {
    pub fn position(&self) -> Vec2 {
        vec2(self.pos[0], self.pos[1])
    }

    pub fn glide_velocity(&self) -> Vec2 {
        vec2(self.glide[0], self.glide[1])
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct EntryConfig {
    pub ticks: u32,
    pub left: EntrySpawn,
    pub right: EntrySpawn,
    pub up: EntrySpawn,
    pub down: EntrySpawn,
}

impl Default for EntryConfig {
    fn default() -> Self {
        Self {
            ticks: 28,
            left: EntrySpawn {
                pos: [-14.0, 160.0],
                glide: [0.5, 0.0],
                flip: false,
            },
            right: EntrySpawn {
                pos: [638.0, 160.0],
                glide: [-0.5, 0.0],
                flip: true,
            },
            up: EntrySpawn {
                pos: [291.0, 0.0],
                glide: [0.0, 0.0],
                flip: false,
            },
            down: EntrySpawn {
                pos: [290.0, 316.0],
                glide: [0.8, -0.2],
                flip: false,
            },
        }
    }
}

impl EntryConfig {
    pub fn spawn(&self, dir: Direction) -> &EntrySpawn {
        match dir {
            Direction::Left => &self.left,
            Direction::Right => &self.right,
            Direction::Up => &self.up,
            Direction::Down => &self.down,
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct TransitionConfig {
    pub fade_ticks: i32,
    pub death_fade_start: u32,
    pub death_reload: u32,
}

impl Default for TransitionConfig {
    fn default() -> Self {
        Self {
            fade_ticks: 30,
            death_fade_start: 10,
            death_reload: 60,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_yields_defaults() {
        let cfg = GameConfig::from_yaml("{}").expect("config");
        assert_eq!(cfg.physics.gravity, 0.1);
        assert_eq!(cfg.player.dash_length, 60);
        assert_eq!(cfg.entry.ticks, 28);
        assert_eq!(cfg.enemy.variant_for_spawner(1), Some(EnemyVariant::Floating));
    }

    #[test]
    fn partial_sections_override_only_named_fields() {
        let raw = "
physics:
  gravity: 0.25
enemy:
  spawners:
    - { variant: 1, enemy: floating }
    - { variant: 2, enemy: walker }
entry:
  up: { pos: [10, 20], glide: [0, 0] }
";
        let cfg = GameConfig::from_yaml(raw).expect("config");
        assert_eq!(cfg.physics.gravity, 0.25);
        assert_eq!(cfg.physics.max_fall_speed, 5.0);
        assert_eq!(cfg.enemy.variant_for_spawner(2), Some(EnemyVariant::Walker));
        assert_eq!(cfg.enemy.spawner_pairs().len(), 2);
        assert_eq!(cfg.entry.spawn(Direction::Up).position(), vec2(10.0, 20.0));
        assert!(cfg.entry.spawn(Direction::Right).flip);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = GameConfig::load("does/not/exist.yaml").expect_err("missing");
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn malformed_yaml_is_reported() {
        let err = GameConfig::from_yaml("physics: [1, 2").expect_err("bad yaml");
        assert!(matches!(err, ConfigError::Yaml(_)));
    }
}
