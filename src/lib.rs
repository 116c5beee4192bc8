//! Tile platformer core: sparse tile grid, autotiling, axis-separated collision, door
//! transitions, and the per-tick entity update loop.
//!
//! Rendering goes through the [`render::Canvas`] trait so everything here runs headless.

pub mod ambient;
pub mod animation;
pub mod autotile;
pub mod camera;
pub mod collision;
pub mod config;
pub mod door;
pub mod enemy;
pub mod entity;
pub mod helpers;
pub mod level;
pub mod map;
pub mod player;
pub mod projectile;
pub mod render;
pub mod throwable;
pub mod world;
