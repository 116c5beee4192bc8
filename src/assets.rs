use std::collections::HashMap;
use std::path::Path;

use log::{debug, warn};
use macroquad::prelude::*;

use tilerunner::entity::{asset_key, Action, EntityKind};
use tilerunner::helpers::asset_path;
use tilerunner::map::TileKind;
use tilerunner::render::Canvas;

const IMAGE_DIR: &str = "data/images";

/// Every key the core draws with.
fn sprite_keys() -> Vec<String> {
    let tiles = [
        TileKind::Grass,
        TileKind::Stone,
        TileKind::Dungeon,
        TileKind::Decor,
        TileKind::LargeDecor,
        TileKind::Spawners,
    ];
    let mut keys: Vec<String> = tiles.iter().map(|kind| kind.as_str().to_string()).collect();
    for kind in [EntityKind::Player, EntityKind::Enemy, EntityKind::FloatingEnemy] {
        for action in [Action::Idle, Action::Walk, Action::Jump, Action::WallSlide] {
            keys.push(asset_key(kind, action));
        }
    }
    keys.extend(["projectile", "throwable/grenade", "particle/leaf"].map(String::from));
    keys
}

async fn load_frames(key: &str) -> Vec<Texture2D> {
    let mut frames = Vec::new();
    loop {
        let path = asset_path(&format!("{IMAGE_DIR}/{key}/{}.png", frames.len()));
        if !Path::new(&path).is_file() {
            break;
        }
        match load_texture(&path).await {
            Ok(texture) => {
                texture.set_filter(FilterMode::Nearest);
                frames.push(texture);
            }
            Err(err) => {
                warn!("failed to load {path}: {err}");
                break;
            }
        }
    }
    if frames.is_empty() {
        let single = asset_path(&format!("{IMAGE_DIR}/{key}.png"));
        if let Ok(texture) = load_texture(&single).await {
            texture.set_filter(FilterMode::Nearest);
            frames.push(texture);
        }
    }
    frames
}

/// Textures keyed like the core's sprite keys; frame `n` of a key is `data/images/{key}/{n}.png`.
pub struct TextureStore {
    textures: HashMap<String, Vec<Texture2D>>,
    view: Vec2,
}

impl TextureStore {
    pub async fn load(view: Vec2) -> Self {
        let mut textures = HashMap::new();
        for key in sprite_keys() {
            let frames = load_frames(&key).await;
            if frames.is_empty() {
                warn!("no texture for {key}");
                continue;
            }
            debug!("{key}: {} frames", frames.len());
            textures.insert(key, frames);
        }
        Self { textures, view }
    }
}

impl Canvas for TextureStore {
    fn draw_sprite(&mut self, key: &str, frame: usize, pos: Vec2, flip_x: bool) {
        let Some(texture) = self.textures.get(key).and_then(|frames| frames.get(frame)) else {
            return;
        };
        draw_texture_ex(
            texture,
            pos.x.floor(),
            pos.y.floor(),
            WHITE,
            DrawTextureParams {
                flip_x,
                ..Default::default()
            },
        );
    }

    fn draw_disc(&mut self, center: Vec2, radius: f32, color: Color) {
        draw_circle(center.x, center.y, radius, color);
    }

    fn view_size(&self) -> Vec2 {
        self.view
    }
}
