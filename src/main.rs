use log::{error, info, warn};
use macroquad::miniquad::conf::Platform;
use macroquad::prelude::*;

mod assets;

use assets::TextureStore;
use tilerunner::animation::AnimationLibrary;
use tilerunner::config::GameConfig;
use tilerunner::helpers::asset_path;
use tilerunner::level::{DirLevelSource, LevelSource};
use tilerunner::world::{FrameInput, World};

const TICK: f32 = 1.0 / 60.0;
const MAX_TICKS_PER_FRAME: u32 = 5;
const BACKGROUND: Color = Color::new(0.05, 0.06, 0.1, 1.0);

fn window_conf() -> Conf {
    Conf {
        window_title: "tilerunner".to_owned(),
        window_width: 1280,
        window_height: 700,
        sample_count: 1,
        platform: Platform {
            linux_wm_class: "tilerunner",
            ..Default::default()
        },
        ..Default::default()
    }
}

/// Screen-space camera showing the logical `view` area regardless of window size.
fn view_camera(view: Vec2) -> Camera2D {
    Camera2D {
        target: view * 0.5,
        zoom: vec2(2.0 / view.x.max(1.0), 2.0 / view.y.max(1.0)),
        ..Default::default()
    }
}

/// Edge-triggered actions and the held direction, sampled once per frame.
fn read_input() -> FrameInput {
    let mut movement = 0.0;
    if is_key_down(KeyCode::Right) {
        movement += 1.0;
    }
    if is_key_down(KeyCode::Left) {
        movement -= 1.0;
    }
    FrameInput {
        movement,
        jump: is_key_pressed(KeyCode::Up),
        dash: is_key_pressed(KeyCode::X),
        shoot: is_key_pressed(KeyCode::Z),
        throw: is_key_pressed(KeyCode::C),
    }
}

fn draw_fade(radius: Option<f32>, view: Vec2) {
    let Some(radius) = radius else {
        return;
    };
    let full = view.length() * 0.5;
    let alpha = (1.0 - radius / full).clamp(0.0, 1.0);
    draw_rectangle(0.0, 0.0, view.x, view.y, Color::new(0.0, 0.0, 0.0, alpha));
}

#[macroquad::main(window_conf)]
async fn main() {
    env_logger::init();
    macroquad::rand::srand(macroquad::miniquad::date::now() as u64);

    let config = GameConfig::load(asset_path("data/config.yaml")).unwrap_or_else(|err| {
        warn!("config load failed, using defaults: {err}");
        GameConfig::default()
    });
    let animations =
        AnimationLibrary::load(asset_path("data/animations.yaml")).unwrap_or_else(|err| {
            warn!("animation table load failed, sprites will not animate: {err}");
            AnimationLibrary::new()
        });

    let view = config.display.size();
    let source = DirLevelSource::new(asset_path("data/maps"));
    info!("{} levels found", source.level_count());

    let mut world = match World::new(config, animations, Box::new(source), 0) {
        Ok(world) => world,
        Err(err) => {
            error!("first level failed to load: {err}");
            return;
        }
    };
    let mut canvas = TextureStore::load(view).await;
    let camera = view_camera(view);

    let mut accumulator = 0.0f32;
    let mut pending = FrameInput::default();
    loop {
        let sampled = read_input();
        pending.movement = sampled.movement;
        pending.jump |= sampled.jump;
        pending.dash |= sampled.dash;
        pending.shoot |= sampled.shoot;
        pending.throw |= sampled.throw;

        accumulator += get_frame_time();
        let mut steps = 0;
        while accumulator >= TICK && steps < MAX_TICKS_PER_FRAME {
            world.tick(&pending);
            // Presses are consumed by the first tick that sees them.
            pending = FrameInput {
                movement: pending.movement,
                ..FrameInput::default()
            };
            accumulator -= TICK;
            steps += 1;
        }
        if steps == MAX_TICKS_PER_FRAME {
            accumulator = 0.0;
        }

        set_camera(&camera);
        clear_background(BACKGROUND);
        world.render(&mut canvas);
        draw_fade(world.fade_radius(), view);
        set_default_camera();

        next_frame().await;
    }
}
