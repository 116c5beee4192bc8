use macroquad::prelude::*;
use macroquad::rand::gen_range;

use crate::animation::{Animation, AnimationLibrary, AnimationSpec};
use crate::map::Placed;
use crate::render::Canvas;

const LEAF_KEY: &str = "particle/leaf";
/// One spawn roll per tick succeeds with probability `area / SPAWN_SCALE`.
const SPAWN_SCALE: f32 = 30000.0;
const CANOPY_INSET: f32 = 4.0;
const CANOPY_SIZE: Vec2 = Vec2::new(23.0, 13.0);

#[derive(Clone, Debug)]
pub struct Leaf {
    pub pos: Vec2,
    pub velocity: Vec2,
    animation: Animation,
}

impl Leaf {
    /// Returns false once the fall animation has played out.
    fn update(&mut self) -> bool {
        if self.animation.is_done() {
            return false;
        }
        self.pos += self.velocity;
        self.animation.update();
        self.pos.x += (self.animation.tick() as f32 * 0.035).sin() * 0.3;
        true
    }
}

/// Falling leaves shed by tree canopies.
#[derive(Clone, Debug, Default)]
pub struct Ambient {
    emitters: Vec<Rect>,
    leaves: Vec<Leaf>,
}

impl Ambient {
    pub fn from_canopies(canopies: &[Placed]) -> Self {
        let emitters = canopies
            .iter()
            .map(|tree| {
                Rect::new(
                    tree.pos.x + CANOPY_INSET,
                    tree.pos.y + CANOPY_INSET,
                    CANOPY_SIZE.x,
                    CANOPY_SIZE.y,
                )
            })
            .collect();
        Self {
            emitters,
            leaves: Vec::new(),
        }
    }

    pub fn emitters(&self) -> &[Rect] {
        &self.emitters
    }

    pub fn leaves(&self) -> &[Leaf] {
        &self.leaves
    }

    pub fn spawn_leaf(
        &mut self,
        pos: Vec2,
        velocity: Vec2,
        start_tick: u32,
        animations: &AnimationLibrary,
    ) {
        let spec = animations
            .spec(LEAF_KEY)
            .unwrap_or(AnimationSpec::new(18, 20, false));
        self.leaves.push(Leaf {
            pos,
            velocity,
            animation: Animation::new(spec).with_frame(start_tick),
        });
    }

    pub fn update(&mut self, animations: &AnimationLibrary) {
        for i in 0..self.emitters.len() {
            let area = self.emitters[i];
            if gen_range(0.0f32, 1.0) * SPAWN_SCALE < area.w * area.h {
                let pos = vec2(
                    area.x + gen_range(0.0, area.w),
                    area.y + gen_range(0.0, area.h),
                );
                let velocity = vec2(gen_range(0.0, 1.0), gen_range(0.0, 1.0));
                self.spawn_leaf(pos, velocity, gen_range(0, 21), animations);
            }
        }

        self.leaves.retain_mut(Leaf::update);
    }

    pub fn render(&self, canvas: &mut dyn Canvas, offset: Vec2) {
        for leaf in &self.leaves {
            canvas.draw_sprite(LEAF_KEY, leaf.animation.frame_index(), leaf.pos - offset, false);
        }
    }
}
