use macroquad::prelude::*;

/// Draw target handed to every `render(canvas, offset)` call.
///
/// Sprites are addressed by asset key (`"grass"`, `"player/idle"`, `"projectile"`) and a
/// frame/variant index. Implementations silently skip keys or indices they do not know.
pub trait Canvas {
    fn draw_sprite(&mut self, key: &str, frame: usize, pos: Vec2, flip_x: bool);

    fn draw_disc(&mut self, center: Vec2, radius: f32, color: Color);

    /// Size of the visible area in world units.
    fn view_size(&self) -> Vec2;
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;

    #[derive(Clone, Debug, PartialEq)]
    pub enum DrawCall {
        Sprite {
            key: String,
            frame: usize,
            pos: Vec2,
            flip_x: bool,
        },
        Disc {
            center: Vec2,
            radius: f32,
        },
    }

    pub struct RecordingCanvas {
        pub size: Vec2,
        pub calls: Vec<DrawCall>,
    }

    impl RecordingCanvas {
        pub fn new(w: f32, h: f32) -> Self {
            Self {
                size: vec2(w, h),
                calls: Vec::new(),
            }
        }

        pub fn sprites(&self) -> Vec<(&str, usize, Vec2)> {
            self.calls
                .iter()
                .filter_map(|call| match call {
                    DrawCall::Sprite { key, frame, pos, .. } => Some((key.as_str(), *frame, *pos)),
                    DrawCall::Disc { .. } => None,
                })
                .collect()
        }
    }

    impl Canvas for RecordingCanvas {
        fn draw_sprite(&mut self, key: &str, frame: usize, pos: Vec2, flip_x: bool) {
            self.calls.push(DrawCall::Sprite {
                key: key.to_string(),
                frame,
                pos,
                flip_x,
            });
        }

        fn draw_disc(&mut self, center: Vec2, radius: f32, _color: Color) {
            self.calls.push(DrawCall::Disc { center, radius });
        }

        fn view_size(&self) -> Vec2 {
            self.size
        }
    }
}
