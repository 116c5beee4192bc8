use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;

use crate::config::ConfigError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
pub struct AnimationSpec {
    pub frames: usize,
    #[serde(default = "default_duration")]
    pub duration: u32,
    #[serde(default = "default_looping")]
    pub looping: bool,
}

impl AnimationSpec {
    pub fn new(frames: usize, duration: u32, looping: bool) -> Self {
        Self {
            frames,
            duration,
            looping,
        }
    }
}

/// Tick-driven frame counter. Frame images live with the render collaborator.
#[derive(Clone, Debug, PartialEq)]
pub struct Animation {
    spec: AnimationSpec,
    frame: u32,
    done: bool,
}

impl Animation {
    pub fn new(spec: AnimationSpec) -> Self {
        let spec = AnimationSpec {
            frames: spec.frames.max(1),
            duration: spec.duration.max(1),
            looping: spec.looping,
        };
        Self {
            spec,
            frame: 0,
            done: false,
        }
    }

    pub fn still() -> Self {
        Self::new(AnimationSpec::new(1, 1, true))
    }

    pub fn with_frame(mut self, frame: u32) -> Self {
        self.frame = frame.min(self.total() - 1);
        self
    }

    fn total(&self) -> u32 {
        self.spec.frames as u32 * self.spec.duration
    }

    pub fn update(&mut self) {
        let total = self.total();
        if self.spec.looping {
            self.frame = (self.frame + 1) % total;
        } else {
            self.frame = (self.frame + 1).min(total - 1);
            if self.frame >= total - 1 {
                self.done = true;
            }
        }
    }

    pub fn frame_index(&self) -> usize {
        (self.frame / self.spec.duration) as usize
    }

    pub fn tick(&self) -> u32 {
        self.frame
    }

    pub fn is_done(&self) -> bool {
        self.done
    }
}

#[derive(Clone, Debug, Default)]
pub struct AnimationLibrary {
    specs: HashMap<String, AnimationSpec>,
}

impl AnimationLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: &str, spec: AnimationSpec) {
        self.specs.insert(key.to_string(), spec);
    }

    pub fn from_yaml(raw: &str) -> Result<Self, serde_yaml::Error> {
        let specs: HashMap<String, AnimationSpec> = serde_yaml::from_str(raw)?;
        Ok(Self { specs })
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Ok(Self::from_yaml(&std::fs::read_to_string(path)?)?)
    }

    pub fn spec(&self, key: &str) -> Option<AnimationSpec> {
        self.specs.get(key).copied()
    }

    /// Fresh animation for `key`; unknown keys play a single still frame.
    pub fn animation(&self, key: &str) -> Animation {
        self.spec(key).map(Animation::new).unwrap_or_else(Animation::still)
    }
}

fn default_duration() -> u32 {
    5
}

fn default_looping() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn looping_wraps_after_frames_times_duration() {
        let mut anim = Animation::new(AnimationSpec::new(3, 5, true));
        for _ in 0..14 {
            anim.update();
        }
        assert_eq!(anim.frame_index(), 2);
        anim.update();
        assert_eq!(anim.tick(), 0);
        assert!(!anim.is_done());
    }

    #[test]
    fn one_shot_clamps_and_finishes() {
        let mut anim = Animation::new(AnimationSpec::new(4, 3, false));
        for _ in 0..10 {
            anim.update();
        }
        assert!(!anim.is_done());
        anim.update();
        assert!(anim.is_done());
        assert_eq!(anim.tick(), 11);
        anim.update();
        assert_eq!(anim.tick(), 11);
        assert_eq!(anim.frame_index(), 3);
    }

    #[test]
    fn unknown_key_is_a_still_frame() {
        let lib = AnimationLibrary::new();
        let mut anim = lib.animation("ghost/idle");
        anim.update();
        assert_eq!(anim.frame_index(), 0);
    }

    #[test]
    fn library_reads_yaml_with_defaults() {
        let raw = "\
player/idle: { frames: 22, duration: 10 }
particle/leaf: { frames: 18, duration: 20, looping: false }
player/jump: { frames: 1 }
";
        let lib = AnimationLibrary::from_yaml(raw).expect("yaml");
        assert_eq!(lib.spec("player/idle"), Some(AnimationSpec::new(22, 10, true)));
        assert_eq!(lib.spec("player/jump"), Some(AnimationSpec::new(1, 5, true)));
        assert!(!lib.spec("particle/leaf").map(|s| s.looping).unwrap_or(true));
    }
}
