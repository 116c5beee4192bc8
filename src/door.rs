use macroquad::prelude::*;
use serde::{Deserialize, Serialize};

use crate::helpers::rects_collide;
use crate::map::GridIndex;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    #[serde(rename = "l", alias = "left")]
    Left,
    #[serde(rename = "r", alias = "right")]
    Right,
    #[serde(rename = "u", alias = "up")]
    Up,
    #[serde(rename = "d", alias = "down")]
    Down,
}

impl Direction {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
            Self::Up => "up",
            Self::Down => "down",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Door {
    pub pos: GridIndex,
    pub dir: Direction,
    /// Side the player enters the next level from.
    pub next_dir: Direction,
}

impl Door {
    pub fn new(pos: GridIndex, dir: Direction) -> Self {
        Self { pos, dir, next_dir: dir }
    }

    pub fn with_next_dir(mut self, next_dir: Direction) -> Self {
        self.next_dir = next_dir;
        self
    }

    /// Side doors are one tile wide and three tall, top and bottom doors three wide and one
    /// tall, both centered on the trigger tile.
    pub fn rect(&self, tile_size: f32) -> Rect {
        let x = self.pos.x as f32 * tile_size;
        let y = self.pos.y as f32 * tile_size;
        match self.dir {
            Direction::Left | Direction::Right => {
                Rect::new(x, y - tile_size, tile_size, tile_size * 3.0)
            }
            Direction::Up | Direction::Down => {
                Rect::new(x - tile_size, y, tile_size * 3.0, tile_size)
            }
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct DoorIndex {
    doors: Vec<Door>,
    tile_size: f32,
}

impl DoorIndex {
    pub fn new(doors: Vec<Door>, tile_size: f32) -> Self {
        Self { doors, tile_size }
    }

    pub fn doors(&self) -> &[Door] {
        &self.doors
    }

    pub fn len(&self) -> usize {
        self.doors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.doors.is_empty()
    }

    /// First door, in list order, whose trigger overlaps `player`.
    pub fn check(&self, player: Rect) -> Option<&Door> {
        self.doors
            .iter()
            .find(|door| rects_collide(door.rect(self.tile_size), player))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn side_door_is_one_by_three() {
        let door = Door::new(GridIndex::new(2, 5), Direction::Left);
        assert_eq!(door.rect(16.0), Rect::new(32.0, 64.0, 16.0, 48.0));
        let door = Door::new(GridIndex::new(2, 5), Direction::Right);
        assert_eq!(door.rect(16.0), Rect::new(32.0, 64.0, 16.0, 48.0));
    }

    #[test]
    fn top_door_is_three_by_one() {
        let door = Door::new(GridIndex::new(2, 5), Direction::Up);
        assert_eq!(door.rect(16.0), Rect::new(16.0, 80.0, 48.0, 16.0));
        let door = Door::new(GridIndex::new(2, 5), Direction::Down);
        assert_eq!(door.rect(16.0), Rect::new(16.0, 80.0, 48.0, 16.0));
    }

    #[test]
    fn check_returns_first_match_in_list_order() {
        let index = DoorIndex::new(
            vec![
                Door::new(GridIndex::new(0, 1), Direction::Left).with_next_dir(Direction::Right),
                Door::new(GridIndex::new(1, 1), Direction::Down),
                Door::new(GridIndex::new(30, 1), Direction::Right),
            ],
            16.0,
        );
        let hit = index.check(Rect::new(10.0, 18.0, 13.0, 16.0));
        assert_eq!(hit.map(|d| d.next_dir), Some(Direction::Right));
        assert!(index.check(Rect::new(200.0, 200.0, 13.0, 16.0)).is_none());
    }

    #[test]
    fn directions_accept_short_and_long_names() {
        let short: Direction = serde_json::from_str("\"u\"").expect("short");
        let long: Direction = serde_json::from_str("\"down\"").expect("long");
        assert_eq!(short, Direction::Up);
        assert_eq!(long, Direction::Down);
        assert_eq!(serde_json::to_string(&Direction::Left).expect("json"), "\"l\"");
    }
}
