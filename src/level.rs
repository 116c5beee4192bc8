use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use macroquad::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::door::{Direction, Door, DoorIndex};
use crate::map::{GridIndex, MapDims, OffgridTile, Tile, TileKind, TileMap};

#[derive(Debug, Error)]
pub enum LevelLoadError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("level has no lvl.next_lvl door list")]
    MissingDoors,
    #[error("malformed tile key {0:?}")]
    BadKey(String),
    #[error("tile key {key:?} disagrees with its position {pos}")]
    KeyMismatch { key: String, pos: GridIndex },
    #[error("tile size must be positive, got {0}")]
    InvalidTileSize(u32),
    #[error("no level with index {0}")]
    UnknownLevel(usize),
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct TileRecord {
    #[serde(rename = "type")]
    kind: TileKind,
    variant: usize,
    pos: [i32; 2],
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct OffgridRecord {
    #[serde(rename = "type")]
    kind: TileKind,
    variant: usize,
    pos: [f32; 2],
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct DoorRecord {
    pos: [i32; 2],
    dir: Direction,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    next_dir: Option<Direction>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
struct LvlRecord {
    #[serde(default)]
    next_lvl: Option<Vec<DoorRecord>>,
}

/// On-disk shape of a level.
#[derive(Clone, Debug, Serialize, Deserialize)]
struct LevelFile {
    tilemap: BTreeMap<String, TileRecord>,
    tile_size: u32,
    #[serde(default)]
    offgrid: Vec<OffgridRecord>,
    #[serde(default)]
    map_dims: MapDims,
    #[serde(default)]
    lvl: Option<LvlRecord>,
}

#[derive(Clone, Debug)]
pub struct Level {
    pub map: TileMap,
    pub doors: DoorIndex,
}

impl Level {
    pub fn new(map: TileMap, doors: Vec<Door>) -> Self {
        let doors = DoorIndex::new(doors, map.tile_size());
        Self { map, doors }
    }

    pub fn from_json(raw: &str) -> Result<Self, LevelLoadError> {
        let file: LevelFile = serde_json::from_str(raw)?;
        Self::try_from(file)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, LevelLoadError> {
        Self::from_json(&std::fs::read_to_string(path)?)
    }

    pub fn to_json(&self) -> Result<String, LevelLoadError> {
        Ok(serde_json::to_string_pretty(&LevelFile::from(self))?)
    }

    pub fn to_file(&self, path: impl AsRef<Path>) -> Result<(), LevelLoadError> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }
}

impl TryFrom<LevelFile> for Level {
    type Error = LevelLoadError;

    fn try_from(file: LevelFile) -> Result<Self, Self::Error> {
        if file.tile_size == 0 {
            return Err(LevelLoadError::InvalidTileSize(file.tile_size));
        }
        let doors = file
            .lvl
            .and_then(|lvl| lvl.next_lvl)
            .ok_or(LevelLoadError::MissingDoors)?;

        let mut tiles = Vec::with_capacity(file.tilemap.len());
        for (key, record) in file.tilemap {
            let grid =
                GridIndex::parse_key(&key).ok_or_else(|| LevelLoadError::BadKey(key.clone()))?;
            let pos = GridIndex::new(record.pos[0], record.pos[1]);
            if grid != pos {
                return Err(LevelLoadError::KeyMismatch { key, pos });
            }
            tiles.push(Tile {
                kind: record.kind,
                variant: record.variant,
                pos,
            });
        }

        let offgrid = file
            .offgrid
            .into_iter()
            .map(|record| OffgridTile {
                kind: record.kind,
                variant: record.variant,
                pos: vec2(record.pos[0], record.pos[1]),
            })
            .collect();

        let doors = doors
            .into_iter()
            .map(|record| {
                let door = Door::new(GridIndex::new(record.pos[0], record.pos[1]), record.dir);
                match record.next_dir {
                    Some(next) => door.with_next_dir(next),
                    None => door,
                }
            })
            .collect();

        let map = TileMap::from_parts(file.tile_size as f32, tiles, offgrid, file.map_dims);
        Ok(Level::new(map, doors))
    }
}

impl From<&Level> for LevelFile {
    fn from(level: &Level) -> Self {
        let tilemap = level
            .map
            .tiles()
            .map(|tile| {
                let record = TileRecord {
                    kind: tile.kind.clone(),
                    variant: tile.variant,
                    pos: [tile.pos.x, tile.pos.y],
                };
                (tile.pos.key(), record)
            })
            .collect();
        let offgrid = level
            .map
            .offgrid()
            .iter()
            .map(|tile| OffgridRecord {
                kind: tile.kind.clone(),
                variant: tile.variant,
                pos: [tile.pos.x, tile.pos.y],
            })
            .collect();
        let next_lvl = level
            .doors
            .doors()
            .iter()
            .map(|door| DoorRecord {
                pos: [door.pos.x, door.pos.y],
                dir: door.dir,
                next_dir: (door.next_dir != door.dir).then_some(door.next_dir),
            })
            .collect();
        Self {
            tilemap,
            tile_size: level.map.tile_size().round() as u32,
            offgrid,
            map_dims: level.map.dims(),
            lvl: Some(LvlRecord {
                next_lvl: Some(next_lvl),
            }),
        }
    }
}

/// Where the world fetches levels by index.
pub trait LevelSource {
    fn level_count(&self) -> usize;

    fn load(&self, index: usize) -> Result<Level, LevelLoadError>;
}

/// Levels stored as `0.json`, `1.json`, ... in one directory.
#[derive(Clone, Debug)]
pub struct DirLevelSource {
    dir: PathBuf,
    count: usize,
}

impl DirLevelSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        let mut count = 0;
        while dir.join(format!("{count}.json")).is_file() {
            count += 1;
        }
        Self { dir, count }
    }

    pub fn path_for(&self, index: usize) -> PathBuf {
        self.dir.join(format!("{index}.json"))
    }
}

impl LevelSource for DirLevelSource {
    fn level_count(&self) -> usize {
        self.count
    }

    fn load(&self, index: usize) -> Result<Level, LevelLoadError> {
        if index >= self.count {
            return Err(LevelLoadError::UnknownLevel(index));
        }
        Level::from_file(self.path_for(index))
    }
}
