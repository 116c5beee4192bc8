use macroquad::prelude::*;

use crate::entity::PlayerView;
use crate::helpers::rect_contains;
use crate::map::TileMap;
use crate::render::Canvas;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Owner {
    Player,
    Enemy,
}

/// What happened to a projectile during one step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProjectileEvent {
    Flying,
    /// Index into the enemy rect slice passed to [`Projectile::update`].
    HitEnemy(usize),
    HitPlayer,
    HitWall,
    OutOfBounds,
}

impl ProjectileEvent {
    pub fn is_alive(self) -> bool {
        self == Self::Flying
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Projectile {
    pub pos: Vec2,
    /// +1 travels right, -1 travels left.
    pub direction: f32,
    pub speed: f32,
    pub owner: Owner,
}

impl Projectile {
    pub fn new(pos: Vec2, owner: Owner, direction: f32, speed: f32) -> Self {
        Self {
            pos,
            direction: if direction < 0.0 { -1.0 } else { 1.0 },
            speed,
            owner,
        }
    }

    /// Moves one step then runs the combat checks in order: enemies, walls, bounds, player.
    pub fn update(
        &mut self,
        map: &TileMap,
        max_x: f32,
        enemies: &[Rect],
        player: Option<&PlayerView>,
    ) -> ProjectileEvent {
        self.pos.x += self.direction * self.speed;

        if self.owner == Owner::Player {
            if let Some(index) = enemies.iter().position(|rect| rect_contains(*rect, self.pos)) {
                return ProjectileEvent::HitEnemy(index);
            }
        }
        if map.solid_check(self.pos).is_some() {
            return ProjectileEvent::HitWall;
        }
        if self.pos.x < 0.0 || self.pos.x > max_x {
            return ProjectileEvent::OutOfBounds;
        }
        if let Some(player) = player {
            if self.hits_player(player) {
                return ProjectileEvent::HitPlayer;
            }
        }
        ProjectileEvent::Flying
    }

    /// Hostile shots pass through a player whose dash is at full strength.
    pub fn hits_player(&self, player: &PlayerView) -> bool {
        self.owner == Owner::Enemy && !player.dash_attack && rect_contains(player.rect, self.pos)
    }

    pub fn render(&self, canvas: &mut dyn Canvas, offset: Vec2) {
        canvas.draw_sprite("projectile", 0, self.pos - offset, self.direction < 0.0);
    }
}

/// Right edge of projectile travel: past the map or the view, whichever is wider.
pub fn travel_limit(map: &TileMap, view_width: f32, margin: f32) -> f32 {
    (map.dims().width + map.tile_size() + margin).max(view_width + margin)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::AnimationLibrary;
    use crate::config::GameConfig;
    use crate::map::{GridIndex, TileKind};
    use crate::player::Player;

    fn enemy_shot_at(x: f32, y: f32) -> Projectile {
        Projectile::new(vec2(x, y), Owner::Enemy, 1.0, 2.5)
    }

    #[test]
    fn dash_strength_decides_player_hits() {
        let config = GameConfig::default();
        let mut player = Player::new(vec2(100.0, 100.0), &config.player, &AnimationLibrary::new());
        let map = TileMap::new(16.0);

        player.dashing = 55;
        let mut shot = enemy_shot_at(95.0, 108.0);
        let event = shot.update(&map, 1000.0, &[], Some(&player.view()));
        assert_eq!(event, ProjectileEvent::Flying);

        player.dashing = 45;
        let mut shot = enemy_shot_at(95.0, 108.0);
        let event = shot.update(&map, 1000.0, &[], Some(&player.view()));
        assert_eq!(event, ProjectileEvent::HitPlayer);
    }

    #[test]
    fn player_shots_ignore_the_player_and_hit_enemies() {
        let map = TileMap::new(16.0);
        let view = PlayerView {
            pos: vec2(0.0, 0.0),
            rect: Rect::new(0.0, 0.0, 100.0, 100.0),
            dash_attack: false,
        };
        let enemies = [Rect::new(200.0, 0.0, 13.0, 16.0), Rect::new(40.0, 0.0, 13.0, 16.0)];
        let mut shot = Projectile::new(vec2(38.0, 8.0), Owner::Player, 1.0, 2.5);
        assert_eq!(shot.update(&map, 1000.0, &enemies, Some(&view)), ProjectileEvent::HitEnemy(1));

        let mut shot = Projectile::new(vec2(10.0, 8.0), Owner::Player, 1.0, 2.5);
        assert_eq!(shot.update(&map, 1000.0, &[], Some(&view)), ProjectileEvent::Flying);
    }

    #[test]
    fn enemy_shots_pass_through_enemies() {
        let map = TileMap::new(16.0);
        let enemies = [Rect::new(0.0, 0.0, 50.0, 50.0)];
        let mut shot = enemy_shot_at(10.0, 10.0);
        assert!(shot.update(&map, 1000.0, &enemies, None).is_alive());
    }

    #[test]
    fn solid_tiles_stop_shots() {
        let mut map = TileMap::new(16.0);
        map.place(GridIndex::new(2, 0), TileKind::Dungeon, 0);
        let mut shot = Projectile::new(vec2(30.0, 4.0), Owner::Player, 1.0, 2.5);
        assert_eq!(shot.update(&map, 1000.0, &[], None), ProjectileEvent::HitWall);
    }

    #[test]
    fn leaving_the_travel_band_expires() {
        let mut map = TileMap::new(16.0);
        map.place(GridIndex::new(49, 0), TileKind::Stone, 0);
        let limit = travel_limit(&map, 640.0, 6.0);
        assert_eq!(limit, 784.0 + 16.0 + 6.0);
        assert_eq!(travel_limit(&TileMap::new(16.0), 640.0, 6.0), 646.0);

        let mut shot = Projectile::new(vec2(1.0, 300.0), Owner::Enemy, -1.0, 2.5);
        assert_eq!(shot.update(&map, limit, &[], None), ProjectileEvent::OutOfBounds);
        let mut shot = Projectile::new(vec2(limit - 1.0, 300.0), Owner::Enemy, 1.0, 2.5);
        assert_eq!(shot.update(&map, limit, &[], None), ProjectileEvent::OutOfBounds);
    }
}
