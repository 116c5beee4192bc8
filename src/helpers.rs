use macroquad::prelude::*;

pub fn asset_path(path: &str) -> String {
    path.trim_start_matches("./").to_string()
}

/// Floor division toward negative infinity. `-1 / 16` lands in cell `-1`, not `0`.
pub fn floor_div(value: f32, size: f32) -> i32 {
    (value / size).floor() as i32
}

/// Strict overlap test: rects that only share an edge do not collide.
pub fn rects_collide(a: Rect, b: Rect) -> bool {
    if a.w <= 0.0 || a.h <= 0.0 || b.w <= 0.0 || b.h <= 0.0 {
        return false;
    }
    a.x < b.x + b.w && a.x + a.w > b.x && a.y < b.y + b.h && a.y + a.h > b.y
}

/// Half-open point test, `[x, x + w) × [y, y + h)`.
pub fn rect_contains(rect: Rect, point: Vec2) -> bool {
    point.x >= rect.x && point.x < rect.x + rect.w && point.y >= rect.y && point.y < rect.y + rect.h
}

pub fn rect_center(rect: Rect) -> Vec2 {
    vec2(rect.x + rect.w * 0.5, rect.y + rect.h * 0.5)
}

pub fn signum_or_zero(value: f32) -> f32 {
    if value > 0.0 {
        1.0
    } else if value < 0.0 {
        -1.0
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn floor_div_rounds_toward_negative_infinity() {
        assert_eq!(floor_div(0.0, 16.0), 0);
        assert_eq!(floor_div(15.9, 16.0), 0);
        assert_eq!(floor_div(16.0, 16.0), 1);
        assert_eq!(floor_div(-0.5, 16.0), -1);
        assert_eq!(floor_div(-16.0, 16.0), -1);
        assert_eq!(floor_div(-16.5, 16.0), -2);
    }

    #[test]
    fn touching_edges_do_not_collide() {
        let a = Rect::new(0.0, 0.0, 16.0, 16.0);
        let b = Rect::new(16.0, 0.0, 16.0, 16.0);
        assert!(!rects_collide(a, b));
        let c = Rect::new(15.5, 4.0, 16.0, 16.0);
        assert!(rects_collide(a, c));
    }

    #[test]
    fn zero_sized_rect_never_collides() {
        let a = Rect::new(0.0, 0.0, 16.0, 16.0);
        assert!(!rects_collide(a, Rect::new(4.0, 4.0, 0.0, 4.0)));
    }

    #[test]
    fn contains_is_half_open() {
        let r = Rect::new(10.0, 10.0, 5.0, 5.0);
        assert!(rect_contains(r, vec2(10.0, 10.0)));
        assert!(!rect_contains(r, vec2(15.0, 12.0)));
    }
}
