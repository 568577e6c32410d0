//! 2D угловая геометрия (градусы)
//!
//! Все углы в градусах, канонический диапазон [-180, 180).
//! Нормализация нужна чтобы интерполяция аима не прыгала через ±180.

use bevy::prelude::*;

/// Нормализует угол в [-180, 180)
pub fn normalize_degrees(angle: f32) -> f32 {
    (angle + 180.0).rem_euclid(360.0) - 180.0
}

/// Кратчайшая знаковая разница `to - from` (в [-180, 180))
pub fn delta_degrees(from: f32, to: f32) -> f32 {
    normalize_degrees(to - from)
}

/// Двигает `current` к `target` по кратчайшей дуге, не больше чем на `max_delta`
///
/// Результат всегда нормализован. Если осталось меньше `max_delta` — возвращает `target`.
pub fn move_towards_degrees(current: f32, target: f32, max_delta: f32) -> f32 {
    let delta = delta_degrees(current, target);
    if delta.abs() <= max_delta {
        return normalize_degrees(target);
    }
    normalize_degrees(current + max_delta.copysign(delta))
}

/// Ping-pong: t бегает 0 → length → 0 (треугольная волна периода 2 * length)
pub fn pingpong(t: f32, length: f32) -> f32 {
    if length <= 0.0 {
        return 0.0;
    }
    let wrapped = t.rem_euclid(length * 2.0);
    length - (wrapped - length).abs()
}

/// Неориентированный угол между двумя векторами (0..=180)
///
/// Нулевой вектор даёт 0 (как Vector2.Angle в движках).
pub fn angle_between_degrees(a: Vec2, b: Vec2) -> f32 {
    let denominator = (a.length_squared() * b.length_squared()).sqrt();
    if denominator <= f32::EPSILON {
        return 0.0;
    }
    let cos = (a.dot(b) / denominator).clamp(-1.0, 1.0);
    cos.acos().to_degrees()
}

/// Единичный вектор по углу (0° = +X, 90° = +Y)
pub fn direction_from_degrees(angle: f32) -> Vec2 {
    let radians = angle.to_radians();
    Vec2::new(radians.cos(), radians.sin())
}

/// Угол вектора (atan2), нормализован
pub fn degrees_of(direction: Vec2) -> f32 {
    normalize_degrees(direction.y.atan2(direction.x).to_degrees())
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-4;

    #[test]
    fn test_normalize_wraps_into_canonical_range() {
        assert!((normalize_degrees(190.0) - -170.0).abs() < EPS);
        assert!((normalize_degrees(-190.0) - 170.0).abs() < EPS);
        assert!((normalize_degrees(720.0)).abs() < EPS);
        assert!((normalize_degrees(180.0) - -180.0).abs() < EPS);
    }

    #[test]
    fn test_delta_takes_shortest_arc() {
        // 170 → -170: через 180, а не через 0
        assert!((delta_degrees(170.0, -170.0) - 20.0).abs() < EPS);
        assert!((delta_degrees(-170.0, 170.0) - -20.0).abs() < EPS);
    }

    #[test]
    fn test_move_towards_crosses_seam_without_jump() {
        let next = move_towards_degrees(175.0, -175.0, 4.0);
        assert!((next - 179.0).abs() < EPS);

        let next = move_towards_degrees(next, -175.0, 4.0);
        assert!((next - -177.0).abs() < EPS);

        // Меньше шага — сразу на цели
        assert!((move_towards_degrees(10.0, 12.0, 5.0) - 12.0).abs() < EPS);
    }

    #[test]
    fn test_pingpong_triangle_wave() {
        assert_eq!(pingpong(0.0, 10.0), 0.0);
        assert_eq!(pingpong(5.0, 10.0), 5.0);
        assert_eq!(pingpong(10.0, 10.0), 10.0);
        assert_eq!(pingpong(15.0, 10.0), 5.0);
        assert_eq!(pingpong(20.0, 10.0), 0.0);
        assert_eq!(pingpong(3.0, 0.0), 0.0);
    }

    #[test]
    fn test_angle_between() {
        assert!((angle_between_degrees(Vec2::X, Vec2::Y) - 90.0).abs() < EPS);
        assert!((angle_between_degrees(Vec2::X, Vec2::NEG_X) - 180.0).abs() < EPS);
        assert!((angle_between_degrees(Vec2::X, Vec2::new(3.0, 4.0)) - 53.130_1).abs() < 1e-2);
        assert_eq!(angle_between_degrees(Vec2::X, Vec2::ZERO), 0.0);
    }

    #[test]
    fn test_direction_roundtrip_through_degrees() {
        for angle in [-135.0_f32, -90.0, 0.0, 45.0, 120.0] {
            let back = degrees_of(direction_from_degrees(angle));
            assert!(delta_degrees(angle, back).abs() < EPS, "angle {angle} → {back}");
        }
    }
}
