//! CollisionWorld — headless SpatialQuery поверх простых 2D коллайдеров
//!
//! Круги и axis-aligned прямоугольники, позиция = Transform.translation.xy.
//! Пересобирается каждый тик (sync_collision_world), запросы — линейный проход.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use super::{LayerMask, RayHit, SpatialQuery};
use crate::error::ConfigError;

/// Форма 2D коллайдера (центр = Transform)
#[derive(Debug, Clone, Copy, PartialEq, Reflect, Serialize, Deserialize)]
pub enum ColliderShape {
    Circle { radius: f32 },
    Rect { half_extents: Vec2 },
}

impl ColliderShape {
    pub fn validate(&self) -> Result<(), ConfigError> {
        match *self {
            ColliderShape::Circle { radius } => {
                if !(radius.is_finite() && radius > 0.0) {
                    return Err(ConfigError::InvalidCollider { field: "radius" });
                }
            }
            ColliderShape::Rect { half_extents } => {
                if !(half_extents.is_finite() && half_extents.x > 0.0 && half_extents.y > 0.0) {
                    return Err(ConfigError::InvalidCollider { field: "half_extents" });
                }
            }
        }
        Ok(())
    }
}

/// Коллайдер entity (слои = occupant tag для raycast'ов)
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub struct Collider2d {
    pub shape: ColliderShape,
    pub layers: LayerMask,
}

impl Collider2d {
    pub fn circle(radius: f32, layers: LayerMask) -> Self {
        Self {
            shape: ColliderShape::Circle { radius },
            layers,
        }
    }

    pub fn rect(half_extents: Vec2, layers: LayerMask) -> Self {
        Self {
            shape: ColliderShape::Rect { half_extents },
            layers,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct PlacedCollider {
    entity: Entity,
    center: Vec2,
    shape: ColliderShape,
    layers: LayerMask,
}

/// Snapshot коллайдеров текущего тика
#[derive(Resource, Debug, Default)]
pub struct CollisionWorld {
    colliders: Vec<PlacedCollider>,
}

impl CollisionWorld {
    pub fn insert(&mut self, entity: Entity, center: Vec2, collider: Collider2d) {
        self.colliders.push(PlacedCollider {
            entity,
            center,
            shape: collider.shape,
            layers: collider.layers,
        });
    }

    pub fn clear(&mut self) {
        self.colliders.clear();
    }

    pub fn len(&self) -> usize {
        self.colliders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colliders.is_empty()
    }
}

impl SpatialQuery for CollisionWorld {
    fn raycast_first_hit(
        &self,
        origin: Vec2,
        direction: Vec2,
        max_distance: f32,
        mask: LayerMask,
    ) -> Option<RayHit> {
        let mut best: Option<RayHit> = None;

        for collider in self.colliders.iter().filter(|c| c.layers.intersects(mask)) {
            let intersection = match collider.shape {
                ColliderShape::Circle { radius } => {
                    ray_circle(origin, direction, collider.center, radius)
                }
                ColliderShape::Rect { half_extents } => {
                    ray_rect(origin, direction, collider.center, half_extents)
                }
            };

            let Some((distance, normal)) = intersection else {
                continue;
            };
            if distance > max_distance {
                continue;
            }
            // Строго меньше: при равенстве выигрывает первый вставленный
            if best.is_some_and(|hit| hit.distance <= distance) {
                continue;
            }

            best = Some(RayHit {
                point: origin + direction * distance,
                normal,
                distance,
                entity: collider.entity,
                layers: collider.layers,
            });
        }

        best
    }

    fn overlap_circle(&self, center: Vec2, radius: f32, mask: LayerMask) -> bool {
        self.colliders
            .iter()
            .filter(|c| c.layers.intersects(mask))
            .any(|c| match c.shape {
                ColliderShape::Circle { radius: other } => {
                    c.center.distance_squared(center) < (radius + other).powi(2)
                }
                ColliderShape::Rect { half_extents } => {
                    circle_touches_rect(center, radius, c.center, half_extents)
                }
            })
    }

    fn overlap_box(&self, center: Vec2, half_extents: Vec2, mask: LayerMask) -> bool {
        self.colliders
            .iter()
            .filter(|c| c.layers.intersects(mask))
            .any(|c| match c.shape {
                ColliderShape::Circle { radius } => {
                    circle_touches_rect(c.center, radius, center, half_extents)
                }
                ColliderShape::Rect { half_extents: other } => {
                    let gap = (c.center - center).abs();
                    gap.x < half_extents.x + other.x && gap.y < half_extents.y + other.y
                }
            })
    }
}

/// Система: пересборка CollisionWorld из Collider2d + Transform
pub fn sync_collision_world(
    mut world: ResMut<CollisionWorld>,
    colliders: Query<(Entity, &Transform, &Collider2d)>,
) {
    world.clear();
    for (entity, transform, collider) in colliders.iter() {
        world.insert(entity, transform.translation.truncate(), *collider);
    }
}

/// Луч vs круг → (distance, normal). Origin внутри → (0, -direction).
fn ray_circle(origin: Vec2, direction: Vec2, center: Vec2, radius: f32) -> Option<(f32, Vec2)> {
    let offset = origin - center;
    let b = offset.dot(direction);
    let c = offset.length_squared() - radius * radius;

    // Снаружи и смотрим от круга
    if c > 0.0 && b > 0.0 {
        return None;
    }

    let discriminant = b * b - c;
    if discriminant < 0.0 {
        return None;
    }

    let distance = -b - discriminant.sqrt();
    if distance < 0.0 {
        return Some((0.0, -direction));
    }

    let point = origin + direction * distance;
    Some((distance, (point - center) / radius))
}

/// Луч vs AABB (slab method) → (distance, normal). Origin внутри → (0, -direction).
fn ray_rect(
    origin: Vec2,
    direction: Vec2,
    center: Vec2,
    half_extents: Vec2,
) -> Option<(f32, Vec2)> {
    let min = center - half_extents;
    let max = center + half_extents;

    let mut enter = f32::NEG_INFINITY;
    let mut exit = f32::INFINITY;
    let mut normal = Vec2::ZERO;

    for axis in 0..2 {
        let (o, d) = (origin[axis], direction[axis]);

        if d.abs() < f32::EPSILON {
            // Параллельно slab'у: либо внутри полосы, либо мимо
            if o < min[axis] || o > max[axis] {
                return None;
            }
            continue;
        }

        let inverse = 1.0 / d;
        let mut near = (min[axis] - o) * inverse;
        let mut far = (max[axis] - o) * inverse;
        if near > far {
            std::mem::swap(&mut near, &mut far);
        }

        if near > enter {
            enter = near;
            normal = Vec2::ZERO;
            normal[axis] = -d.signum();
        }
        exit = exit.min(far);

        if enter > exit {
            return None;
        }
    }

    if exit < 0.0 {
        return None;
    }
    if enter < 0.0 {
        return Some((0.0, -direction));
    }
    Some((enter, normal))
}

fn circle_touches_rect(circle: Vec2, radius: f32, rect_center: Vec2, half_extents: Vec2) -> bool {
    let closest = circle.clamp(rect_center - half_extents, rect_center + half_extents);
    closest.distance_squared(circle) < radius * radius
}
