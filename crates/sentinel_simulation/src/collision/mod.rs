//! Collision queries — raycast/overlap capability для vision и backstab
//!
//! ## Слои (битовая маска):
//! - Layer 2 (0b10 = 2): Player
//! - Layer 3 (0b100 = 4): Obstacle (стены, укрытия — блокируют зрение)
//! - Layer 4 (0b1000 = 8): Guard
//! - Layer 5 (0b10000 = 16): Platform (проходимые платформы)
//!
//! Vision кастует луч по маске `occluders | targets` и принимает только если
//! ПЕРВЫЙ hit лежит на target слое.

use std::ops::BitOr;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::SimulationSet;

pub mod world;


pub use world::{Collider2d, ColliderShape, CollisionWorld, sync_collision_world};

/// Битовая маска collision слоёв
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Reflect, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LayerMask(pub u32);

impl LayerMask {
    pub const NONE: Self = Self(0);
    pub const PLAYER: Self = Self(0b10);
    pub const OBSTACLE: Self = Self(0b100);
    pub const GUARD: Self = Self(0b1000);
    pub const PLATFORM: Self = Self(0b1_0000);

    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    pub const fn intersects(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Название слоя для debug логов
    pub fn name(self) -> &'static str {
        match self {
            Self::NONE => "None",
            Self::PLAYER => "Player",
            Self::OBSTACLE => "Obstacle",
            Self::GUARD => "Guard",
            Self::PLATFORM => "Platform",
            _ => "Mixed",
        }
    }
}

impl BitOr for LayerMask {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        self.union(rhs)
    }
}

/// Результат raycast'а: ближайшее пересечение
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    pub point: Vec2,
    pub normal: Vec2,
    /// Расстояние от origin вдоль луча
    pub distance: f32,
    /// Владелец коллайдера
    pub entity: Entity,
    /// Слои коллайдера (occupant tag)
    pub layers: LayerMask,
}

/// Spatial query capability (внешний physics collaborator)
///
/// `direction` ожидается нормализованным. Реализации фильтруют коллайдеры по
/// `mask` (пересечение слоёв) и возвращают только попадания в пределах `max_distance`.
pub trait SpatialQuery {
    fn raycast_first_hit(
        &self,
        origin: Vec2,
        direction: Vec2,
        max_distance: f32,
        mask: LayerMask,
    ) -> Option<RayHit>;

    fn overlap_circle(&self, center: Vec2, radius: f32, mask: LayerMask) -> bool;

    fn overlap_box(&self, center: Vec2, half_extents: Vec2, mask: LayerMask) -> bool;
}

/// Collision Plugin
///
/// Пересобирает CollisionWorld из Collider2d + Transform в начале каждого тика,
/// до того как guard'ы начнут думать.
pub struct CollisionPlugin;

impl Plugin for CollisionPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<CollisionWorld>()
            .add_systems(
                FixedUpdate,
                sync_collision_world.in_set(SimulationSet::Collision),
            );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layer_union_and_intersection() {
        let vision_mask = LayerMask::OBSTACLE | LayerMask::PLAYER;
        assert!(vision_mask.intersects(LayerMask::PLAYER));
        assert!(vision_mask.intersects(LayerMask::OBSTACLE));
        assert!(!vision_mask.intersects(LayerMask::GUARD));
        assert!(LayerMask::NONE.is_empty());
    }

    #[test]
    fn test_layer_names() {
        assert_eq!(LayerMask::PLAYER.name(), "Player");
        assert_eq!(LayerMask::OBSTACLE.name(), "Obstacle");
        assert_eq!((LayerMask::PLAYER | LayerMask::GUARD).name(), "Mixed");
    }
}
