//! Player компоненты (внешний collaborator, минимальная headless версия)

use bevy::prelude::*;

/// Маркер игрока — цель для всех guard'ов
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
#[require(Transform, PlayerStatus)]
pub struct Player;

/// Статус игрока с точки зрения guard'ов
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct PlayerStatus {
    /// Заметили — input игрока заморожен, backstab недоступен
    pub spotted: bool,
    /// Осталось до PlayerDied (секунды); Some = death animation идёт
    pub dying: Option<f32>,
}

impl PlayerStatus {
    pub fn is_dying(&self) -> bool {
        self.dying.is_some()
    }
}
