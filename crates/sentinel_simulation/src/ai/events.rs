//! AI Events — уведомления player collaborator'у от guard'ов
//!
//! FSM не трогает игрока напрямую: пишет события, PlayerPlugin их применяет.

use bevy::prelude::*;

/// Guard впервые увидел игрока (onSpotted, один раз за эпизод обнаружения)
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayerSpotted {
    /// Кто заметил
    pub guard: Entity,
}

/// Guard вошёл в Attack (один раз за вход в состояние)
///
/// Игрок сам обрабатывает повторную смерть идемпотентно.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayerKilled {
    pub guard: Entity,
}

/// Переход FSM (для логов и внешних наблюдателей)
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct BehaviorChanged {
    pub guard: Entity,
    pub from: &'static str,
    pub to: &'static str,
}
