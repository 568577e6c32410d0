//! ECS Components для игровых entity
//!
//! Организация по доменам:
//! - actor: guard агент (Guard, Facing, DesiredVelocity, Inactive, AnimationSignals)
//! - player: цель guard'ов (Player, PlayerStatus)
//!
//! FSM/vision/patrol компоненты живут в своих модулях (ai, vision, patrol).

pub mod actor;
pub mod player;

// Re-exports для удобного импорта
pub use actor::{AnimationSignals, DesiredVelocity, Facing, Guard, Inactive};
pub use player::{Player, PlayerStatus};
