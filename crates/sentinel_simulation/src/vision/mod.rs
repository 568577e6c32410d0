//! Vision module — обнаружение игрока guard'ами
//!
//! Чистая логика без систем: VisionSensor тикается из AI FSM
//! (только в Patrol), collision capability приходит параметром.

pub mod config;
pub mod sensor;
pub mod sweep;


pub use config::VisionConfig;
pub use sensor::{is_target_visible, VisionSensor};
pub use sweep::{AimPoint, FacingStrategy, SweepPause, AIM_TOLERANCE_DEGREES, DEFAULT_SWEEP_SPEED};
