//! AI systems (guard FSM tick, presentation snapshot)

pub mod fsm;
pub mod presentation;

pub use fsm::tick_guards;
pub use presentation::update_animation_signals;
