//! AI components: BehaviorState (FSM) и BehaviorConfig (telegraph, strike range)

pub mod fsm;


pub use fsm::{BehaviorConfig, BehaviorState};
