//! Patrol module — авторские маршруты guard'ов

pub mod route;


pub use route::{
    PatrolRoute, RouteMode, RouteStep, Waypoint, WaypointCursor, DEFAULT_ARRIVAL_THRESHOLD,
};
