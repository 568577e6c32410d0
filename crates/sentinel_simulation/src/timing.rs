//! Tick-based таймеры поверх f32 delta
//!
//! 1/60 в f32 не точна: 120 шагов по 1/60 дают не ровно 2.0.
//! Дедлайн считается достигнутым, если до него меньше половины тика,
//! тогда N секунд при шаге dt = ровно round(N / dt) тиков.

/// Accumulator `elapsed` дошёл до `deadline`
pub fn deadline_reached(elapsed: f32, deadline: f32, delta: f32) -> bool {
    elapsed + delta * 0.5 >= deadline
}

/// Countdown `remaining` истёк
pub fn countdown_expired(remaining: f32, delta: f32) -> bool {
    remaining <= delta * 0.5
}
