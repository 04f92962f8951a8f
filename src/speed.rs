use crate::rules::Rules;
use crate::score::Score;
use std::time::Duration;

/// Pacing constant the tick interval is derived from: a session at rate 1
/// ticks every `BASE_RATE` seconds, and the interval shrinks as the rate
/// grows.
pub const BASE_RATE: f64 = 2.0;

/// Current speed as a function of score. Grows linearly with points
/// (`step` points per unit of speed), starts at `min_speed`, and is capped
/// by `max_speed` when one is configured. The floor wins over the cap, so
/// the result is never below `min_speed`.
pub fn compute_rate(score: &Score, rules: &Rules) -> f64 {
    let mut rate = score.points as f64 / rules.step as f64 + rules.min_speed as f64;
    if rules.max_speed > 0 && rate > rules.max_speed as f64 {
        rate = rules.max_speed as f64;
    }
    rate.max(rules.min_speed as f64)
}

/// Time budget for one tick, including its input-poll window.
pub fn tick_interval(rate: f64) -> Duration {
    Duration::from_secs_f64(BASE_RATE / rate.max(1.0))
}
