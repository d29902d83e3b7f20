//! Per-pool circuit breaker state machine, spec.md §4.1. `Normal` and
//! `Paused` are the only states; the single `paused_until` field is the
//! sole authority for when a pause lifts, so the time-based and explicit
//! unpause paths can never disagree (spec.md §9 open question).

use paw_types::{Amount, Ratio};

use crate::types::{CircuitBreakerConfig, CircuitBreakerState};

pub fn trigger(cb: &mut CircuitBreakerConfig, now: u64, pause_seconds: u64, reason: &str, by: Option<String>) {
    cb.state = CircuitBreakerState::Paused;
    cb.paused_until = now.saturating_add(pause_seconds);
    cb.trigger_reason = Some(reason.to_string());
    cb.triggered_by = by;
}

/// Explicit unpause message: sets `paused_until` to `now`, so `is_paused`
/// reads `Normal` from this point on regardless of which path fires.
pub fn reset(cb: &mut CircuitBreakerConfig, now: u64) {
    cb.state = CircuitBreakerState::Normal;
    cb.paused_until = now;
    cb.trigger_reason = None;
    cb.triggered_by = None;
}

/// Rolls the volume-accounting window forward if it has elapsed, folding
/// in this swap's volume either way. Returns the window's running total
/// after this swap.
pub fn record_volume(cb: &mut CircuitBreakerConfig, now: u64, amount: Amount) -> Amount {
    if now.saturating_sub(cb.window_started_at) > cb.volume_window_seconds {
        cb.window_started_at = now;
        cb.window_volume = amount;
    } else {
        cb.window_volume = cb.window_volume.checked_add(amount).unwrap_or(Amount::MAX);
    }
    cb.window_volume
}

pub fn volume_exceeded(cb: &CircuitBreakerConfig) -> bool {
    cb.window_volume > cb.max_volume_per_window
}

/// Rolling price deviation against the window's reference price. A zero
/// reference price means no baseline has been observed yet.
pub fn price_deviation_exceeded(cb: &CircuitBreakerConfig, current_price: Ratio) -> bool {
    if cb.reference_price.is_zero() {
        return false;
    }
    let diff = if current_price >= cb.reference_price {
        current_price - cb.reference_price
    } else {
        cb.reference_price - current_price
    };
    let deviation = diff / cb.reference_price;
    deviation > cb.max_price_deviation
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trigger_then_time_based_unpause() {
        let mut cb = CircuitBreakerConfig::for_pool(1, Ratio::percent(10), Amount::from(1_000_000u64));
        trigger(&mut cb, 100, 3600, "volume spike", None);
        assert!(cb.is_paused(200));
        assert!(!cb.is_paused(3701));
    }

    #[test]
    fn explicit_unpause_takes_effect_immediately() {
        let mut cb = CircuitBreakerConfig::for_pool(1, Ratio::percent(10), Amount::from(1_000_000u64));
        trigger(&mut cb, 100, 3600, "manual", Some("authority".to_string()));
        reset(&mut cb, 150);
        assert!(!cb.is_paused(150));
    }

    #[test]
    fn volume_window_rolls_over() {
        let mut cb = CircuitBreakerConfig::for_pool(1, Ratio::percent(10), Amount::from(100u64));
        record_volume(&mut cb, 0, Amount::from(60u64));
        record_volume(&mut cb, 10, Amount::from(60u64));
        assert!(volume_exceeded(&cb));
        record_volume(&mut cb, 3700, Amount::from(5u64));
        assert!(!volume_exceeded(&cb));
    }
}
