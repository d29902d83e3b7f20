//! MEV-resistance guards, spec.md §4.1 guards 3-5. Deadline enforcement
//! (guard 1) and the price-impact cap (guard 2) live next to the swap
//! math in `keeper.rs`; commit-reveal (guard 6) lives in `keeper.rs` too,
//! since it is a message pair rather than an admission check.

use paw_types::{Amount, Ratio};

use crate::types::Trade;

/// Guard 5: a trader's swaps within `max_reordering_window` seconds of
/// each other must carry non-decreasing timestamps.
pub fn check_timestamp_ordering(last_timestamp: Option<u64>, now: u64, max_reordering_window: u64) -> bool {
    match last_timestamp {
        None => true,
        Some(last) => {
            if now.saturating_sub(last) <= max_reordering_window || last.saturating_sub(now) <= max_reordering_window {
                now >= last
            } else {
                true
            }
        }
    }
}

/// `a / b >= ratio`, computed with checked big-integer arithmetic
/// (`a * ratio.denominator() >= b * ratio.numerator()`), never panicking.
fn meets_ratio(a: Amount, b: Amount, ratio: Ratio) -> bool {
    if b.is_zero() {
        return !a.is_zero();
    }
    let lhs = a.checked_mul(ratio.denominator());
    let rhs = b.checked_mul(ratio.numerator());
    matches!((lhs, rhs), (Ok(l), Ok(r)) if l >= r)
}

/// Guard 3: sandwich detection. Scans the bounded recent-trade cache for
/// an open leg by `trader` (opposite direction of the swap under
/// admission), a victim trade from a different trader in between, and
/// confirms the open leg and the swap under admission are both at least
/// `min_ratio` times the victim's size. Returns the highest confidence
/// found among matching triples, or `None` if no pattern matches.
pub fn detect_sandwich(
    recent: &[Trade],
    trader: &str,
    token_in: &str,
    amount_in: Amount,
    now: u64,
    window_seconds: u64,
    min_ratio: Ratio,
) -> Option<Ratio> {
    let mut best: Option<Ratio> = None;

    for (i, opening) in recent.iter().enumerate() {
        if opening.trader != trader || opening.token_in == token_in {
            continue;
        }
        if now.saturating_sub(opening.timestamp) > window_seconds {
            continue;
        }

        for victim in recent.iter().skip(i + 1) {
            if victim.trader == trader {
                continue;
            }
            if victim.timestamp < opening.timestamp || victim.timestamp > now {
                continue;
            }
            if !meets_ratio(opening.amount_in, victim.amount_in, min_ratio)
                || !meets_ratio(amount_in, victim.amount_in, min_ratio)
            {
                continue;
            }

            let elapsed = now.saturating_sub(opening.timestamp);
            let confidence = sandwich_confidence(elapsed, window_seconds);
            best = Some(match best {
                Some(b) if b >= confidence => b,
                _ => confidence,
            });
        }
    }

    best
}

/// 40% time proximity (closer to the open leg is more suspicious) + 60%
/// fixed weight for having matched the size-ratio gate at all.
fn sandwich_confidence(elapsed_seconds: u64, window_seconds: u64) -> Ratio {
    let time_component = if window_seconds == 0 {
        Ratio::zero()
    } else if elapsed_seconds >= window_seconds {
        Ratio::zero()
    } else {
        Ratio::one() - Ratio::from_ratio(elapsed_seconds, window_seconds)
    };
    time_component
        .checked_mul(Ratio::percent(40))
        .unwrap_or_default()
        .checked_add(Ratio::percent(60))
        .unwrap_or_default()
}

/// Guard 4: front-running detection, monitoring-only. A large same-block
/// predecessor trade in the same direction ahead of a smaller trade is
/// logged and eventable but never blocks admission.
pub fn detect_front_running(recent: &[Trade], token_in: &str, amount_in: Amount, height: u64, min_ratio: Ratio) -> bool {
    recent
        .iter()
        .any(|t| t.height == height && t.token_in == token_in && meets_ratio(t.amount_in, amount_in, min_ratio))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trade(trader: &str, token_in: &str, amount_in: u64, timestamp: u64, height: u64) -> Trade {
        Trade {
            trader: trader.to_string(),
            amount_in: Amount::from(amount_in),
            amount_out: Amount::from(1u64),
            token_in: token_in.to_string(),
            timestamp,
            height,
        }
    }

    #[test]
    fn detects_classic_sandwich() {
        let recent = vec![
            trade("attacker", "upaw", 500_000, 0, 1),
            trade("victim", "upaw", 10_000, 5, 1),
        ];
        let confidence = detect_sandwich(
            &recent,
            "attacker",
            "uusdt",
            Amount::from(500_000u64),
            8,
            60,
            Ratio::from_ratio(2u64, 1u64),
        );
        assert!(confidence.is_some());
        assert!(confidence.unwrap() >= Ratio::percent(70));
    }

    #[test]
    fn no_sandwich_without_victim() {
        let recent = vec![trade("attacker", "upaw", 500_000, 0, 1)];
        let confidence = detect_sandwich(
            &recent,
            "attacker",
            "uusdt",
            Amount::from(500_000u64),
            8,
            60,
            Ratio::from_ratio(2u64, 1u64),
        );
        assert!(confidence.is_none());
    }

    #[test]
    fn timestamp_ordering_rejects_regression_within_window() {
        assert!(!check_timestamp_ordering(Some(100), 90, 30));
        assert!(check_timestamp_ordering(Some(100), 110, 30));
        assert!(check_timestamp_ordering(Some(100), 50, 30));
    }
}
