//! Deviation-based slashing, spec.md §4.2. Runs immediately after
//! aggregation against the freshly computed `PriceFeed.aggregatedPrice`.

use paw_errors::CommonError;
use paw_types::{Amount, Ratio};

fn overflow(context: &str) -> CommonError {
    CommonError::Overflow {
        context: context.to_string(),
    }
}

/// `|submitted - aggregated| / aggregated > deviationThreshold`.
pub fn deviates(deviation_threshold: Ratio, submitted: Ratio, aggregated: Ratio) -> bool {
    if aggregated.is_zero() {
        return false;
    }
    let diff = if submitted >= aggregated {
        submitted - aggregated
    } else {
        aggregated - submitted
    };
    diff / aggregated > deviation_threshold
}

/// `slashAmount = validator.bondedPower * slashFraction`.
pub fn slash_amount(bonded_power: Amount, slash_fraction: Ratio) -> Result<Amount, CommonError> {
    let power_decimal = Ratio::checked_from_ratio(bonded_power, 1u128).map_err(|_| overflow("bonded_power as Decimal256"))?;
    let amount = power_decimal
        .checked_mul(slash_fraction)
        .map_err(|_| overflow("bonded_power * slash_fraction"))?;
    Ok(amount.to_uint_floor())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slash_amount_matches_fraction() {
        let amount = slash_amount(Amount::from(1_000_000u64), Ratio::percent(1)).unwrap();
        assert_eq!(amount, Amount::from(10_000u64));
    }

    #[test]
    fn deviation_checked_against_aggregated() {
        let aggregated = Ratio::from_ratio(100u64, 1u64);
        assert!(deviates(Ratio::percent(5), Ratio::from_ratio(5000u64, 1u64), aggregated));
        assert!(!deviates(Ratio::percent(5), Ratio::from_ratio(102u64, 1u64), aggregated));
    }
}
