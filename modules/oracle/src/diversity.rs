//! Runtime geographic diversity, spec.md §4.2.3: `score = 1 - HHI` where
//! `HHI = Σᵢ (stakeᵢ/totalStake)²` aggregated by region.

use std::collections::BTreeMap;

use paw_errors::CommonError;
use paw_types::{Amount, Ratio};

fn overflow(context: &str) -> CommonError {
    CommonError::Overflow {
        context: context.to_string(),
    }
}

fn total(stakes_by_region: &BTreeMap<String, Amount>) -> Result<Amount, CommonError> {
    stakes_by_region
        .values()
        .try_fold(Amount::zero(), |acc, s| acc.checked_add(*s))
        .map_err(|_| overflow("total regional stake overflow"))
}

/// `stakeᵢ / totalStake` for one region.
pub fn regional_share(stakes_by_region: &BTreeMap<String, Amount>, region: &str) -> Result<Ratio, CommonError> {
    let total_stake = total(stakes_by_region)?;
    if total_stake.is_zero() {
        return Ok(Ratio::zero());
    }
    let region_stake = stakes_by_region.get(region).copied().unwrap_or_else(Amount::zero);
    Ratio::checked_from_ratio(region_stake, total_stake).map_err(|_| overflow("region_stake / total_stake"))
}

pub fn hhi(stakes_by_region: &BTreeMap<String, Amount>) -> Result<Ratio, CommonError> {
    let total_stake = total(stakes_by_region)?;
    if total_stake.is_zero() {
        return Ok(Ratio::zero());
    }
    let mut sum = Ratio::zero();
    for stake in stakes_by_region.values() {
        let share = Ratio::checked_from_ratio(*stake, total_stake).map_err(|_| overflow("stake / total"))?;
        let sq = share.checked_mul(share).map_err(|_| overflow("share^2"))?;
        sum = sum.checked_add(sq).map_err(|_| overflow("hhi accumulate"))?;
    }
    Ok(sum)
}

pub fn diversity_score(stakes_by_region: &BTreeMap<String, Amount>) -> Result<Ratio, CommonError> {
    Ok(Ratio::one() - hhi(stakes_by_region)?)
}

/// Simulates adding `additional_stake` to `region` and returns the
/// resulting diversity score and that region's post-addition share,
/// without mutating the caller's map. Used by registration/first
/// submission to test admission before committing (spec.md §4.2.3).
pub fn simulate_addition(
    stakes_by_region: &BTreeMap<String, Amount>,
    region: &str,
    additional_stake: Amount,
) -> Result<(Ratio, Ratio), CommonError> {
    let mut projected = stakes_by_region.clone();
    let entry = projected.entry(region.to_string()).or_insert_with(Amount::zero);
    *entry = entry.checked_add(additional_stake).map_err(|_| overflow("projected region stake overflow"))?;
    let score = diversity_score(&projected)?;
    let share = regional_share(&projected, region)?;
    Ok((score, share))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_region_has_zero_diversity() {
        let mut stakes = BTreeMap::new();
        stakes.insert("us".to_string(), Amount::from(1_000u64));
        assert_eq!(diversity_score(&stakes).unwrap(), Ratio::zero());
    }

    #[test]
    fn evenly_split_regions_score_high() {
        let mut stakes = BTreeMap::new();
        stakes.insert("us".to_string(), Amount::from(500u64));
        stakes.insert("eu".to_string(), Amount::from(500u64));
        // HHI = 0.25 + 0.25 = 0.5, score = 0.5
        assert_eq!(diversity_score(&stakes).unwrap(), Ratio::percent(50));
    }

    #[test]
    fn simulate_addition_does_not_mutate_input() {
        let mut stakes = BTreeMap::new();
        stakes.insert("us".to_string(), Amount::from(1_000u64));
        let before = stakes.clone();
        simulate_addition(&stakes, "eu", Amount::from(500u64)).unwrap();
        assert_eq!(stakes, before);
    }
}
