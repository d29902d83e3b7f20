//! Stake-weighted price aggregation with outlier rejection, spec.md §4.2
//! and §9's first open question.
//!
//! **Resolution of the open question** ("weighted-median outlier rule
//! admits several plausible definitions... pick one, document it, keep it
//! stable"): k-sigma against the weighted mean, computed **leave-one-out**
//! per candidate rather than over the full set including the candidate.
//! A single extreme submission inflates a full-set mean/variance enough
//! to mask its own deviation (the "masking" failure mode of naive sigma
//! clipping) — for n=5 equal-weight submissions this can put the outlier
//! almost exactly on a k=2 boundary. Leave-one-out tests each candidate
//! against statistics computed from every *other* submission, which does
//! not suffer from masking and is still a k-sigma rule in the sense
//! spec.md asks to pick and hold stable.

use paw_errors::CommonError;
use paw_types::{Amount, Ratio};

#[derive(Clone, Debug, PartialEq)]
pub struct Submission {
    pub validator: String,
    pub price: Ratio,
    pub weight: Amount,
}

#[derive(Clone, Debug, PartialEq)]
pub struct AggregationOutcome {
    pub aggregated_price: Ratio,
    pub accepted: Vec<String>,
    pub outliers: Vec<String>,
}

fn overflow(context: &str) -> CommonError {
    CommonError::Overflow {
        context: context.to_string(),
    }
}

fn weight_decimal(weight: Amount) -> Result<Ratio, CommonError> {
    Ratio::checked_from_ratio(weight, 1u128).map_err(|_| overflow("weight does not fit a Decimal256"))
}

fn abs_diff(a: Ratio, b: Ratio) -> Ratio {
    if a >= b {
        a - b
    } else {
        b - a
    }
}

/// Weighted mean and (population) variance over `submissions`.
fn weighted_mean_variance(submissions: &[&Submission]) -> Result<(Ratio, Ratio), CommonError> {
    let mut weighted_sum = Ratio::zero();
    let mut weight_sum = Ratio::zero();
    for s in submissions {
        let w = weight_decimal(s.weight)?;
        weighted_sum = weighted_sum
            .checked_add(w.checked_mul(s.price).map_err(|_| overflow("weight * price"))?)
            .map_err(|_| overflow("weighted_sum + w*price"))?;
        weight_sum = weight_sum.checked_add(w).map_err(|_| overflow("weight_sum + w"))?;
    }
    if weight_sum.is_zero() {
        return Err(overflow("zero total weight"));
    }
    let mean = weighted_sum.checked_div(weight_sum).map_err(|_| overflow("weighted_sum / weight_sum"))?;

    let mut weighted_sq = Ratio::zero();
    for s in submissions {
        let w = weight_decimal(s.weight)?;
        let diff = abs_diff(s.price, mean);
        let sq = diff.checked_mul(diff).map_err(|_| overflow("diff * diff"))?;
        weighted_sq = weighted_sq
            .checked_add(w.checked_mul(sq).map_err(|_| overflow("w * diff^2"))?)
            .map_err(|_| overflow("weighted_sq accumulate"))?;
    }
    let variance = weighted_sq.checked_div(weight_sum).map_err(|_| overflow("weighted_sq / weight_sum"))?;
    Ok((mean, variance))
}

/// Stake-weighted median: sorted ascending by price, the price at which
/// cumulative weight first reaches half the total weight.
fn weighted_median(mut accepted: Vec<&Submission>) -> Result<Ratio, CommonError> {
    accepted.sort_by(|a, b| a.price.cmp(&b.price));
    let total_weight: Amount = accepted
        .iter()
        .try_fold(Amount::zero(), |acc, s| acc.checked_add(s.weight))
        .map_err(|_| overflow("total_weight overflow"))?;
    if total_weight.is_zero() {
        return Err(overflow("zero accepted weight"));
    }
    let mut cumulative = Amount::zero();
    for s in &accepted {
        cumulative = cumulative.checked_add(s.weight).map_err(|_| overflow("cumulative + weight"))?;
        // Strict ">" (not ">=") so an exact half-weight tie rolls forward
        // to the next-higher price rather than stopping on the lower one.
        if cumulative.checked_mul(Amount::from(2u64)).map_err(|_| overflow("cumulative * 2"))? > total_weight {
            return Ok(s.price);
        }
    }
    Ok(accepted.last().ok_or_else(|| overflow("no accepted submissions"))?.price)
}

/// Runs the outlier test and returns the stake-weighted median of the
/// surviving submissions. Requires at least one submission; the caller
/// enforces `minValidators` before calling this (spec.md §4.2).
pub fn aggregate(submissions: &[Submission], outlier_threshold_k: Ratio) -> Result<AggregationOutcome, CommonError> {
    if submissions.is_empty() {
        return Err(overflow("no submissions to aggregate"));
    }

    let mut accepted: Vec<&Submission> = Vec::with_capacity(submissions.len());
    let mut outliers: Vec<String> = Vec::new();

    if submissions.len() < 3 {
        accepted.extend(submissions.iter());
    } else {
        for (i, candidate) in submissions.iter().enumerate() {
            let others: Vec<&Submission> = submissions
                .iter()
                .enumerate()
                .filter(|(j, _)| *j != i)
                .map(|(_, s)| s)
                .collect();
            let (mean_others, variance_others) = weighted_mean_variance(&others)?;
            let diff = abs_diff(candidate.price, mean_others);
            let diff_sq = diff.checked_mul(diff).map_err(|_| overflow("candidate diff^2"))?;
            let threshold = outlier_threshold_k
                .checked_mul(outlier_threshold_k)
                .map_err(|_| overflow("k^2"))?
                .checked_mul(variance_others)
                .map_err(|_| overflow("k^2 * variance_others"))?;
            if diff_sq > threshold {
                outliers.push(candidate.validator.clone());
            } else {
                accepted.push(candidate);
            }
        }
    }

    if accepted.is_empty() {
        // Every submission flagged as mutually inconsistent: fall back to
        // the full set rather than leaving the asset with no price at all.
        accepted = submissions.iter().collect();
        outliers.clear();
    }

    let aggregated_price = weighted_median(accepted.clone())?;
    Ok(AggregationOutcome {
        aggregated_price,
        accepted: accepted.into_iter().map(|s| s.validator.clone()).collect(),
        outliers,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sub(validator: &str, price: u64, weight: u64) -> Submission {
        Submission {
            validator: validator.to_string(),
            price: Ratio::from_ratio(price, 1u64),
            weight: Amount::from(weight),
        }
    }

    /// spec.md S4: five equal-stake validators submit {100,101,102,103,5000};
    /// outlier 5000 must be rejected and the median of the rest is 102.
    #[test]
    fn s4_rejects_extreme_outlier_via_leave_one_out() {
        let submissions = vec![
            sub("v1", 100, 1),
            sub("v2", 101, 1),
            sub("v3", 102, 1),
            sub("v4", 103, 1),
            sub("v5", 5000, 1),
        ];
        let outcome = aggregate(&submissions, Ratio::from_ratio(2u64, 1u64)).unwrap();
        assert_eq!(outcome.outliers, vec!["v5".to_string()]);
        assert_eq!(outcome.aggregated_price, Ratio::from_ratio(102u64, 1u64));
    }

    #[test]
    fn aggregated_price_lies_within_submitted_range() {
        let submissions = vec![sub("v1", 90, 3), sub("v2", 95, 1), sub("v3", 110, 1)];
        let outcome = aggregate(&submissions, Ratio::from_ratio(3u64, 1u64)).unwrap();
        assert!(outcome.aggregated_price >= Ratio::from_ratio(90u64, 1u64));
        assert!(outcome.aggregated_price <= Ratio::from_ratio(110u64, 1u64));
    }

    #[test]
    fn unanimous_submissions_reject_nothing() {
        let submissions = vec![sub("v1", 100, 1), sub("v2", 100, 1), sub("v3", 100, 1)];
        let outcome = aggregate(&submissions, Ratio::from_ratio(2u64, 1u64)).unwrap();
        assert!(outcome.outliers.is_empty());
        assert_eq!(outcome.aggregated_price, Ratio::from_ratio(100u64, 1u64));
    }
}
