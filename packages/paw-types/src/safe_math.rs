//! Overflow-checked AMM arithmetic over `Uint256`, per spec.md §4.4/§9:
//! "no overflow in any intermediate product... any overflow returns
//! `ErrOverflow` with context; no silent wraparound; no panic."
//!
//! Every function here composes `checked_add`/`checked_sub`/`checked_mul`/
//! `checked_div` only — never a bare operator — the same discipline the
//! teacher's PCL math applies to `Decimal256`/`Uint256` reserves.

use cosmwasm_std::Uint256;
use paw_errors::CommonError;

fn overflow(context: &str) -> CommonError {
    CommonError::Overflow {
        context: context.to_string(),
    }
}

/// `amountOut = amountInEff * reserveOut / (reserveIn + amountInEff)` where
/// `amountInEff = amountIn * (feeDen - feeNum) / feeDen`, per spec.md §4.1.
pub fn safe_calculate_swap_output(
    reserve_in: Uint256,
    reserve_out: Uint256,
    amount_in: Uint256,
    fee_numerator: Uint256,
    fee_denominator: Uint256,
) -> Result<Uint256, CommonError> {
    if fee_denominator.is_zero() || fee_numerator > fee_denominator {
        return Err(overflow("invalid fee fraction"));
    }
    let fee_complement = fee_denominator
        .checked_sub(fee_numerator)
        .map_err(|_| overflow("fee_numerator exceeds fee_denominator"))?;
    let amount_in_eff = amount_in
        .checked_mul(fee_complement)
        .map_err(|_| overflow("amount_in * fee_complement"))?
        .checked_div(fee_denominator)
        .map_err(|_| overflow("amount_in_eff / fee_denominator"))?;
    let numerator = amount_in_eff
        .checked_mul(reserve_out)
        .map_err(|_| overflow("amount_in_eff * reserve_out"))?;
    let denominator = reserve_in
        .checked_add(amount_in_eff)
        .map_err(|_| overflow("reserve_in + amount_in_eff"))?;
    if denominator.is_zero() {
        return Err(overflow("reserve_in + amount_in_eff is zero"));
    }
    numerator
        .checked_div(denominator)
        .map_err(|_| overflow("numerator / denominator"))
}

/// Integer square root via Newton's method, since `Uint256` has no
/// `isqrt` of its own. Only `checked_*` operations are used so a
/// pathological input returns `ErrOverflow` instead of panicking.
fn isqrt(n: Uint256) -> Result<Uint256, CommonError> {
    if n.is_zero() {
        return Ok(Uint256::zero());
    }
    let two = Uint256::from(2u8);
    let mut x = n;
    let mut y = x
        .checked_add(Uint256::one())
        .map_err(|_| overflow("isqrt: x + 1"))?
        .checked_div(two)
        .map_err(|_| overflow("isqrt: / 2"))?;
    while y < x {
        x = y;
        let n_div_x = n.checked_div(x).map_err(|_| overflow("isqrt: n / x"))?;
        y = x
            .checked_add(n_div_x)
            .map_err(|_| overflow("isqrt: x + n/x"))?
            .checked_div(two)
            .map_err(|_| overflow("isqrt: / 2"))?;
    }
    Ok(x)
}

/// Initial LP shares for `CreatePool`: `floor(sqrt(amountA * amountB))`.
pub fn safe_calculate_pool_shares(
    amount_a: Uint256,
    amount_b: Uint256,
) -> Result<Uint256, CommonError> {
    let product = amount_a
        .checked_mul(amount_b)
        .map_err(|_| overflow("amount_a * amount_b"))?;
    isqrt(product)
}

/// Shares minted on `AddLiquidity`:
/// `min(amountA * totalShares / reserveA, amountB * totalShares / reserveB)`.
pub fn safe_calculate_add_liquidity_shares(
    amount_a: Uint256,
    amount_b: Uint256,
    reserve_a: Uint256,
    reserve_b: Uint256,
    total_shares: Uint256,
) -> Result<Uint256, CommonError> {
    if reserve_a.is_zero() || reserve_b.is_zero() {
        return Err(overflow("reserves must be non-zero for AddLiquidity"));
    }
    let shares_a = amount_a
        .checked_mul(total_shares)
        .map_err(|_| overflow("amount_a * total_shares"))?
        .checked_div(reserve_a)
        .map_err(|_| overflow(".. / reserve_a"))?;
    let shares_b = amount_b
        .checked_mul(total_shares)
        .map_err(|_| overflow("amount_b * total_shares"))?
        .checked_div(reserve_b)
        .map_err(|_| overflow(".. / reserve_b"))?;
    Ok(shares_a.min(shares_b))
}

/// Token amounts returned on `RemoveLiquidity`:
/// `amountX = shares * reserveX / totalShares` for each token.
pub fn safe_calculate_remove_liquidity_amounts(
    shares: Uint256,
    total_shares: Uint256,
    reserve_a: Uint256,
    reserve_b: Uint256,
) -> Result<(Uint256, Uint256), CommonError> {
    if total_shares.is_zero() {
        return Err(overflow("total_shares is zero"));
    }
    let amount_a = shares
        .checked_mul(reserve_a)
        .map_err(|_| overflow("shares * reserve_a"))?
        .checked_div(total_shares)
        .map_err(|_| overflow(".. / total_shares"))?;
    let amount_b = shares
        .checked_mul(reserve_b)
        .map_err(|_| overflow("shares * reserve_b"))?
        .checked_div(total_shares)
        .map_err(|_| overflow(".. / total_shares"))?;
    Ok((amount_a, amount_b))
}

/// Applies a signed reserve delta with an explicit direction flag rather
/// than a signed integer type, keeping every amount in the non-negative
/// `Uint256` domain the rest of the module uses.
pub fn safe_update_reserve(
    reserve: Uint256,
    delta: Uint256,
    increase: bool,
) -> Result<Uint256, CommonError> {
    if increase {
        reserve
            .checked_add(delta)
            .map_err(|_| overflow("reserve + delta"))
    } else {
        reserve
            .checked_sub(delta)
            .map_err(|_| overflow("reserve - delta"))
    }
}

/// Enforces `reserveA * reserveB >= k_before` (spec.md §4.1/§8 invariant 2):
/// the constant product may only grow, modulo fee accumulation.
pub fn safe_validate_constant_product(
    reserve_a_after: Uint256,
    reserve_b_after: Uint256,
    k_before: Uint256,
) -> Result<Uint256, CommonError> {
    let k_after = reserve_a_after
        .checked_mul(reserve_b_after)
        .map_err(|_| overflow("reserve_a_after * reserve_b_after"))?;
    if k_after < k_before {
        return Err(overflow("constant product decreased"));
    }
    Ok(k_after)
}
