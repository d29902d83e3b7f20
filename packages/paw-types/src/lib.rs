pub mod safe_math;
pub mod validation;

/// The big-integer type every cross-module amount (reserves, shares,
/// stakes, escrow amounts) is expressed in, per spec.md §9 ("all amounts
/// are arbitrary-precision integers"). `u128`/`u64` are reserved for
/// strictly local counters (heights, indices) that can never accumulate
/// user-supplied value.
pub type Amount = cosmwasm_std::Uint256;

/// Rational fractions (fees, price-impact ratios, diversity scores) are
/// fixed-point decimals, never floats, per spec.md §9.
pub type Ratio = cosmwasm_std::Decimal256;
