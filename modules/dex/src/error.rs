use cosmwasm_std::StdError;
use thiserror::Error;

use paw_circular_buffer::error::BufferError;
use paw_errors::CommonError;

/// DEX module errors, the spec.md §7 taxonomy entries this module can
/// raise. Follows the teacher's `pair`/`pair_stable` `error.rs` shape:
/// one flat enum, `#[from]` conversions for the errors it wraps, no
/// panics.
#[derive(Error, Debug, PartialEq)]
pub enum ContractError {
    #[error("{0}")]
    Std(#[from] StdError),

    #[error("{0}")]
    Common(#[from] CommonError),

    #[error("{0}")]
    Buffer(#[from] BufferError),

    #[error("pool {0} not found")]
    PoolNotFound(u64),

    #[error("a pool for this token pair already exists")]
    PoolAlreadyExists {},

    #[error("amount must be greater than zero")]
    InvalidAmount {},

    #[error("swap deadline was not provided")]
    DeadlineMissing {},

    #[error("swap deadline has passed")]
    DeadlineExceeded {},

    #[error("commit hash does not match the revealed parameters")]
    InvalidCommitHash {},

    #[error("insufficient liquidity for this operation")]
    InsufficientLiquidity {},

    #[error("output would be below the requested minimum")]
    SlippageTooHigh {},

    #[error("price impact exceeds the configured maximum")]
    PriceImpactExceeded {},

    #[error("pool is paused")]
    ModulePaused {},

    #[error("swap rejected by MEV guard")]
    MevBlocked {},

    #[error("swap rejected: sandwich pattern detected")]
    SandwichAttackDetected {},

    #[error("swap timestamp precedes a prior swap from the same trader within the reordering window")]
    NonceOutOfOrder {},

    #[error("commit-reveal is not enabled for this pool")]
    CommitRevealDisabled {},

    #[error("reveal submitted before the minimum commit-reveal delay elapsed")]
    RevealTooEarly {},

    #[error("commitment has expired")]
    CommitmentExpired {},

    #[error("{context}")]
    InvariantViolation { context: String },

    #[error("unauthorized")]
    Unauthorized {},
}
