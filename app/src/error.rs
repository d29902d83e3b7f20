use thiserror::Error;

/// Composes the three modules' error taxonomies, spec.md §7. `app`
/// itself never raises its own variants beyond dispatch bookkeeping:
/// every real failure belongs to the module that rejected the message.
#[derive(Error, Debug, PartialEq)]
pub enum AppError {
    #[error("{0}")]
    Dex(#[from] paw_dex::ContractError),

    #[error("{0}")]
    Oracle(#[from] paw_oracle::ContractError),

    #[error("{0}")]
    Compute(#[from] paw_compute::ContractError),

    #[error("unknown governance parameter target {0}")]
    UnknownGovTarget(String),
}
