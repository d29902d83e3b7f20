use cosmwasm_std::StdError;
use thiserror::Error;

use paw_errors::CommonError;

#[derive(Error, Debug, PartialEq)]
pub enum ContractError {
    #[error("{0}")]
    Std(#[from] StdError),

    #[error("{0}")]
    Common(#[from] CommonError),

    #[error("validator {0} is not registered")]
    ValidatorNotFound(String),

    #[error("validator {0} is not active")]
    ValidatorInactive(String),

    #[error("asset {0} has no fresh submissions")]
    NoFreshSubmissions(String),

    #[error("registering in region '{region}' would push regional concentration above the configured cap")]
    RegionalCapExceeded { region: String },

    #[error("registering in region '{region}' would push the diversity score below the warning threshold")]
    GeographicConcentration { region: String },

    #[error("{context}")]
    InvariantViolation { context: String },

    #[error("unauthorized")]
    Unauthorized {},
}
