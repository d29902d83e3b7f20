use cosmwasm_std::{ConversionOverflowError, OverflowError, StdError};
use thiserror::Error;

/// Errors shared by every PAW module. Each module's own `ContractError`
/// embeds this with `#[from]`, the same way the teacher contracts embed
/// `cosmwasm_std::StdError`.
#[derive(Error, Debug, PartialEq, Eq, Clone)]
pub enum CommonError {
    #[error("{0}")]
    Std(String),

    #[error("arithmetic overflow: {context}")]
    Overflow { context: String },

    #[error("invalid denom '{denom}': {reason}")]
    InvalidDenom { denom: String, reason: String },

    #[error("invalid asset name '{asset}': {reason}")]
    InvalidAsset { asset: String, reason: String },

    #[error("invalid endpoint: {reason}")]
    InvalidEndpoint { reason: String },

    #[error("invalid address '{address}'")]
    InvalidAddress { address: String },

    #[error("input rejected by injection screening: {field}")]
    InjectionDetected { field: String },

    #[error("unauthorized")]
    Unauthorized {},
}

impl From<StdError> for CommonError {
    fn from(e: StdError) -> Self {
        CommonError::Std(e.to_string())
    }
}

impl From<OverflowError> for CommonError {
    fn from(e: OverflowError) -> Self {
        CommonError::Overflow {
            context: e.to_string(),
        }
    }
}

impl From<ConversionOverflowError> for CommonError {
    fn from(e: ConversionOverflowError) -> Self {
        CommonError::Overflow {
            context: e.to_string(),
        }
    }
}
