use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum BufferError {
    #[error("{0}")]
    Std(String),

    #[error("circular buffer for this scope was never initialized")]
    NotInitialized {},

    #[error("circular buffer capacity must be greater than zero")]
    ZeroCapacity {},
}

impl From<cosmwasm_std::StdError> for BufferError {
    fn from(e: cosmwasm_std::StdError) -> Self {
        BufferError::Std(e.to_string())
    }
}
