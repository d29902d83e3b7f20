pub mod begin_block;
pub mod circuit_breaker;
pub mod end_block;
pub mod error;
pub mod events;
pub mod genesis;
pub mod keeper;
pub mod mev;
pub mod msg;
pub mod state;
pub mod types;

pub use error::ContractError;
