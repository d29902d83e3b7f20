pub mod begin_block;
pub mod end_block;
pub mod error;
pub mod events;
pub mod genesis;
pub mod keeper;
pub mod msg;
pub mod state;
pub mod types;

pub use error::ContractError;
pub use keeper::{BankKeeper, ProofVerifier};
