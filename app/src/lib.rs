pub mod collaborators;
pub mod error;
pub mod genesis;
pub mod keepers;
pub mod msg;

pub use error::AppError;
pub use keepers::Keepers;
