pub mod namespace;
pub mod staged;

pub use cw_storage_plus;
pub use namespace::{namespaced, NamespacedKey, NAMESPACE_COMPUTE, NAMESPACE_DEX, NAMESPACE_ORACLE};
pub use staged::Staged;
