#[cfg(feature = "sled")]
pub mod sled_store;

#[cfg(feature = "sled")]
pub use sled_store::SledStore;
