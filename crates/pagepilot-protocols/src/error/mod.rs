//! Error types for the PagePilot protocol layer.

mod provider;
mod store;

pub use provider::*;
pub use store::*;
