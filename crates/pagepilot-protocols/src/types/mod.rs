//! Common types used across PagePilot.

mod message;
mod history;

pub use message::*;
pub use history::*;

#[cfg(test)]
#[path = "types_tests.rs"]
mod tests;
