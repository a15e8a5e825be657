//! Completion provider protocol definitions.
//!
//! Providers connect to an upstream chat-completion API and turn a prompt into
//! free-form text. The assistant does not care which upstream is behind one.

mod traits;
mod request;

pub use traits::*;
pub use request::*;
