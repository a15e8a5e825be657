//! In-memory page DOM for PagePilot.
//!
//! A [`Document`] is an arena of nodes parsed from HTML with `scraper`
//! (html5ever). It supports the handful of operations the assistant needs
//! against a live page:
//!
//! - CSS selection in document order ([`Document::select`])
//! - text-content reads and writes, text-node splitting
//! - inline-style visibility heuristics ([`Document::is_visible`])
//! - simulated clicks and scrolls, recorded as [`DomEvent`]s
//! - serialization back to HTML ([`Document::to_html`])
//!
//! There is no layout engine: "visible" is derived from inline styles,
//! `hidden` attributes and whether an element has anything to render.

mod document;
mod error;
mod node;
mod select;
mod serialize;
mod style;

pub use document::{Document, DomEvent};
pub use error::DomError;
pub use node::{ElementData, NodeData, NodeId};
pub use serialize::escape_html;
pub use style::InlineStyle;
