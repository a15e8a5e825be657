//! CSS selector queries.
//!
//! Selectors are matched by `scraper` against a snapshot re-parsed from
//! the serialized arena. Snapshot elements map back to arena nodes by
//! document-order position.

use std::collections::HashMap;

use scraper::{Html, Selector};
use tracing::trace;

use crate::document::Document;
use crate::error::DomError;
use crate::node::NodeId;

impl Document {
    /// `document.querySelectorAll(css)`, in document order.
    pub fn select(&self, css: &str) -> Result<Vec<NodeId>, DomError> {
        let selector = Selector::parse(css).map_err(|e| DomError::InvalidSelector {
            selector: css.to_string(),
            reason: e.to_string(),
        })?;

        let arena = self.elements();
        let snapshot = Html::parse_document(&self.to_html());
        let snapshot_elements: Vec<_> = snapshot
            .tree
            .root()
            .descendants()
            .filter_map(|n| n.value().as_element().map(|el| (n.id(), el.name())))
            .collect();

        if snapshot_elements.len() != arena.len() {
            return Err(DomError::SnapshotMismatch {
                expected: arena.len(),
                found: snapshot_elements.len(),
            });
        }
        // The parser may relocate elements (foster parenting, foreign content).
        if let Some(position) = snapshot_elements
            .iter()
            .zip(&arena)
            .position(|((_, name), &id)| self.tag(id) != Some(*name))
        {
            return Err(DomError::SnapshotDrift {
                position,
                expected: self.tag(arena[position]).unwrap_or_default().to_string(),
                found: snapshot_elements[position].1.to_string(),
            });
        }
        let positions: HashMap<_, usize> = snapshot_elements
            .iter()
            .enumerate()
            .map(|(i, (id, _))| (*id, i))
            .collect();

        let matched: Vec<NodeId> = snapshot
            .select(&selector)
            .filter_map(|el| positions.get(&(*el).id()).map(|&i| arena[i]))
            .collect();
        trace!(selector = css, matched = matched.len(), "Selector evaluated");
        Ok(matched)
    }
}
