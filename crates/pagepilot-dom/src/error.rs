//! DOM errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomError {
    #[error("Invalid selector '{selector}': {reason}")]
    InvalidSelector { selector: String, reason: String },

    #[error("Selection snapshot out of sync: expected {expected} elements, found {found}")]
    SnapshotMismatch { expected: usize, found: usize },

    #[error("Selection snapshot out of order at element {position}: expected <{expected}>, found <{found}>")]
    SnapshotDrift {
        position: usize,
        expected: String,
        found: String,
    },

    #[error("Node not found: {0}")]
    NodeNotFound(usize),

    #[error("Invalid text range {start}..{end}")]
    InvalidRange { start: usize, end: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_selector_display() {
        let err = DomError::InvalidSelector {
            selector: "p[".to_string(),
            reason: "unexpected end".to_string(),
        };
        assert!(err.to_string().contains("p["));
        assert!(err.to_string().contains("unexpected end"));
    }

    #[test]
    fn test_snapshot_mismatch_display() {
        let err = DomError::SnapshotMismatch {
            expected: 10,
            found: 9,
        };
        assert!(err.to_string().contains("10"));
        assert!(err.to_string().contains("9"));
    }
}
