//! Error types shared across the deckpack crates.

use thiserror::Error;

/// Errors surfaced at the engine boundary.
///
/// Configuration and input problems are reported before a search starts;
/// a search that merely runs out of time is *not* an error and is
/// reported through the placement record instead.
#[derive(Debug, Error)]
pub enum Error {
    /// The carrier configuration is unusable (non-positive dimensions,
    /// margins that consume the deck, duplicate block ids, ...).
    #[error("invalid carrier configuration: {0}")]
    InvalidCarrier(String),

    /// A block footprint is unusable (no filled cells, duplicate cells, ...).
    #[error("invalid footprint: {0}")]
    InvalidFootprint(String),

    /// A block id named by the carrier configuration has no footprint.
    #[error("unknown block id: {0}")]
    UnknownBlock(String),

    /// A cell query named a coordinate outside the carrier.
    #[error("coordinate out of bounds: {0}")]
    OutOfBounds(String),

    /// An internal invariant was violated; this is a bug.
    #[error("internal error: {0}")]
    Internal(String),
}

/// Convenience alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::InvalidCarrier("width must be positive".into());
        assert_eq!(
            err.to_string(),
            "invalid carrier configuration: width must be positive"
        );

        let err = Error::UnknownBlock("2534_202_000".into());
        assert_eq!(err.to_string(), "unknown block id: 2534_202_000");
    }
}
