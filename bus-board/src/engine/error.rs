//! Engine error types.

/// Errors surfaced to whoever asked for a board.
///
/// Upstream failures never appear here: they only shrink the board.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BoardError {
    /// No location with this name is configured
    #[error("unknown location: {0}")]
    UnknownLocation(String),
}
