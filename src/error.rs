//! Error types shared by every index structure.

use thiserror::Error;

/// Errors raised by index construction and queries.
///
/// All of these are precondition violations detected before any state is
/// touched, so a structure that returned an error is left exactly as it was.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// The structure is in a phase that forbids the requested operation.
    ///
    /// Raised when mutating a finalized Aho-Corasick automaton or building a
    /// suffix tree twice.
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// The structure has not been built yet.
    ///
    /// Raised when querying an empty BK-tree or searching an automaton whose
    /// failure links are not computed.
    #[error("{0} is not ready for queries")]
    NotReady(&'static str),

    /// An argument violates a documented precondition.
    ///
    /// Raised when a reserved separator/end marker collides with the input
    /// alphabet, or when length-dependent comparisons receive inputs of
    /// different lengths.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

/// A specialized `Result` type for index operations.
pub type Result<T> = std::result::Result<T, Error>;
