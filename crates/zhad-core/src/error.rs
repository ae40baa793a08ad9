//! Error types for zhad-core.
//!
//! The AD engine's hot path never returns a `Result`: arena growth, zero
//! independent variables, and floating-point domain errors are not
//! exceptional by design (propagate NaN/Inf like any other floating-point
//! host). `ZhadError` exists for the few seams that are genuinely fallible.

use thiserror::Error;

/// Errors surfaced by the fallible edges of the crate.
#[derive(Debug, Error)]
pub enum ZhadError {
    /// A `Value` was combined with an operand, or assigned into a `DepVar`,
    /// that belongs to a different graph.
    ///
    /// The infallible operator overloads `debug_assert!` this condition
    /// instead of returning it; this variant backs the checked alternative
    /// (`DepVar::try_assign`) for callers who would rather get an `Err` than
    /// a debug-only panic.
    #[error("value belongs to a different graph than the operand/DepVar it was combined with")]
    GraphMismatch,

    /// The demo binary's iteration-count argument failed to parse.
    #[error("invalid iteration count: {0}")]
    ParseIterationCount(#[from] std::num::ParseIntError),
}
