//! Engine error type.
//!
//! Every fallible entry point in the crate returns [`EngineError`]. Invalid
//! configuration fails fast with a descriptive message; degenerate-but-expected
//! outcomes (DBSCAN noise, sink nodes) are handled by fallback rules in their
//! modules and never surface here.

/// Error raised by the walk engine.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineError {
    /// Invalid configuration or input value (bad dimension, zero-mass
    /// distribution, zero-norm coin state, negative channel strength, ...).
    InvalidInput(String),
    /// The series is too short for the requested embedding parameters.
    SeriesTooShort { needed: usize, actual: usize },
    /// A supplied matrix does not have the expected shape.
    ShapeMismatch {
        expected: (usize, usize),
        actual: (usize, usize),
    },
    /// The requested simulation exceeds the engine's capacity contract.
    Unsupported(String),
}

impl std::fmt::Display for EngineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidInput(msg) => write!(f, "invalid input: {msg}"),
            Self::SeriesTooShort { needed, actual } => {
                write!(f, "series too short: need {needed} points, got {actual}")
            }
            Self::ShapeMismatch { expected, actual } => write!(
                f,
                "matrix shape mismatch: expected {}x{}, got {}x{}",
                expected.0, expected.1, actual.0, actual.1
            ),
            Self::Unsupported(msg) => write!(f, "unsupported: {msg}"),
        }
    }
}

impl std::error::Error for EngineError {}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, EngineError>;
