//! Crate error type.
//!
//! Recoverable failures during evaluation and numeric approximation are
//! typed variants of [`ExprError`]. Contract violations (malformed sample
//! tables, undersized populations) are not errors but panics, documented
//! at the offending constructors.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExprError {
    /// A provider was asked for a variable it does not hold.
    ///
    /// This is a structural signal, never coerced to a numeric default:
    /// scoped expressions rely on it to fall through to outer bindings.
    #[error("no binding for variable `{0}`")]
    MissingBinding(String),

    /// A grid sweep was requested over an interval with no sample points.
    #[error("empty sampling interval [{left}, {right}] with step {step}")]
    EmptyInterval { left: f64, right: f64, step: f64 },

    /// The correlation denominator is zero: at least one of the sampled
    /// functions has zero energy on the interval.
    #[error("degenerate normalization: zero energy over the sampling interval")]
    DegenerateNormalization,
}

pub type Result<T> = std::result::Result<T, ExprError>;
