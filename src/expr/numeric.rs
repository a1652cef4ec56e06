//! Numeric approximation of expressions.
//!
//! Two grid-sweep operations over a shared stepping policy: [`integrate`]
//! materializes the running integral of an expression as a
//! piecewise-constant [`Expression::Numeric`] table, and [`product`]
//! scores the similarity of two expressions as the cosine of their
//! sampled vectors.
//!
//! Both evaluate the swept expression in a scope where the ambient
//! provider is consulted first and a dedicated [`SingleVariable`] drives
//! the integration variable — the same shadowing as a
//! [`Bound`](Expression::Bound) node, so ambient bindings win and the
//! integration variable must be free of the ambient context. Grid points
//! are computed multiplicatively (`left + i * step`), never by
//! accumulation, so they stay aligned with the bucket selection of the
//! resulting table.

use log::trace;

use super::provider::{ArgumentProvider, Fallback, SingleVariable};
use super::tree::{bucket_count, Expression, NumericTable};
use crate::error::{ExprError, Result};

/// Approximates the running integral of `f` over `[left, right]`.
///
/// Sweeps `variable` through every grid point `left + i * step` strictly
/// below `right` (the partial step beyond `right` is never evaluated) and
/// accumulates the left Riemann sum `Σ f(x_i) * step`. The returned
/// [`Expression::Numeric`] table maps each bucket `k` to the integral
/// over `[left, left + k * step)`: it reads 0 at the lower bound, the
/// full sum at the upper bound, 0 below the interval, and the full sum
/// above it.
///
/// # Errors
///
/// [`ExprError::EmptyInterval`] if `left >= right` or `step <= 0`;
/// [`ExprError::MissingBinding`] if `f` references a variable neither
/// `provider` nor the sweep can resolve.
///
/// # Examples
///
/// ```
/// use evofit::expr::{integrate, EmptyProvider, Expression, SingleVariable};
///
/// let one = Expression::constant(1.0);
/// let table = integrate(&one, 0.0, 1.0, 0.1, "x", &EmptyProvider).unwrap();
///
/// let x = SingleVariable::new("x", 1.0);
/// assert!((table.eval(&x).unwrap() - 1.0).abs() < 1e-9);
/// ```
pub fn integrate(
    f: &Expression,
    left: f64,
    right: f64,
    step: f64,
    variable: &str,
    provider: &dyn ArgumentProvider,
) -> Result<Expression> {
    if !(left < right) || !(step > 0.0) {
        return Err(ExprError::EmptyInterval { left, right, step });
    }
    let buckets = bucket_count(left, right, step);
    trace!("integrating over [{left}, {right}] at step {step}: {buckets} buckets");

    let mut sweep = SingleVariable::new(variable, left);
    let mut samples = Vec::with_capacity(buckets);
    let mut sum = 0.0;
    let mut i = 0usize;
    loop {
        let x = left + i as f64 * step;
        if x >= right {
            break;
        }
        // prefix before this grid point, so the table reads 0 at `left`
        if samples.len() < buckets {
            samples.push(sum);
        }
        sweep.set(x);
        let scope = Fallback::new(vec![provider, &sweep]);
        sum += f.eval(&scope)? * step;
        i += 1;
    }
    // the final bucket holds the full sum, matching the value above `right`
    while samples.len() < buckets {
        samples.push(sum);
    }

    Ok(Expression::Numeric(NumericTable::new(
        left, 0.0, right, sum, step, samples, variable,
    )))
}

/// Scores the similarity of `f1` and `f2` over `[left, right]`.
///
/// Samples both expressions over the same grid sweep as [`integrate`] and
/// returns the normalized cross-correlation
/// `Σ f1·f2 / sqrt(Σ f1² · Σ f2²)` — the cosine of the two sampled
/// vectors, in `[-1, 1]` for well-behaved inputs and symmetric in the
/// function arguments. This is the fitness primitive for scoring how well
/// a candidate expression matches a target.
///
/// # Errors
///
/// [`ExprError::EmptyInterval`] if `left >= right` or `step <= 0`;
/// [`ExprError::DegenerateNormalization`] if either function has zero
/// energy on the grid (the quotient would be 0/0);
/// [`ExprError::MissingBinding`] as for [`integrate`].
pub fn product(
    f1: &Expression,
    f2: &Expression,
    left: f64,
    right: f64,
    step: f64,
    variable: &str,
    provider: &dyn ArgumentProvider,
) -> Result<f64> {
    if !(left < right) || !(step > 0.0) {
        return Err(ExprError::EmptyInterval { left, right, step });
    }
    let mut sweep = SingleVariable::new(variable, left);

    let mut cross = 0.0;
    let mut energy1 = 0.0;
    let mut energy2 = 0.0;
    let mut i = 0usize;
    loop {
        let x = left + i as f64 * step;
        if x >= right {
            break;
        }
        sweep.set(x);
        let scope = Fallback::new(vec![provider, &sweep]);
        let v1 = f1.eval(&scope)?;
        let v2 = f2.eval(&scope)?;
        cross += v1 * v2;
        energy1 += v1 * v1;
        energy2 += v2 * v2;
        i += 1;
    }

    let norm = energy1 * energy2;
    if norm == 0.0 {
        return Err(ExprError::DegenerateNormalization);
    }
    Ok(cross / norm.sqrt())
}
