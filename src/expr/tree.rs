//! Expression trees and their evaluation.
//!
//! [`Expression`] is an immutable tree over a fixed, closed set of node
//! kinds; evaluation is a post-order walk resolving variables through an
//! [`ArgumentProvider`]. A [`Bound`](Expression::Bound) node captures
//! default bindings for a shared subtree and is a full peer of the other
//! node kinds: it can sit anywhere in a larger tree.

use std::sync::Arc;

use super::provider::{ArgumentProvider, Fallback};
use crate::error::Result;

/// Tolerance applied to bucket selection so that exact grid points land in
/// their own bucket rather than drifting one below on an inexact quotient.
pub(crate) const BUCKET_EPS: f64 = 1e-9;

/// An immutable arithmetic expression over named variables.
///
/// Compound nodes exclusively own their children, except
/// [`Bound`](Expression::Bound), which shares its subtree and captured
/// defaults by reference count so the same tree can back many wrappers
/// without duplication. Function nodes carry plain `fn` pointers, which
/// keeps the type `Clone` and `Debug`.
///
/// # Examples
///
/// ```
/// use evofit::expr::{Expression, SingleVariable};
///
/// // (x + 1) * 3
/// let f = Expression::binary(
///     |a, b| a * b,
///     Expression::binary(|a, b| a + b, Expression::variable("x"), Expression::constant(1.0)),
///     Expression::constant(3.0),
/// );
/// let x = SingleVariable::new("x", 2.0);
/// assert_eq!(f.eval(&x).unwrap(), 9.0);
/// ```
#[derive(Debug, Clone)]
pub enum Expression {
    /// A literal value.
    Const(f64),
    /// A variable, resolved through the provider at evaluation time.
    Variable(String),
    /// A unary function applied to a child expression.
    Unary(fn(f64) -> f64, Box<Expression>),
    /// A binary function applied to two child expressions.
    Binary(fn(f64, f64) -> f64, Box<Expression>, Box<Expression>),
    /// A piecewise-constant sample table.
    Numeric(NumericTable),
    /// A shared subtree evaluated against captured default bindings.
    ///
    /// The defaults are consulted before the caller's provider, so
    /// captured bindings shadow the caller's and names the defaults omit
    /// fall through to the caller.
    Bound(Arc<Expression>, Arc<dyn ArgumentProvider + Send + Sync>),
}

impl Expression {
    pub fn constant(value: f64) -> Self {
        Expression::Const(value)
    }

    pub fn variable(name: impl Into<String>) -> Self {
        Expression::Variable(name.into())
    }

    pub fn unary(op: fn(f64) -> f64, child: Expression) -> Self {
        Expression::Unary(op, Box::new(child))
    }

    pub fn binary(op: fn(f64, f64) -> f64, left: Expression, right: Expression) -> Self {
        Expression::Binary(op, Box::new(left), Box::new(right))
    }

    /// Wraps a shared subtree with default bindings for scoped evaluation.
    ///
    /// Both the subtree and the defaults are reference-counted: cloning
    /// the resulting node, or building several nodes over the same
    /// subtree, never duplicates the tree.
    pub fn bound(
        inner: Arc<Expression>,
        defaults: Arc<dyn ArgumentProvider + Send + Sync>,
    ) -> Self {
        Expression::Bound(inner, defaults)
    }

    /// Evaluates the tree against `provider`.
    ///
    /// Pure: the only observable effect is the returned value. A variable
    /// absent from the provider propagates
    /// [`MissingBinding`](crate::error::ExprError::MissingBinding); there
    /// is no default coercion.
    pub fn eval(&self, provider: &dyn ArgumentProvider) -> Result<f64> {
        match self {
            Expression::Const(value) => Ok(*value),
            Expression::Variable(name) => provider.get(name),
            Expression::Unary(op, child) => Ok(op(child.eval(provider)?)),
            Expression::Binary(op, left, right) => {
                Ok(op(left.eval(provider)?, right.eval(provider)?))
            }
            Expression::Numeric(table) => table.eval(provider),
            Expression::Bound(inner, defaults) => {
                let scope = Fallback::new(vec![defaults.as_ref(), provider]);
                inner.eval(&scope)
            }
        }
    }
}

/// Number of buckets needed to cover `[left, right]` at `step`: the bucket
/// of `right` itself, plus one.
pub(crate) fn bucket_count(left: f64, right: f64, step: f64) -> usize {
    ((right - left) / step + BUCKET_EPS).floor() as usize + 1
}

/// A piecewise-constant function backed by an evenly spaced sample table.
///
/// Below `left` the table reads `left_value`; above `right` it reads
/// `right_value`; in between, the sample for the bucket containing the
/// variable's value. Bucket selection is truncating division on
/// `(x - left) / step` with a small tolerance, so a value sitting exactly
/// on a grid point always reads that grid point's sample.
#[derive(Debug, Clone)]
pub struct NumericTable {
    left: f64,
    left_value: f64,
    right: f64,
    right_value: f64,
    step: f64,
    samples: Vec<f64>,
    variable: String,
}

impl NumericTable {
    /// # Panics
    ///
    /// Panics unless `left < right`, `step > 0`, and `samples` covers
    /// every bucket of `[left, right]` at `step` — exactly
    /// `(right - left) / step + 1` entries. A mismatched table is a
    /// construction-time fault, never a deferred evaluation fault.
    pub fn new(
        left: f64,
        left_value: f64,
        right: f64,
        right_value: f64,
        step: f64,
        samples: Vec<f64>,
        variable: impl Into<String>,
    ) -> Self {
        assert!(step > 0.0, "step must be positive, got {step}");
        assert!(
            left < right,
            "interval must satisfy left < right, got [{left}, {right}]"
        );
        let buckets = bucket_count(left, right, step);
        assert!(
            samples.len() == buckets,
            "sample table for [{left}, {right}] at step {step} needs {buckets} entries, got {}",
            samples.len()
        );
        Self {
            left,
            left_value,
            right,
            right_value,
            step,
            samples,
            variable: variable.into(),
        }
    }

    fn bucket(&self, x: f64) -> usize {
        ((x - self.left) / self.step + BUCKET_EPS).floor() as usize
    }

    /// Reads the table at the value of its variable in `provider`.
    pub fn eval(&self, provider: &dyn ArgumentProvider) -> Result<f64> {
        let x = provider.get(&self.variable)?;
        if x < self.left {
            return Ok(self.left_value);
        }
        if x > self.right {
            return Ok(self.right_value);
        }
        Ok(self.samples[self.bucket(x)])
    }
}
