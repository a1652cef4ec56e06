//! Arithmetic expressions over named variables.
//!
//! An [`Expression`] is an immutable tree of a fixed set of node kinds,
//! evaluated against an [`ArgumentProvider`] that resolves variable names
//! to values. Providers compose by reference with positional shadowing
//! ([`Fallback`]), and a [`Bound`](Expression::Bound) node captures
//! default bindings for a shared subtree anywhere in a tree.
//!
//! # Key Types
//!
//! - [`Expression`]: the tree — constants, variables, unary/binary
//!   function nodes, piecewise-constant [`NumericTable`]s, and scope
//!   captures
//! - [`ArgumentProvider`]: name-to-value resolution, with
//!   [`SingleVariable`], [`Fallback`], and [`EmptyProvider`] impls
//! - [`integrate`] / [`product`]: discretized integration and normalized
//!   correlation over a grid sweep

mod numeric;
mod provider;
mod tree;

pub use numeric::{integrate, product};
pub use provider::{ArgumentProvider, EmptyProvider, Fallback, SingleVariable};
pub use tree::{Expression, NumericTable};
