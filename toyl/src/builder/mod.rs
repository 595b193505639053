//! Programmatic tree construction
//!
//! Parsing source text is not part of this crate. `ProgramBuilder` is what
//! a front end drives instead: it classifies numerals, declares and resolves
//! variable names against the store, and refuses to produce a program that
//! evaluation could not run (duplicate or undeclared names, no statements).
//!
//! ```
//! use toyl::{BinOp, ProgramBuilder, run};
//!
//! let mut b = ProgramBuilder::new();
//! let pi = b.declare("pi", b.number("3.14")?)?;
//! let r = b.declare("r", b.number("42")?)?;
//! let area = ProgramBuilder::binary(
//!     BinOp::Mul,
//!     ProgramBuilder::binary(BinOp::Mul, b.read("pi")?, b.read("r")?),
//!     b.read("r")?,
//! );
//! let (program, store) = b.build(vec![pi, r, area])?;
//! assert_eq!(run(&program, store)?, "5538.96");
//! # Ok::<(), toyl::Error>(())
//! ```

use crate::ast::{BinOp, Node, Program};
use crate::error::{BuildError, Result};
use crate::interp::VariableStore;
use bigdecimal::{BigDecimal, ToPrimitive};
use std::str::FromStr;
use tracing::trace;

const MAX_FAST_EXPONENT: i64 = 18;

/// Builds a [`Program`] together with the [`VariableStore`] it runs against
#[derive(Debug, Default)]
pub struct ProgramBuilder {
    store: VariableStore,
}

impl ProgramBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Classify a numeral once, for good: integers written without a
    /// fractional part that fit in 64 bits become fast literals, everything
    /// else a precise literal at full source precision.
    pub fn number(&self, text: &str) -> Result<Node> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(BuildError::invalid_numeral(text));
        }
        let decimal =
            BigDecimal::from_str(trimmed).map_err(|_| BuildError::invalid_numeral(text))?;
        let (_, scale) = decimal.as_bigint_and_exponent();
        // i64 has at most 19 digits; a larger exponent cannot fit and must
        // not be expanded to find that out
        let fast = if (-MAX_FAST_EXPONENT..=0).contains(&scale) {
            decimal.to_i64()
        } else {
            None
        };
        trace!(numeral = trimmed, fast = fast.is_some(), "classified numeral");
        Ok(match fast {
            Some(n) => Node::LiteralFast(n),
            None => Node::LiteralPrecise(decimal),
        })
    }

    pub fn fast(n: i64) -> Node {
        Node::LiteralFast(n)
    }

    pub fn precise(d: BigDecimal) -> Node {
        Node::LiteralPrecise(d)
    }

    /// `var name = init`. The initializer was built before the name existed,
    /// so it cannot refer to it.
    pub fn declare(&mut self, name: &str, init: Node) -> Result<Node> {
        let slot = self.store.declare(name)?;
        Ok(Node::assign(slot, init))
    }

    /// `name = expr` for an already declared name
    pub fn assign(&self, name: &str, expr: Node) -> Result<Node> {
        let slot = self.store.resolve(name)?;
        Ok(Node::assign(slot, expr))
    }

    pub fn read(&self, name: &str) -> Result<Node> {
        let slot = self.store.resolve(name)?;
        Ok(Node::read(slot))
    }

    pub fn binary(op: BinOp, left: Node, right: Node) -> Node {
        Node::binary(op, left, right)
    }

    pub fn add(left: Node, right: Node) -> Node {
        Node::binary(BinOp::Add, left, right)
    }

    pub fn sub(left: Node, right: Node) -> Node {
        Node::binary(BinOp::Sub, left, right)
    }

    pub fn mul(left: Node, right: Node) -> Node {
        Node::binary(BinOp::Mul, left, right)
    }

    pub fn div(left: Node, right: Node) -> Node {
        Node::binary(BinOp::Div, left, right)
    }

    /// Unary minus: `0 - expr`
    pub fn negate(expr: Node) -> Node {
        Node::negate(expr)
    }

    pub fn store(&self) -> &VariableStore {
        &self.store
    }

    pub fn build(self, statements: Vec<Node>) -> Result<(Program, VariableStore)> {
        let program = Program::new(statements)?;
        Ok((program, self.store))
    }
}
