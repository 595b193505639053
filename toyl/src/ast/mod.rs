//! Abstract Syntax Tree definitions

mod expr;

pub use expr::*;

use crate::error::{BuildError, Result};

/// A program is a non-empty sequence of statements; the value of the last
/// one is the program's result.
#[derive(Debug, Clone)]
pub struct Program {
    leading: Vec<Node>,
    last: Node,
}

impl Program {
    pub fn new(mut statements: Vec<Node>) -> Result<Self> {
        let last = statements.pop().ok_or(BuildError::EmptyProgram)?;
        Ok(Program {
            leading: statements,
            last,
        })
    }

    /// Statements evaluated only for their effect on the store
    pub fn leading(&self) -> &[Node] {
        &self.leading
    }

    /// The statement whose value is the program's result
    pub fn last(&self) -> &Node {
        &self.last
    }

    /// All statements in execution order
    pub fn statements(&self) -> impl Iterator<Item = &Node> {
        self.leading.iter().chain(std::iter::once(&self.last))
    }

    pub fn statement_count(&self) -> usize {
        self.leading.len() + 1
    }
}
