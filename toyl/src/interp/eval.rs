//! Program executor and node evaluator
//!
//! Binary nodes speculate on fast integer arithmetic and fall back to
//! precise decimal arithmetic. The first time the fast computation fails at
//! a given node (overflow, division by zero, or a division that leaves a
//! remainder), that node settles on the precise path for good. A precise
//! operand alone does not settle a node; it only routes that one
//! evaluation through the precise path.

use super::error::{InterpResult, RuntimeError};
use super::store::VariableStore;
use super::value::{Value, fast_binary, precise_binary};
use crate::ast::{BinaryNode, Node, Program};
use crate::config::EvalConfig;
use tracing::{debug, trace};

/// Stack growth parameters for deeply nested trees
const STACK_RED_ZONE: usize = 128 * 1024; // 128KB remaining triggers growth
const STACK_GROW_SIZE: usize = 4 * 1024 * 1024; // Grow by 4MB each time

/// The interpreter. Owns the variable store for one program evaluation.
pub struct Interpreter {
    store: VariableStore,
    config: EvalConfig,
    /// Current node nesting depth
    depth: usize,
}

impl Interpreter {
    /// Create an interpreter with the default configuration
    pub fn new(store: VariableStore) -> Self {
        Self::with_config(store, EvalConfig::default())
    }

    pub fn with_config(store: VariableStore, config: EvalConfig) -> Self {
        Interpreter {
            store,
            config,
            depth: 0,
        }
    }

    pub fn store(&self) -> &VariableStore {
        &self.store
    }

    pub fn into_store(self) -> VariableStore {
        self.store
    }

    pub fn config(&self) -> &EvalConfig {
        &self.config
    }

    /// Run every statement in order; the last statement's value is the result.
    /// The first error aborts the run.
    #[tracing::instrument(level = "debug", skip_all, fields(statements = program.statement_count()))]
    pub fn run(&mut self, program: &Program) -> InterpResult<Value> {
        for (index, statement) in program.leading().iter().enumerate() {
            trace!(index, %statement, "statement");
            self.eval(statement)?;
        }
        trace!(statement = %program.last(), "result statement");
        self.eval(program.last())
    }

    /// Run and render the result
    pub fn run_to_string(&mut self, program: &Program) -> InterpResult<String> {
        self.run(program).map(|value| value.to_string())
    }

    /// Evaluate a node with automatic stack growth for deep nesting
    pub fn eval(&mut self, node: &Node) -> InterpResult<Value> {
        if self.depth >= self.config.max_depth {
            return Err(RuntimeError::depth_exceeded(self.config.max_depth));
        }
        self.depth += 1;
        let result = stacker::maybe_grow(STACK_RED_ZONE, STACK_GROW_SIZE, || self.eval_inner(node));
        self.depth -= 1;
        result
    }

    fn eval_inner(&mut self, node: &Node) -> InterpResult<Value> {
        match node {
            Node::LiteralFast(n) => Ok(Value::Fast(*n)),
            Node::LiteralPrecise(d) => Ok(Value::Precise(d.clone())),

            Node::VariableRead { slot } => self.store.read(*slot),

            Node::Assignment { slot, expr } => {
                let value = self.eval(expr)?;
                self.store.write(*slot, &value);
                Ok(value)
            }

            Node::Negate(binary) | Node::Binary(binary) => self.eval_binary(binary),
        }
    }

    fn eval_binary(&mut self, node: &BinaryNode) -> InterpResult<Value> {
        // Each operand exactly once, left to right
        let left = self.eval(&node.left)?;
        let right = self.eval(&node.right)?;

        if !node.is_settled() {
            if let (Value::Fast(a), Value::Fast(b)) = (&left, &right) {
                match fast_binary(node.op, *a, *b) {
                    Ok(n) => return Ok(Value::Fast(n)),
                    Err(failure) => {
                        debug!(op = %node.op, %failure, "binary node settled on precise arithmetic");
                        node.settle();
                    }
                }
            }
        }

        precise_binary(
            node.op,
            &left.to_precise(),
            &right.to_precise(),
            self.config.division_precision,
        )
        .map(Value::Precise)
    }
}
