//! Toyl evaluation core
//!
//! Adaptive tree-walking evaluator for a small arithmetic language with
//! mutable variables. Arithmetic runs on checked 64-bit integers until a
//! given operation site proves that insufficient, after which that site
//! uses arbitrary-precision decimals for good.

pub mod ast;
pub mod builder;
pub mod config;
pub mod error;
pub mod interp;

pub use ast::{BinOp, BinaryNode, Node, Program};
pub use builder::ProgramBuilder;
pub use config::{ConfigError, EvalConfig};
pub use error::{BuildError, Error, Result};
pub use interp::{ErrorKind, InterpResult, Interpreter, RuntimeError, SlotKind, Value, VariableStore};

/// Evaluate `program` against `store` with the default configuration and
/// render the final value.
pub fn run(program: &Program, store: VariableStore) -> std::result::Result<String, Error> {
    run_with_config(program, store, EvalConfig::default())
}

pub fn run_with_config(
    program: &Program,
    store: VariableStore,
    config: EvalConfig,
) -> std::result::Result<String, Error> {
    config.validate()?;
    let mut interp = Interpreter::with_config(store, config);
    Ok(interp.run_to_string(program)?)
}
