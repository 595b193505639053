//! Tree-walking interpreter with adaptive binary operations

mod error;
mod eval;
mod store;
mod value;

pub use error::{ErrorKind, InterpResult, RuntimeError};
pub use eval::Interpreter;
pub use store::{SlotKind, VariableStore};
pub use value::Value;
