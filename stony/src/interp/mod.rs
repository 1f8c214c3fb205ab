//! Evaluator for lowered Stonylang programs

mod error;
mod eval;
mod store;
mod value;

pub use error::{ErrorKind, EvalResult, RuntimeError};
pub use eval::Evaluator;
pub use store::{Slot, VariableStore};
pub use value::Value;
