pub mod error;
pub mod runner;

pub use error::RunError;
pub use runner::{DEFAULT_INTERPRETER, INTERPRETER_ENV, RunOutcome, Runner};
