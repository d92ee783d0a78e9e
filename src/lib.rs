pub mod ast_printer;
pub mod callable;
pub mod environment;
pub mod error;
pub mod expr;
pub mod interpreter;
pub mod parser;
pub mod resolver;
pub mod runner;
pub mod scanner;
pub mod stack;
pub mod stmt;
pub mod token;
pub mod value;

pub use error::{GluError, Result};
pub use interpreter::Interpreter;
pub use runner::Report;
pub use value::Value;
