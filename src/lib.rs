#[macro_use]
extern crate log;

pub mod ast;
pub mod error;
pub mod eval;
mod lexer;
pub mod parser;
pub mod scope;
pub mod toplevel;
pub mod typeck;
pub mod value;

pub use crate::error::{Error, ErrorKind};
pub use crate::toplevel::{check, run};
