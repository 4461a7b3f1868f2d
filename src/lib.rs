//! A small interactive command interpreter.
//!
//! Each line is tokenized (with quote handling and alias expansion of the
//! first word), checked against the builtins, rewritten to run script files
//! through an interpreter, scanned for `<`, `>` and a single `|`, and finally
//! executed as one process or two processes joined by a pipe. The loop waits
//! for every child before reading the next line.
//!
//! The main entry point is [`Interpreter`], which evaluates single lines or
//! drives a read-eval loop over any [`LineReader`].

pub mod alias;
mod builtin;
pub mod command;
pub mod config;
pub mod env;
pub mod error;
mod interpreter;
pub mod lexer;
mod line_reader;
pub mod process;
pub mod redirect;
pub mod rewrite;

pub use builtin::try_builtin;
pub use interpreter::Interpreter;
pub use line_reader::{LineReader, RustylineReader, ShellHelper};
