//! The core Lisp engine: AST, parser, evaluator, environment, special forms and the program runner.

pub mod ast;
pub mod builtins;
pub mod env;
pub mod eval;
pub mod parser;
pub mod program;
pub mod special_forms;
