// This module is only compiled when running tests
#![cfg(test)]

use crate::engine::ast::Expr;
use crate::engine::env::Environment;
use crate::engine::eval::{LispError, eval};
use crate::engine::parser::parse_program;
use std::cell::RefCell;
use std::rc::Rc;

pub fn sym(name: &str) -> Expr {
    Expr::Symbol(name.to_string())
}

pub fn num(n: f64) -> Expr {
    Expr::Number(n)
}

pub fn string(s: &str) -> Expr {
    Expr::String(s.to_string())
}

pub fn list(items: Vec<Expr>) -> Expr {
    Expr::list(items)
}

/// Parses `source` and evaluates each form in `env`, returning the last value.
/// Panics on parse errors so evaluation failures are what the test sees.
pub fn eval_str(source: &str, env: Rc<RefCell<Environment>>) -> Result<Expr, LispError> {
    let forms = parse_program(source)
        .unwrap_or_else(|e| panic!("Test source failed to parse: {} ({})", source, e));
    let mut last = Expr::empty();
    for form in &forms {
        last = eval(form, Rc::clone(&env))?;
    }
    Ok(last)
}
