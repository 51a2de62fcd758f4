use super::invalid_form;
use crate::engine::ast::Expr;
use crate::engine::eval::LispError;
use crate::engine::special_forms::LITERAL;
use tracing::{instrument, trace};

#[instrument(skip(args), fields(argc = args.len()), err(level = "debug"))]
pub fn eval_literal(args: &[Expr]) -> Result<Expr, LispError> {
    trace!("Executing 'literal' special form");
    match args {
        [quoted] => Ok(quoted.clone()),
        _ => Err(invalid_form(
            LITERAL,
            format!("expects 1 argument, got {}", args.len()),
        )),
    }
}
