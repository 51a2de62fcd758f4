use super::invalid_form;
use crate::engine::ast::Expr;
use crate::engine::env::Environment;
use crate::engine::eval::LispError;
use crate::engine::special_forms::EXPORT;
use std::cell::RefCell;
use std::rc::Rc;
use tracing::{instrument, trace};

#[instrument(skip(args, env), fields(argc = args.len()), err(level = "debug"))]
pub fn eval_export(args: &[Expr], env: Rc<RefCell<Environment>>) -> Result<Expr, LispError> {
    trace!("Executing 'export' special form");
    match args {
        [Expr::Symbol(name)] => {
            env.borrow_mut().mark_exported(name.clone());
            Ok(Expr::empty())
        }
        [other] => Err(invalid_form(
            EXPORT,
            format!(
                "argument must be a symbol, found {} {}",
                other.type_name(),
                other
            ),
        )),
        _ => Err(invalid_form(
            EXPORT,
            format!("expects 1 symbol, got {} arguments", args.len()),
        )),
    }
}
