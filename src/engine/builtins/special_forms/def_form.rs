use super::invalid_form;
use crate::engine::ast::Expr;
use crate::engine::env::Environment;
use crate::engine::eval::{LispError, eval as main_eval};
use crate::engine::special_forms::DEF;
use std::cell::RefCell;
use std::rc::Rc;
use tracing::{debug, instrument, trace};

#[instrument(skip(args, env), fields(argc = args.len()), err(level = "debug"))]
pub fn eval_def(args: &[Expr], env: Rc<RefCell<Environment>>) -> Result<Expr, LispError> {
    trace!("Executing 'def' special form");
    let [name_expr, value_expr] = args else {
        return Err(invalid_form(
            DEF,
            format!(
                "expects a symbol and an expression, got {} arguments",
                args.len()
            ),
        ));
    };

    let Expr::Symbol(name) = name_expr else {
        return Err(invalid_form(
            DEF,
            format!(
                "first argument must be a symbol, found {} {}",
                name_expr.type_name(),
                name_expr
            ),
        ));
    };

    let value = main_eval(value_expr, Rc::clone(&env))?;
    debug!(name = %name, value = %value, "'def' binding symbol");
    env.borrow_mut().define(name.clone(), value);
    Ok(Expr::empty())
}
