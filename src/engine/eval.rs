use crate::engine::ast::{Closure, Expr};
use crate::engine::builtins::special_forms::eval_special_form;
use crate::engine::env::Environment;
use crate::engine::program::ProgramError;
use crate::engine::special_forms as special_form_constants;
use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;
use thiserror::Error;
use tracing::{debug, instrument, trace};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LispError {
    #[error("Unbound symbol: {0}")]
    UnboundSymbol(String),
    #[error("Not callable: {0}")]
    NotCallable(String),
    #[error("Arity mismatch: closure expects {expected} arguments, got {got}")]
    ArityMismatch { expected: usize, got: usize },
    #[error("Invalid '{form}' form: {message}")]
    InvalidForm { form: String, message: String },
    #[error("No true predicate in {0}")]
    NoMatchingCase(String),
    #[error("Error importing module '{}'", path.display())]
    Import {
        path: PathBuf,
        source: Box<ProgramError>,
    },
}

#[instrument(skip(expr, env), fields(expr = %expr), ret(level = "trace"), err(level = "debug"))]
pub fn eval(expr: &Expr, env: Rc<RefCell<Environment>>) -> Result<Expr, LispError> {
    trace!("Starting evaluation");
    match expr {
        Expr::Symbol(name) => {
            debug!(symbol_name = %name, "Evaluating Symbol");
            env.borrow().lookup(name)
        }
        Expr::Number(_) | Expr::String(_) | Expr::Closure(_) => Ok(expr.clone()),
        Expr::List(list) => {
            let Some((first_form, arg_exprs)) = list.split_first() else {
                trace!("List is empty, evaluating to empty list");
                return Ok(Expr::empty());
            };

            // Keywords are recognised before anything is evaluated.
            if let Expr::Symbol(s) = first_form {
                if special_form_constants::is_special_form(s) {
                    return eval_special_form(list, env);
                }
            }

            trace!("First element is not a special form, evaluating as application");
            let closure = match eval(first_form, Rc::clone(&env))? {
                Expr::Closure(closure) => closure,
                other => {
                    debug!(evaluated_to = %other, "Attempted to call a non-closure expression");
                    return Err(LispError::NotCallable(format!(
                        "{} evaluated to {} {}",
                        first_form,
                        other.type_name(),
                        other
                    )));
                }
            };

            let mut evaluated_args = Vec::with_capacity(arg_exprs.len());
            for arg_expr in arg_exprs {
                evaluated_args.push(eval(arg_expr, Rc::clone(&env))?);
            }

            apply(&closure, evaluated_args)
        }
    }
}

/// Binds `args` to the closure's parameters in a fresh scope over its captured environment
/// and evaluates the body there.
#[instrument(skip(closure, evaluated_args), fields(params = ?closure.params, argc = evaluated_args.len()), err(level = "debug"))]
pub fn apply(closure: &Closure, evaluated_args: Vec<Expr>) -> Result<Expr, LispError> {
    if evaluated_args.len() != closure.params.len() {
        debug!(
            expected = closure.params.len(),
            got = evaluated_args.len(),
            "Arity mismatch for closure call"
        );
        return Err(LispError::ArityMismatch {
            expected: closure.params.len(),
            got: evaluated_args.len(),
        });
    }

    let call_env = Environment::new_enclosed(Rc::clone(&closure.env));
    {
        let mut call_env_borrowed = call_env.borrow_mut();
        for (param_name, arg_value) in closure.params.iter().zip(evaluated_args) {
            call_env_borrowed.define(param_name.clone(), arg_value);
        }
    }

    debug!(body = %closure.body, "Evaluating closure body");
    eval(&closure.body, call_env)
}
