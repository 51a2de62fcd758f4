use super::invalid_form;
use crate::engine::ast::Expr;
use crate::engine::env::Environment;
use crate::engine::eval::{LispError, eval as main_eval};
use crate::engine::special_forms::CASE;
use std::cell::RefCell;
use std::rc::Rc;
use tracing::{debug, instrument, trace};

/// Evaluates predicates in order and evaluates the result paired with the first one that
/// yields the symbol `true`. Clauses after the match are neither evaluated nor validated.
#[instrument(skip(args, env), fields(clauses = args.len()), err(level = "debug"))]
pub fn eval_case(args: &[Expr], env: Rc<RefCell<Environment>>) -> Result<Expr, LispError> {
    trace!("Executing 'case' special form");
    for (index, clause) in args.iter().enumerate() {
        let Expr::List(pair) = clause else {
            return Err(invalid_form(
                CASE,
                format!(
                    "clause {} must be a (predicate result) list, found {} {}",
                    index,
                    clause.type_name(),
                    clause
                ),
            ));
        };
        let [predicate, result] = &pair[..] else {
            return Err(invalid_form(
                CASE,
                format!(
                    "clause {} must pair a predicate with a result, found {}",
                    index, clause
                ),
            ));
        };

        let outcome = main_eval(predicate, Rc::clone(&env))?;
        if outcome.is_true() {
            debug!(index, "'case' clause selected");
            return main_eval(result, env);
        }
        trace!(index, outcome = %outcome, "'case' predicate not true");
    }

    let whole_form = Expr::list(
        std::iter::once(Expr::Symbol(CASE.to_string()))
            .chain(args.iter().cloned())
            .collect(),
    );
    Err(LispError::NoMatchingCase(whole_form.to_string()))
}
