use super::invalid_form;
use crate::engine::ast::{Closure, Expr};
use crate::engine::env::Environment;
use crate::engine::eval::LispError;
use crate::engine::special_forms::FN;
use std::cell::RefCell;
use std::rc::Rc;
use tracing::{debug, instrument, trace};

#[instrument(skip(args, env), fields(argc = args.len()), err(level = "debug"))]
pub fn eval_fn(args: &[Expr], env: Rc<RefCell<Environment>>) -> Result<Expr, LispError> {
    trace!("Executing 'fn' special form");
    let [params_expr, body_expr] = args else {
        return Err(invalid_form(
            FN,
            format!(
                "expects 2 arguments (parameters list and body), got {}",
                args.len()
            ),
        ));
    };

    let Expr::List(params_list) = params_expr else {
        return Err(invalid_form(
            FN,
            format!(
                "parameters must be a list, found {} {}",
                params_expr.type_name(),
                params_expr
            ),
        ));
    };

    let mut param_names = Vec::with_capacity(params_list.len());
    for param in params_list.iter() {
        match param {
            Expr::Symbol(name) => param_names.push(name.clone()),
            other => {
                return Err(invalid_form(
                    FN,
                    format!(
                        "parameters must be symbols, found {} {}",
                        other.type_name(),
                        other
                    ),
                ));
            }
        }
    }

    debug!(parameters = ?param_names, body = %body_expr, "'fn' creating closure");
    Ok(Expr::Closure(Rc::new(Closure {
        params: param_names,
        body: body_expr.clone(),
        env: Rc::clone(&env),
    })))
}

#[cfg(test)]
mod tests {
    use crate::engine::ast::Expr;
    use crate::engine::env::Environment;
    use crate::engine::eval::{LispError, eval};
    use crate::logging::init_test_logging;
    use crate::test_utils::{eval_str, list, num, sym};
    use std::rc::Rc;

    #[test]
    fn eval_fn_creates_closure() {
        init_test_logging();
        let env = Environment::new();
        let fn_expr_ast = list(vec![
            sym("fn"),
            list(vec![sym("x"), sym("y")]),
            sym("x"),
        ]);

        match eval(&fn_expr_ast, Rc::clone(&env)) {
            Ok(Expr::Closure(closure)) => {
                assert_eq!(closure.params, vec!["x".to_string(), "y".to_string()]);
                assert_eq!(closure.body, sym("x"));
                assert!(Rc::ptr_eq(&closure.env, &env));
            }
            other => panic!("Expected closure, got {:?}", other),
        }
    }

    #[test]
    fn eval_fn_empty_params() {
        init_test_logging();
        let env = Environment::new();
        let fn_expr_ast = list(vec![sym("fn"), Expr::empty(), num(10.0)]);
        match eval(&fn_expr_ast, env) {
            Ok(Expr::Closure(closure)) => {
                assert!(closure.params.is_empty());
                assert_eq!(closure.body, num(10.0));
            }
            other => panic!("Expected closure, got {:?}", other),
        }
    }

    #[test]
    fn eval_fn_does_not_evaluate_body() {
        init_test_logging();
        let env = Environment::new();
        let result = eval_str("(fn () (this would fail))", env);
        assert!(matches!(result, Ok(Expr::Closure(_))));
    }

    #[test]
    fn eval_fn_wrong_length() {
        init_test_logging();
        let env = Environment::new();
        assert_eq!(
            eval_str("(fn (x))", Rc::clone(&env)),
            Err(LispError::InvalidForm {
                form: "fn".to_string(),
                message: "expects 2 arguments (parameters list and body), got 1".to_string()
            })
        );
        assert_eq!(
            eval_str("(fn (x) x x)", env),
            Err(LispError::InvalidForm {
                form: "fn".to_string(),
                message: "expects 2 arguments (parameters list and body), got 3".to_string()
            })
        );
    }

    #[test]
    fn eval_fn_param_not_a_list() {
        init_test_logging();
        let env = Environment::new();
        assert_eq!(
            eval_str("(fn x x)", env),
            Err(LispError::InvalidForm {
                form: "fn".to_string(),
                message: "parameters must be a list, found symbol x".to_string()
            })
        );
    }

    #[test]
    fn eval_fn_param_list_contains_non_symbol() {
        init_test_logging();
        let env = Environment::new();
        assert_eq!(
            eval_str("(fn (x 10) x)", env),
            Err(LispError::InvalidForm {
                form: "fn".to_string(),
                message: "parameters must be symbols, found number 10".to_string()
            })
        );
    }
}
