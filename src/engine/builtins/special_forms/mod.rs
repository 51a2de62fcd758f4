// Declare modules for each special form
pub mod case_form;
pub mod def_form;
pub mod export_form;
pub mod fn_form;
pub mod import_form;
pub mod literal_form;

pub use case_form::eval_case;
pub use def_form::eval_def;
pub use export_form::eval_export;
pub use fn_form::eval_fn;
pub use import_form::eval_import;
pub use literal_form::eval_literal;

use crate::engine::ast::Expr;
use crate::engine::env::Environment;
use crate::engine::eval::LispError;
use crate::engine::special_forms as special_form_constants;
use std::cell::RefCell;
use std::rc::Rc;
use tracing::debug;

/// Routes a whole special-form list (keyword included) to its handler.
pub fn eval_special_form(list: &[Expr], env: Rc<RefCell<Environment>>) -> Result<Expr, LispError> {
    let Some((Expr::Symbol(keyword), args)) = list.split_first() else {
        debug!("Special form dispatch called without a leading keyword");
        return Err(invalid_form(
            "special form",
            "expected a list headed by a keyword".to_string(),
        ));
    };

    match keyword.as_str() {
        special_form_constants::DEF => eval_def(args, env),
        special_form_constants::FN => eval_fn(args, env),
        special_form_constants::LITERAL => eval_literal(args),
        special_form_constants::CASE => eval_case(args, env),
        special_form_constants::IMPORT => eval_import(args, env),
        special_form_constants::EXPORT => eval_export(args, env),
        other => Err(invalid_form(other, "not a special form".to_string())),
    }
}

pub(crate) fn invalid_form(form: &str, message: String) -> LispError {
    debug!(form, %message, "Malformed special form");
    LispError::InvalidForm {
        form: form.to_string(),
        message,
    }
}
