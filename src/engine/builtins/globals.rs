use crate::engine::ast::{Expr, FALSE, TRUE};
use crate::engine::env::Environment;
use std::cell::RefCell;
use std::rc::Rc;
use tracing::trace;

/// Populates a program's root environment. The booleans are plain symbols bound to
/// themselves so that `true` and `false` can be written bare.
pub fn populate_globals(env: Rc<RefCell<Environment>>) {
    trace!("Populating global bindings");
    let mut root_env_borrowed = env.borrow_mut();
    for name in [TRUE, FALSE] {
        root_env_borrowed.define(name.to_string(), Expr::Symbol(name.to_string()));
    }
}
