use crate::engine::ast::Expr;
use crate::engine::builtins::globals::populate_globals;
use crate::engine::eval::LispError;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use tracing::{debug, trace};

/// One lexical scope: bindings, the names it exports, and the scope it is nested in.
#[derive(Debug, PartialEq)]
pub struct Environment {
    bindings: HashMap<String, Expr>,
    // Declaration order, no duplicates.
    exports: Vec<String>,
    outer: Option<Rc<RefCell<Environment>>>,
}

impl Environment {
    /// Creates a new, empty root environment without the prelude bindings.
    #[allow(dead_code)] // This is used by tests in other modules
    pub fn new() -> Rc<RefCell<Self>> {
        debug!("Creating new empty root environment");
        Rc::new(RefCell::new(Environment {
            bindings: HashMap::new(),
            exports: Vec::new(),
            outer: None,
        }))
    }

    /// Creates the root environment a program runs in, with `true` and `false` bound.
    pub fn new_with_prelude() -> Rc<RefCell<Self>> {
        debug!("Creating new root environment with prelude");
        let env_rc = Rc::new(RefCell::new(Environment {
            bindings: HashMap::new(),
            exports: Vec::new(),
            outer: None,
        }));
        populate_globals(Rc::clone(&env_rc));
        trace!(env = ?env_rc.borrow(), "Environment after adding prelude");
        env_rc
    }

    /// Creates a new environment that is enclosed by an outer environment.
    /// Every closure invocation gets exactly one of these.
    pub fn new_enclosed(outer_env: Rc<RefCell<Environment>>) -> Rc<RefCell<Self>> {
        debug!("Creating new enclosed environment");
        Rc::new(RefCell::new(Environment {
            bindings: HashMap::new(),
            exports: Vec::new(),
            outer: Some(outer_env),
        }))
    }

    /// Defines a new variable or redefines an existing one in the current environment.
    pub fn define(&mut self, name: String, value: Expr) {
        trace!(name = %name, value = %value, "Defining variable in current environment");
        self.bindings.insert(name, value);
    }

    /// Resolves `name` here, then through each outer environment in turn.
    pub fn lookup(&self, name: &str) -> Result<Expr, LispError> {
        if let Some(value) = self.bindings.get(name) {
            trace!(name = %name, "Found variable in current environment");
            return Ok(value.clone());
        }
        match &self.outer {
            Some(outer_env) => outer_env.borrow().lookup(name),
            None => {
                debug!(name = %name, "Variable not found in any environment");
                Err(LispError::UnboundSymbol(name.to_string()))
            }
        }
    }

    /// Declares `name` as exported. The binding may come before or after.
    pub fn mark_exported(&mut self, name: String) {
        trace!(name = %name, "Marking symbol as exported");
        if !self.exports.contains(&name) {
            self.exports.push(name);
        }
    }

    /// Resolves every exported name, in declaration order.
    pub fn exported_bindings(&self) -> Result<Vec<(String, Expr)>, LispError> {
        self.exports
            .iter()
            .map(|name| Ok((name.clone(), self.lookup(name)?)))
            .collect()
    }
}
