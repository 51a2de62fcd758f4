use crate::engine::env::Environment;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Symbol that `case` treats as a taken branch.
pub const TRUE: &str = "true";
pub const FALSE: &str = "false";

thread_local! {
    // Every "no value" result shares this one allocation.
    static EMPTY_LIST: Rc<[Expr]> = Rc::from(Vec::new());
}

/// A callable value: formal parameters, an unevaluated body, and the scope it was created in.
#[derive(Clone)]
pub struct Closure {
    pub params: Vec<String>,
    pub body: Expr,
    /// The defining scope, held strongly so a closure can outlive the call that made it.
    /// Binding a closure with `def` in the scope it captured forms a reference cycle, and that
    /// scope then lives until the process exits. Call scopes that no surviving closure
    /// captured are freed when the call returns.
    pub env: Rc<RefCell<Environment>>,
}

impl fmt::Debug for Closure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Closure")
            .field("params", &self.params)
            .field("body", &self.body)
            .field("env", &"<captured_env>") // Avoid printing the whole env
            .finish()
    }
}

// Closures are equal if their parameters and body are structurally equal.
// The captured environment is not considered for this PartialEq.
impl PartialEq for Closure {
    fn eq(&self, other: &Self) -> bool {
        self.params == other.params && self.body == other.body
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Symbol(String),
    Number(f64),
    String(String),
    List(Rc<[Expr]>),
    Closure(Rc<Closure>),
}

impl Expr {
    /// The shared empty list.
    pub fn empty() -> Expr {
        EMPTY_LIST.with(|list| Expr::List(Rc::clone(list)))
    }

    /// Builds a list, reusing the shared instance when `items` is empty.
    pub fn list(items: Vec<Expr>) -> Expr {
        if items.is_empty() {
            Expr::empty()
        } else {
            Expr::List(Rc::from(items))
        }
    }

    pub fn is_empty_list(&self) -> bool {
        matches!(self, Expr::List(items) if items.is_empty())
    }

    /// Only the symbol `true` selects a `case` branch; everything else is false.
    pub fn is_true(&self) -> bool {
        matches!(self, Expr::Symbol(s) if s == TRUE)
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Expr::Symbol(_) => "symbol",
            Expr::Number(_) => "number",
            Expr::String(_) => "string",
            Expr::List(_) => "list",
            Expr::Closure(_) => "closure",
        }
    }
}

fn write_escaped(f: &mut fmt::Formatter<'_>, s: &str) -> fmt::Result {
    f.write_str("\"")?;
    for c in s.chars() {
        match c {
            '"' => f.write_str("\\\"")?,
            '\\' => f.write_str("\\\\")?,
            '\n' => f.write_str("\\n")?,
            '\t' => f.write_str("\\t")?,
            '\r' => f.write_str("\\r")?,
            other => write!(f, "{}", other)?,
        }
    }
    f.write_str("\"")
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Symbol(s) => f.write_str(s),
            Expr::Number(n) => write!(f, "{}", n),
            Expr::String(s) => write_escaped(f, s),
            Expr::List(items) => {
                f.write_str("(")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{}", item)?;
                }
                f.write_str(")")
            }
            Expr::Closure(closure) => write!(f, "<fn ({})>", closure.params.join(" ")),
        }
    }
}
