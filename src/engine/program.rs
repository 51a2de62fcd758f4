//! Running whole programs: a file's top-level forms evaluated in order against one root
//! environment. `import` goes through here to harvest another file's exports.

use crate::engine::ast::Expr;
use crate::engine::env::Environment;
use crate::engine::eval::{LispError, eval};
use crate::engine::parser::{ParseError, parse_program};
use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use thiserror::Error;
use tracing::{debug, info, instrument, trace};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProgramError {
    #[error("I/O error: kind: {kind:?}, message: {message}")]
    Io {
        kind: std::io::ErrorKind,
        message: String,
    },
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Eval(#[from] LispError),
    #[error("Import cycle: {0:?} is already being loaded")]
    Cycle(PathBuf),
}

impl From<std::io::Error> for ProgramError {
    fn from(e: std::io::Error) -> Self {
        ProgramError::Io {
            kind: e.kind(),
            message: e.to_string(),
        }
    }
}

thread_local! {
    // Canonical paths of the files currently being run, outermost first.
    static LOADING: RefCell<Vec<PathBuf>> = const { RefCell::new(Vec::new()) };
}

/// Marks a file as in progress for as long as it is alive.
struct LoadGuard;

impl LoadGuard {
    fn enter(path: &Path) -> Result<Self, ProgramError> {
        let canonical = fs::canonicalize(path)?;
        LOADING.with(|loading| {
            let mut loading = loading.borrow_mut();
            if loading.contains(&canonical) {
                return Err(ProgramError::Cycle(canonical));
            }
            loading.push(canonical);
            Ok(LoadGuard)
        })
    }
}

impl Drop for LoadGuard {
    fn drop(&mut self) {
        LOADING.with(|loading| {
            loading.borrow_mut().pop();
        });
    }
}

/// Evaluates `forms` in order against `env`, stopping at the first failure.
/// Returns the value of the last form, if there was one.
pub fn run_forms(forms: &[Expr], env: Rc<RefCell<Environment>>) -> Result<Option<Expr>, LispError> {
    let mut last = None;
    for (index, form) in forms.iter().enumerate() {
        trace!(index, form = %form, "Evaluating top-level form");
        last = Some(eval(form, Rc::clone(&env))?);
    }
    Ok(last)
}

/// Runs `forms` as an independent program in a fresh root environment and returns that
/// environment, with every `def` and `export` the program made.
pub fn run_program(forms: &[Expr]) -> Result<Rc<RefCell<Environment>>, LispError> {
    let env = Environment::new_with_prelude();
    run_forms(forms, Rc::clone(&env))?;
    Ok(env)
}

/// Parses and evaluates `source` against an existing environment.
pub fn evaluate_source(
    source: &str,
    env: Rc<RefCell<Environment>>,
) -> Result<Option<Expr>, ProgramError> {
    let forms = parse_program(source)?;
    debug!(count = forms.len(), "Parsed source");
    Ok(run_forms(&forms, env)?)
}

fn read_program(path: &Path) -> Result<Vec<Expr>, ProgramError> {
    let source = fs::read_to_string(path)?;
    let forms = parse_program(&source)?;
    debug!(path = %path.display(), count = forms.len(), "Parsed program file");
    Ok(forms)
}

/// Reads, parses and runs the file at `path` as a program of its own, returning its
/// root environment.
#[instrument(skip_all, fields(path = %path.display()), err(level = "debug"))]
pub fn load_program(path: &Path) -> Result<Rc<RefCell<Environment>>, ProgramError> {
    let _guard = LoadGuard::enter(path)?;
    let forms = read_program(path)?;
    Ok(run_program(&forms)?)
}

/// Runs the file at `path` as the main program and returns the value of its last form.
#[instrument(skip_all, fields(path = %path.display()), err(level = "debug"))]
pub fn run_file(path: &Path) -> Result<Option<Expr>, ProgramError> {
    let _guard = LoadGuard::enter(path)?;
    let forms = read_program(path)?;
    info!(count = forms.len(), "Running program");
    Ok(run_forms(&forms, Environment::new_with_prelude())?)
}

/// Runs the file at `path` and collects its exported bindings.
pub fn import_exports(path: &Path) -> Result<Vec<(String, Expr)>, ProgramError> {
    let env = load_program(path)?;
    let exports = env.borrow().exported_bindings()?;
    Ok(exports)
}
