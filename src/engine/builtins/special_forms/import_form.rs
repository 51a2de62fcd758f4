use super::invalid_form;
use crate::engine::ast::Expr;
use crate::engine::env::Environment;
use crate::engine::eval::LispError;
use crate::engine::program;
use crate::engine::special_forms::IMPORT;
use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;
use tracing::{debug, instrument, trace};

#[instrument(skip(args, env), fields(argc = args.len()), err(level = "debug"))]
pub fn eval_import(args: &[Expr], env: Rc<RefCell<Environment>>) -> Result<Expr, LispError> {
    trace!("Executing 'import' special form");
    let [Expr::String(path_str)] = args else {
        return Err(invalid_form(
            IMPORT,
            "takes a file location as a single string argument".to_string(),
        ));
    };

    let path = PathBuf::from(path_str);
    let exports = program::import_exports(&path).map_err(|source| {
        debug!(path = %path.display(), error = %source, "Import failed");
        LispError::Import {
            path: path.clone(),
            source: Box::new(source),
        }
    })?;

    debug!(path = %path.display(), count = exports.len(), "Merging exported bindings");
    let mut env_borrowed = env.borrow_mut();
    for (name, value) in exports {
        env_borrowed.define(name, value);
    }
    Ok(Expr::empty())
}

#[cfg(test)]
mod tests {
    use crate::engine::env::Environment;
    use crate::engine::eval::LispError;
    use crate::engine::program::ProgramError;
    use crate::logging::init_test_logging;
    use crate::test_utils::{eval_str, num, string, sym};
    use std::fs;
    use std::path::{Path, PathBuf};
    use std::rc::Rc;
    use tempfile::tempdir;

    fn write_module(dir: &Path, name: &str, source: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, source).unwrap();
        path
    }

    fn import_expr(path: &Path) -> String {
        format!("(import \"{}\")", path.display())
    }

    #[test]
    fn import_merges_exported_bindings() {
        init_test_logging();
        let dir = tempdir().unwrap();
        let module = write_module(
            dir.path(),
            "a.flisp",
            "(def x \"from a\") (def hidden 1) (export x)",
        );
        let env = Environment::new_with_prelude();

        let result = eval_str(&import_expr(&module), Rc::clone(&env)).unwrap();
        assert!(result.is_empty_list());
        assert_eq!(eval_str("x", Rc::clone(&env)), Ok(string("from a")));
        assert_eq!(
            eval_str("hidden", env),
            Err(LispError::UnboundSymbol("hidden".to_string()))
        );
    }

    #[test]
    fn imported_closure_keeps_its_module_scope() {
        init_test_logging();
        let dir = tempdir().unwrap();
        let module = write_module(
            dir.path(),
            "lib.flisp",
            "; helpers
             (def secret (literal inside))
             (def reveal (fn () secret))
             (export reveal)",
        );
        let env = Environment::new_with_prelude();
        eval_str(&import_expr(&module), Rc::clone(&env)).unwrap();
        eval_str("(def secret (literal outside))", Rc::clone(&env)).unwrap();
        assert_eq!(eval_str("(reveal)", env), Ok(sym("inside")));
    }

    #[test]
    fn importer_bindings_are_invisible_to_module() {
        init_test_logging();
        let dir = tempdir().unwrap();
        let module = write_module(dir.path(), "needs.flisp", "(def y importer-only) (export y)");
        let env = Environment::new_with_prelude();
        eval_str("(def importer-only 1)", Rc::clone(&env)).unwrap();

        match eval_str(&import_expr(&module), env) {
            Err(LispError::Import { path, source }) => {
                assert_eq!(path, module);
                assert_eq!(
                    *source,
                    ProgramError::Eval(LispError::UnboundSymbol("importer-only".to_string()))
                );
            }
            other => panic!("Expected import failure, got {:?}", other),
        }
    }

    #[test]
    fn reimport_evaluates_again() {
        init_test_logging();
        let dir = tempdir().unwrap();
        let module = write_module(dir.path(), "m.flisp", "(def v 1) (export v)");
        let env = Environment::new_with_prelude();
        eval_str(&import_expr(&module), Rc::clone(&env)).unwrap();

        fs::write(&module, "(def v 2) (export v)").unwrap();
        eval_str(&import_expr(&module), Rc::clone(&env)).unwrap();
        assert_eq!(eval_str("v", env), Ok(num(2.0)));
    }

    #[test]
    fn import_overwrites_existing_binding() {
        init_test_logging();
        let dir = tempdir().unwrap();
        let module = write_module(dir.path(), "m.flisp", "(def v 1) (export v)");
        let env = Environment::new_with_prelude();
        let source = format!("(def v 0) {} v", import_expr(&module));
        assert_eq!(eval_str(&source, env), Ok(num(1.0)));
    }

    #[test]
    fn nested_import_reexports() {
        init_test_logging();
        let dir = tempdir().unwrap();
        let inner = write_module(dir.path(), "inner.flisp", "(def base 10) (export base)");
        let outer = write_module(
            dir.path(),
            "outer.flisp",
            &format!("{} (export base)", import_expr(&inner)),
        );
        let env = Environment::new_with_prelude();
        assert_eq!(
            eval_str(&format!("{} base", import_expr(&outer)), env),
            Ok(num(10.0))
        );
    }

    #[test]
    fn import_missing_file() {
        init_test_logging();
        let dir = tempdir().unwrap();
        let missing = dir.path().join("missing.flisp");
        let env = Environment::new_with_prelude();
        match eval_str(&import_expr(&missing), env) {
            Err(LispError::Import { path, source }) => {
                assert_eq!(path, missing);
                assert!(matches!(*source, ProgramError::Io { .. }));
            }
            other => panic!("Expected import failure, got {:?}", other),
        }
    }

    #[test]
    fn import_error_leaves_cause_to_source_chain() {
        init_test_logging();
        let dir = tempdir().unwrap();
        let module = write_module(dir.path(), "bad.flisp", "oops");
        let env = Environment::new_with_prelude();
        let error = eval_str(&import_expr(&module), env).unwrap_err();

        assert_eq!(
            error.to_string(),
            format!("Error importing module '{}'", module.display())
        );
        let cause = std::error::Error::source(&error).map(|cause| cause.to_string());
        assert_eq!(cause.as_deref(), Some("Unbound symbol: oops"));
    }

    #[test]
    fn import_parse_error_is_wrapped() {
        init_test_logging();
        let dir = tempdir().unwrap();
        let module = write_module(dir.path(), "broken.flisp", "(def x 1");
        let env = Environment::new_with_prelude();
        match eval_str(&import_expr(&module), env) {
            Err(LispError::Import { source, .. }) => {
                assert!(matches!(*source, ProgramError::Parse(_)));
            }
            other => panic!("Expected import failure, got {:?}", other),
        }
    }

    #[test]
    fn import_exported_but_unbound_fails() {
        init_test_logging();
        let dir = tempdir().unwrap();
        let module = write_module(dir.path(), "ghost.flisp", "(export ghost)");
        let env = Environment::new_with_prelude();
        match eval_str(&import_expr(&module), env) {
            Err(LispError::Import { source, .. }) => {
                assert_eq!(
                    *source,
                    ProgramError::Eval(LispError::UnboundSymbol("ghost".to_string()))
                );
            }
            other => panic!("Expected import failure, got {:?}", other),
        }
    }

    #[test]
    fn import_cycle_is_reported() {
        init_test_logging();
        let dir = tempdir().unwrap();
        let a = dir.path().join("a.flisp");
        let b = dir.path().join("b.flisp");
        fs::write(&a, import_expr(&b)).unwrap();
        fs::write(&b, import_expr(&a)).unwrap();
        let env = Environment::new_with_prelude();

        let mut error = eval_str(&import_expr(&a), env).unwrap_err();
        // test -> a -> b -> a
        let mut depth = 0;
        while let LispError::Import { source, .. } = error {
            depth += 1;
            match *source {
                ProgramError::Eval(inner) => error = inner,
                ProgramError::Cycle(path) => {
                    assert_eq!(path, fs::canonicalize(&a).unwrap());
                    assert_eq!(depth, 3);
                    return;
                }
                other => panic!("Unexpected import failure {:?}", other),
            }
        }
        panic!("Expected import cycle, got {:?}", error);
    }

    #[test]
    fn import_requires_single_string() {
        init_test_logging();
        let env = Environment::new_with_prelude();
        for source in ["(import)", "(import lib)", "(import \"a\" \"b\")"] {
            assert!(
                matches!(
                    eval_str(source, Rc::clone(&env)),
                    Err(LispError::InvalidForm { ref form, .. }) if form == "import"
                ),
                "{source} should be rejected"
            );
        }
    }
}
