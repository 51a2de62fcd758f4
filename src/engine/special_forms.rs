//! Defines special forms (keywords) for the Lisp interpreter.

// Constants for individual special form names, can be used for matching.
pub const DEF: &str = "def";
pub const FN: &str = "fn";
pub const LITERAL: &str = "literal";
pub const CASE: &str = "case";
pub const IMPORT: &str = "import";
pub const EXPORT: &str = "export";

/// Array of special form names. A list headed by one of these is never treated as an application.
pub const SPECIAL_FORMS: &[&str] = &[DEF, FN, LITERAL, CASE, IMPORT, EXPORT];

/// Checks if a given name is a special form.
pub fn is_special_form(name: &str) -> bool {
    SPECIAL_FORMS.contains(&name)
}
