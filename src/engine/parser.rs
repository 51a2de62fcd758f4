use nom::{
    IResult,
    Parser, // Import the Parser trait to use its methods like .map() and .parse()
    branch::alt,
    bytes::complete::take_while1,
    character::complete::{char, none_of, not_line_ending},
    combinator::{recognize, value},
    error::{Error as NomError, ErrorKind},
    multi::many0,
    sequence::{delimited, pair, preceded, terminated},
};
use thiserror::Error;
use tracing::{debug, trace};

use crate::engine::ast::Expr;

#[derive(Error, Debug, Clone, PartialEq)]
#[error("Parse error at line {line}, column {column}: {message}")]
pub struct ParseError {
    pub line: usize,
    pub column: usize,
    pub message: String,
}

impl ParseError {
    /// Builds an error pointing at `rest`, which must be a suffix of `source`.
    fn at(source: &str, rest: &str) -> Self {
        let offset = source.len() - rest.len();
        let consumed = &source[..offset];
        let line = consumed.matches('\n').count() + 1;
        let column = consumed
            .rsplit('\n')
            .next()
            .map_or(1, |current| current.chars().count() + 1);
        let message = match rest.chars().next() {
            Some('\\') => format!("invalid escape '{}'", rest.chars().take(2).collect::<String>()),
            Some(')') => "unexpected ')'".to_string(),
            Some('(') => "unclosed '('".to_string(),
            Some('"') => "unterminated string literal".to_string(),
            Some(other) => format!("unexpected character '{}'", other),
            None => "unexpected end of input".to_string(),
        };
        ParseError {
            line,
            column,
            message,
        }
    }
}

// Whitespace and `;` comments, in any amount. Whitespace means the same here as in
// `is_atom_char`.
fn skip_trivia(input: &str) -> IResult<&str, ()> {
    many0(alt((
        take_while1(|c: char| c.is_whitespace()),
        recognize(pair(char(';'), not_line_ending)),
    )))
    .map(|_| ())
    .parse(input)
}

fn is_atom_char(c: char) -> bool {
    !c.is_whitespace() && !"();\"".contains(c)
}

// A token is a number only if it starts with a digit, optionally after one sign,
// so `inf`, `nan` and `-` stay symbols.
fn classify_atom(token: &str) -> Expr {
    let unsigned = token.strip_prefix(&['+', '-'][..]).unwrap_or(token);
    if unsigned.starts_with(|c: char| c.is_ascii_digit()) {
        if let Ok(n) = token.parse::<f64>() {
            return Expr::Number(n);
        }
    }
    Expr::Symbol(token.to_string())
}

#[tracing::instrument(level = "trace", skip(input), fields(input = %input))]
fn parse_atom_raw(input: &str) -> IResult<&str, Expr> {
    trace!("Attempting to parse atom token");
    take_while1(is_atom_char).map(classify_atom).parse(input)
}

// A backslash must start a known escape. Anything else is a hard failure reported at the
// backslash, not a reason to backtrack out of the string.
fn escape(input: &str) -> IResult<&str, char> {
    let (after_backslash, _) = char::<&str, NomError<&str>>('\\').parse(input)?;
    alt((
        value('"', char('"')),
        value('\\', char('\\')),
        value('\n', char('n')),
        value('\t', char('t')),
        value('\r', char('r')),
    ))
    .parse(after_backslash)
    .map_err(|_: nom::Err<NomError<&str>>| {
        nom::Err::Failure(NomError::new(input, ErrorKind::Escaped))
    })
}

fn string_char(input: &str) -> IResult<&str, char> {
    alt((none_of("\"\\"), escape)).parse(input)
}

#[tracing::instrument(level = "trace", skip(input), fields(input = %input))]
fn parse_string_raw(input: &str) -> IResult<&str, Expr> {
    trace!("Attempting to parse string literal");
    delimited(char('"'), many0(string_char), char('"'))
        .map(|chars: Vec<char>| Expr::String(chars.into_iter().collect()))
        .parse(input)
}

// Parses a list of expressions e.g. (a b c). Recursive with expr_recursive_impl.
#[tracing::instrument(level = "trace", skip(input), fields(input = %input))]
fn list_raw(input: &str) -> IResult<&str, Expr> {
    trace!("Attempting to parse raw list token");
    delimited(
        char('('),
        many0(preceded(skip_trivia, expr_recursive_impl)),
        preceded(skip_trivia, char(')')),
    )
    .map(Expr::list)
    .parse(input)
}

// Core recursive parser for any single expression, without surrounding whitespace.
fn expr_recursive_impl(input: &str) -> IResult<&str, Expr> {
    alt((list_raw, parse_string_raw, parse_atom_raw)).parse(input)
}

/// Parses one expression, consuming whitespace and comments on both sides.
#[allow(dead_code)] // Programs go through parse_program; this is used by tests
pub fn parse_expr(input: &str) -> IResult<&str, Expr> {
    delimited(skip_trivia, expr_recursive_impl, skip_trivia).parse(input)
}

/// Parses every top-level form in `source`. Any input that is not a complete form is an error.
pub fn parse_program(source: &str) -> Result<Vec<Expr>, ParseError> {
    let (rest, forms) = terminated(many0(preceded(skip_trivia, expr_recursive_impl)), skip_trivia)
        .parse(source)
        .map_err(|e| match e {
            nom::Err::Error(inner) | nom::Err::Failure(inner) => ParseError::at(source, inner.input),
            nom::Err::Incomplete(_) => ParseError::at(source, ""),
        })?;

    if !rest.is_empty() {
        let error = ParseError::at(source, rest);
        debug!(%error, "Leftover input after last form");
        return Err(error);
    }
    Ok(forms)
}
