//! Range expression parsing.
//!
//! Supported notations:
//! - `*` or empty: any version
//! - Maven/Forge intervals: `[1.0,2.0)`, `(1.0,]`, `[,1.5]`, and `[1.0]` for an exact pin
//! - Caret: `^1.2.3` (compatible within the major, or the minor for `0.x`)
//! - Tilde: `~1.2.3` (compatible within the minor)
//! - Comparator lists separated by whitespace or commas: `>=1.2 <2`, `1.4.0`
//!
//! Parsing never fails. Fragments that cannot be read are dropped, so a
//! malformed range becomes looser rather than unsatisfiable.

use regex::Regex;
use std::sync::LazyLock;

use super::version::version_key;
use super::{Constraint, Operator};

/// Regex for the separators between comparator tokens.
static TOKEN_SEPARATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\s,]+").expect("TOKEN_SEPARATOR must compile"));

/// Operator prefixes, longest first.
const OPERATORS: &[(&str, Operator)] = &[
    (">=", Operator::Ge),
    ("<=", Operator::Le),
    ("==", Operator::Eq),
    (">", Operator::Gt),
    ("<", Operator::Lt),
    ("=", Operator::Eq),
];

/// Parse a range expression into constraints.
///
/// ```
/// use modpin::constraint::{parse_constraints, Operator};
///
/// let constraints = parse_constraints("^1.4.2");
/// assert_eq!(constraints.len(), 2);
/// assert_eq!(constraints[0].op, Operator::Ge);
/// assert_eq!(constraints[1].to_string(), "<2.0.0");
/// ```
pub fn parse_constraints(range: &str) -> Vec<Constraint> {
    let range = range.trim();
    if range.is_empty() || range == "*" {
        return Vec::new();
    }

    if let Some(constraints) = parse_interval(range) {
        return constraints;
    }
    if let Some(operand) = range.strip_prefix('^') {
        return expand_compatible(Compatibility::Caret, operand.trim());
    }
    if let Some(operand) = range.strip_prefix('~') {
        return expand_compatible(Compatibility::Tilde, operand.trim());
    }

    join_detached_operators(range)
        .iter()
        .filter_map(|token| parse_token(token))
        .collect()
}

/// Best-effort parse of one comparator token.
///
/// A token is an optional comparator (`>=`, `<=`, `>`, `<`, `=`, `==`)
/// followed by a version; without a comparator it means `=`. Returns `None`,
/// dropping the token from the range, when the token is empty, is a wildcard
/// (`*`, `x`, `X`), has no version after its comparator, or has a version that
/// itself starts with a comparator character.
///
/// ```
/// use modpin::constraint::{parse_token, Operator};
///
/// assert_eq!(parse_token(">=1.2").map(|c| c.op), Some(Operator::Ge));
/// assert_eq!(parse_token("1.2").map(|c| c.op), Some(Operator::Eq));
/// assert!(parse_token(">=").is_none());
/// assert!(parse_token("*").is_none());
/// ```
pub fn parse_token(token: &str) -> Option<Constraint> {
    let token = token.trim();
    let (op, rest) = split_operator(token);
    let bound = rest.trim();

    if bound.is_empty() || is_wildcard(bound) || bound.starts_with(['<', '>', '=']) {
        tracing::debug!("Dropping unparseable range token '{}'", token);
        return None;
    }

    Some(Constraint::new(op, bound))
}

fn split_operator(token: &str) -> (Operator, &str) {
    OPERATORS
        .iter()
        .find_map(|(prefix, op)| token.strip_prefix(prefix).map(|rest| (*op, rest)))
        .unwrap_or((Operator::Eq, token))
}

fn is_wildcard(bound: &str) -> bool {
    matches!(bound, "*" | "x" | "X")
}

fn is_bare_operator(token: &str) -> bool {
    OPERATORS.iter().any(|(prefix, _)| *prefix == token)
}

/// Split a comparator list into tokens, re-attaching a comparator that was
/// separated from its version by whitespace (`>= 1.2`).
fn join_detached_operators(range: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut pending: Option<&str> = None;

    for raw in TOKEN_SEPARATOR.split(range).filter(|t| !t.is_empty()) {
        if is_bare_operator(raw) {
            pending = Some(raw);
            continue;
        }
        match pending.take() {
            Some(op) => tokens.push(format!("{}{}", op, raw)),
            None => tokens.push(raw.to_string()),
        }
    }

    tokens
}

/// Parse a bracketed interval; `None` when `range` is not one.
fn parse_interval(range: &str) -> Option<Vec<Constraint>> {
    let lower_inclusive = match range.chars().next()? {
        '[' => true,
        '(' => false,
        _ => return None,
    };
    let upper_inclusive = match range.chars().last()? {
        ']' => true,
        ')' => false,
        _ => return None,
    };
    if range.len() < 2 {
        return None;
    }

    let inner = &range[1..range.len() - 1];
    let Some((lower, upper)) = inner.split_once(',') else {
        // Maven pins an exact version as `[1.0]`.
        let bound = inner.trim();
        return (lower_inclusive && upper_inclusive && !bound.is_empty())
            .then(|| vec![Constraint::new(Operator::Eq, bound)]);
    };
    let (lower, upper) = (lower.trim(), upper.trim());

    let mut constraints = Vec::with_capacity(2);
    if !lower.is_empty() {
        let op = if lower_inclusive {
            Operator::Ge
        } else {
            Operator::Gt
        };
        constraints.push(Constraint::new(op, lower));
    }
    if !upper.is_empty() {
        let op = if upper_inclusive {
            Operator::Le
        } else {
            Operator::Lt
        };
        constraints.push(Constraint::new(op, upper));
    }
    Some(constraints)
}

#[derive(Debug, Clone, Copy)]
enum Compatibility {
    Caret,
    Tilde,
}

/// Expand `^v` / `~v` into a `>= v` lower bound and an exclusive upper bound.
fn expand_compatible(kind: Compatibility, operand: &str) -> Vec<Constraint> {
    if operand.is_empty() {
        return Vec::new();
    }

    let key = version_key(operand);
    let major = key[0];
    let minor = key.get(1).copied().unwrap_or(0);

    let upper = match kind {
        Compatibility::Tilde => format!("{}.{}.0", major, minor.saturating_add(1)),
        Compatibility::Caret if major != 0 => format!("{}.0.0", major.saturating_add(1)),
        Compatibility::Caret => format!("0.{}.0", minor.saturating_add(1)),
    };

    vec![
        Constraint::new(Operator::Ge, operand),
        Constraint::new(Operator::Lt, upper),
    ]
}
