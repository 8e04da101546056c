//! Version range constraints.
//!
//! A declared range such as `[1.0,2.0)`, `^0.5.3` or `>=1.2 <2` is reduced to
//! an ordered list of comparator [`Constraint`]s. A candidate version
//! satisfies the range when it satisfies every constraint; the empty list
//! accepts anything.
//!
//! Ordering between versions is intentionally approximate (see
//! [`compare_versions`]) and parsing is intentionally permissive (see
//! [`parse_token`]).
//!
//! # Example
//!
//! ```
//! use modpin::constraint::VersionRange;
//!
//! let range = VersionRange::parse("[1.0,2.0)");
//! assert!(range.matches("1.9.9"));
//! assert!(!range.matches("2.0.0"));
//! ```

mod parse;
mod version;

pub use parse::{parse_constraints, parse_token};
pub use version::{compare_versions, version_key};

use std::cmp::Ordering;
use std::fmt;

/// Comparison operator of a single constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    /// `=`
    Eq,
    /// `>`
    Gt,
    /// `>=`
    Ge,
    /// `<`
    Lt,
    /// `<=`
    Le,
}

impl Operator {
    /// The textual form of the operator.
    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::Gt => ">",
            Self::Ge => ">=",
            Self::Lt => "<",
            Self::Le => "<=",
        }
    }

    /// Whether an ordering of `version` relative to the bound passes.
    fn accepts(&self, ordering: Ordering) -> bool {
        match self {
            Self::Eq => ordering == Ordering::Equal,
            Self::Gt => ordering == Ordering::Greater,
            Self::Ge => ordering != Ordering::Less,
            Self::Lt => ordering == Ordering::Less,
            Self::Le => ordering != Ordering::Greater,
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// A single `operator bound` comparison.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Constraint {
    pub op: Operator,
    pub bound: String,
}

impl Constraint {
    pub fn new(op: Operator, bound: impl Into<String>) -> Self {
        Self {
            op,
            bound: bound.into(),
        }
    }

    /// Check whether `version` satisfies this constraint.
    pub fn is_satisfied_by(&self, version: &str) -> bool {
        self.op.accepts(compare_versions(version, &self.bound))
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.op, self.bound)
    }
}

/// Check whether `version` satisfies every constraint.
///
/// An empty constraint list is satisfied by any version.
pub fn satisfies(version: &str, constraints: &[Constraint]) -> bool {
    constraints.iter().all(|c| c.is_satisfied_by(version))
}

/// A parsed version range.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VersionRange {
    constraints: Vec<Constraint>,
}

impl VersionRange {
    /// Parse a declared range. Never fails; see [`parse_constraints`].
    pub fn parse(range: &str) -> Self {
        Self {
            constraints: parse_constraints(range),
        }
    }

    /// A range that accepts every version.
    pub fn any() -> Self {
        Self::default()
    }

    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    /// Whether the range has no constraints at all.
    pub fn is_any(&self) -> bool {
        self.constraints.is_empty()
    }

    /// Check whether `version` satisfies the range.
    pub fn matches(&self, version: &str) -> bool {
        satisfies(version, &self.constraints)
    }

    /// The bound of an exact-version range.
    ///
    /// Returns `Some` only when the range is exactly one `=` constraint.
    pub fn exact_bound(&self) -> Option<&str> {
        match self.constraints.as_slice() {
            [only] if only.op == Operator::Eq => Some(&only.bound),
            _ => None,
        }
    }
}

impl fmt::Display for VersionRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.constraints.is_empty() {
            return f.write_str("*");
        }
        let parts: Vec<String> = self.constraints.iter().map(|c| c.to_string()).collect();
        f.write_str(&parts.join(", "))
    }
}
