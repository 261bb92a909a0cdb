//! Comparison operators and single-version predicates

use std::fmt;

use thiserror::Error;

use crate::version::Version;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid operator \"{0}\"")]
pub struct InvalidOperatorError(pub String);

/// Comparison operators usable in a selector.
///
/// `Satisfies` is the `~` tag: equality on the major.minor.patch triple
/// only, ignoring prerelease and build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    Satisfies,
}

impl Op {
    /// Parse an operator token from the fixed set.
    pub fn from_str(token: &str) -> Result<Self, InvalidOperatorError> {
        match token {
            "=" => Ok(Op::Eq),
            "!=" => Ok(Op::Ne),
            "<" => Ok(Op::Lt),
            "<=" => Ok(Op::Le),
            ">" => Ok(Op::Gt),
            ">=" => Ok(Op::Ge),
            "~" => Ok(Op::Satisfies),
            _ => Err(InvalidOperatorError(token.to_string())),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Op::Eq => "=",
            Op::Ne => "!=",
            Op::Lt => "<",
            Op::Le => "<=",
            Op::Gt => ">",
            Op::Ge => ">=",
            Op::Satisfies => "~",
        }
    }

    /// All supported operator tokens.
    pub fn supported_operators() -> &'static [&'static str] {
        &["=", "!=", "<", "<=", ">", ">=", "~"]
    }
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One operator paired with a version, matched against candidate versions.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Comparator {
    op: Op,
    version: Version,
}

impl Comparator {
    /// Build a comparator, applying the default-operator rule: a missing
    /// operator means `Satisfies`, unless the version carries a prerelease
    /// or build, in which case it means strict equality.
    pub fn new(op: Option<Op>, version: Version) -> Self {
        let op = match op {
            Some(op) => op,
            None if version.component_count() == 3 => Op::Satisfies,
            None => Op::Eq,
        };
        Comparator { op, version }
    }

    /// Build a comparator with the operator taken as-is.
    pub fn with_op(op: Op, version: Version) -> Self {
        Comparator { op, version }
    }

    pub fn op(&self) -> Op {
        self.op
    }

    pub fn version(&self) -> &Version {
        &self.version
    }

    pub fn into_version(self) -> Version {
        self.version
    }

    /// Whether the candidate stands in the comparator's relation to the
    /// held version.
    pub fn matches(&self, candidate: &Version) -> bool {
        match self.op {
            Op::Eq => candidate == &self.version,
            Op::Ne => candidate != &self.version,
            Op::Lt => candidate < &self.version,
            Op::Le => candidate <= &self.version,
            Op::Gt => candidate > &self.version,
            Op::Ge => candidate >= &self.version,
            Op::Satisfies => candidate.triple() == self.version.triple(),
        }
    }
}

impl fmt::Display for Comparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.op, self.version)
    }
}
