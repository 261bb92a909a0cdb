//! Selector grammar: comparators composed into AND/OR groups

mod group;
mod parse;

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

pub use group::{AndGroup, OrGroup};

use crate::version::{Version, VersionError};

/// Error type for selector parsing
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SelectorError {
    #[error(transparent)]
    InvalidVersion(#[from] VersionError),
    #[error("could not parse selector \"{selector}\": {reason}")]
    Syntax { selector: String, reason: String },
}

/// A parsed range selector, e.g. `~1.2 !=1.2.5 || 2.x`.
///
/// Owns one [`OrGroup`] of [`AndGroup`]s of comparators; immutable after
/// parse. The `Display` form is the canonical expansion with explicit
/// operators and bounds (`~1.2` renders as `>=1.2.0- <1.3.0-`), not the
/// original shorthand.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Selector {
    group: OrGroup,
}

impl Selector {
    /// Parse a selector string.
    pub fn parse(text: &str) -> Result<Self, SelectorError> {
        let group = parse::SelectorParser::new(text).parse()?;
        Ok(Selector { group })
    }

    pub fn or_group(&self) -> &OrGroup {
        &self.group
    }

    /// Whether a single version matches the selector.
    pub fn matches_version(&self, version: &Version) -> bool {
        self.group.matches(version)
    }

    /// The subset of pre-parsed candidates that match, in input order.
    pub fn matches<'a>(&self, candidates: &'a [Version]) -> Vec<&'a Version> {
        candidates
            .iter()
            .filter(|v| self.matches_version(v))
            .collect()
    }

    /// The subset of candidate strings that match, in input order. Each
    /// candidate is parsed on the fly; an unparseable candidate is an
    /// error, not a non-match.
    pub fn matches_str<'a>(&self, candidates: &[&'a str]) -> Result<Vec<&'a str>, VersionError> {
        let mut matched = Vec::new();
        for candidate in candidates {
            if self.matches_version(&Version::parse(candidate)?) {
                matched.push(*candidate);
            }
        }
        Ok(matched)
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.group)
    }
}

impl FromStr for Selector {
    type Err = SelectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
