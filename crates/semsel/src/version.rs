//! Version parsing, ordering and component access

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use lazy_static::lazy_static;
use regex::Regex;
use thiserror::Error;

use crate::selector::{Selector, SelectorError};

/// Grammar for `major.minor.patch[-prerelease][+build]`. The prerelease and
/// build groups keep their leading sigil so an explicitly empty component
/// ("1.0.0-") stays distinguishable from an absent one.
const BASE_PATTERN: &str = r"(?P<major>[0-9]+)\.(?P<minor>[0-9]+)\.(?P<patch>[0-9]+)(?P<prerelease>-(?:[0-9A-Za-z-]+(?:\.[0-9A-Za-z-]+)*)?)?(?P<build>\+(?:[0-9A-Za-z-]+(?:\.[0-9A-Za-z-]+)*)?)?";

lazy_static! {
    static ref SEARCH_RE: Regex = Regex::new(BASE_PATTERN).unwrap();
    static ref MATCH_RE: Regex = Regex::new(&format!("^{}$", BASE_PATTERN)).unwrap();
}

/// Error type for version parsing and component access
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VersionError {
    #[error("\"{0}\" is not a valid semantic version")]
    InvalidVersion(String),
    #[error("\"{0}\" is not a valid identifier sequence")]
    InvalidIdentifiers(String),
    #[error("no version component at index {0}")]
    IndexOutOfRange(usize),
    #[error("unknown version component \"{0}\"")]
    UnknownComponent(String),
}

/// One dot-delimited segment of a prerelease or build component.
///
/// Invariant: a fully numeric segment is always `Numeric`; `Text` never
/// holds an all-digit string. This keeps the derived equality consistent
/// with the ordering below.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Identifier {
    Numeric(u64),
    Text(String),
}

impl Identifier {
    fn parse(text: &str) -> Result<Self, VersionError> {
        if text.is_empty() || !text.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
            return Err(VersionError::InvalidIdentifiers(text.to_string()));
        }
        if text.chars().all(|c| c.is_ascii_digit()) {
            let n = text
                .parse()
                .map_err(|_| VersionError::InvalidIdentifiers(text.to_string()))?;
            Ok(Identifier::Numeric(n))
        } else {
            Ok(Identifier::Text(text.to_string()))
        }
    }
}

impl Ord for Identifier {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Identifier::Numeric(a), Identifier::Numeric(b)) => a.cmp(b),
            (Identifier::Text(a), Identifier::Text(b)) => a.cmp(b),
            // Mixed pairs compare ordinally, like the decimal rendering
            (Identifier::Numeric(a), Identifier::Text(b)) => a.to_string().as_str().cmp(b),
            (Identifier::Text(a), Identifier::Numeric(b)) => a.as_str().cmp(b.to_string().as_str()),
        }
    }
}

impl PartialOrd for Identifier {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Identifier::Numeric(n) => write!(f, "{}", n),
            Identifier::Text(t) => write!(f, "{}", t),
        }
    }
}

/// A dot-separated identifier sequence. May hold zero identifiers, which is
/// the explicitly empty component of "1.0.0-" and "1.0.0+".
///
/// The derived ordering is positional: the first unequal identifier pair
/// decides, otherwise the longer sequence sorts greater.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Identifiers(Vec<Identifier>);

impl Identifiers {
    /// Parse a sequence without its leading `-`/`+` sigil. The empty string
    /// yields the empty sequence.
    pub fn parse(text: &str) -> Result<Self, VersionError> {
        if text.is_empty() {
            return Ok(Identifiers(Vec::new()));
        }
        let ids = text
            .split('.')
            .map(Identifier::parse)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| VersionError::InvalidIdentifiers(text.to_string()))?;
        Ok(Identifiers(ids))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn as_slice(&self) -> &[Identifier] {
        &self.0
    }
}

impl fmt::Display for Identifiers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, id) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            write!(f, "{}", id)?;
        }
        Ok(())
    }
}

/// A positional or named component of a version.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Component<'a> {
    Number(u64),
    Tag(Option<&'a Identifiers>),
}

/// An immutable semantic version.
///
/// Versions form a strict total order: major, minor and patch compare
/// numerically; a version without a prerelease is greater than one with a
/// prerelease at the same triple, while a build raises the version. Within
/// a component, identifiers compare numerically when both sides are numeric
/// and ordinally otherwise; a longer sequence sorts greater. The explicitly
/// empty prerelease ("1.0.0-") is the floor and the explicitly empty build
/// ("1.0.0+") the ceiling of their respective groups.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Version {
    major: u64,
    minor: u64,
    patch: u64,
    prerelease: Option<Identifiers>,
    build: Option<Identifiers>,
}

impl Version {
    /// Parse a version string. The whole input must match the grammar.
    pub fn parse(text: &str) -> Result<Self, VersionError> {
        let caps = MATCH_RE
            .captures(text)
            .ok_or_else(|| VersionError::InvalidVersion(text.to_string()))?;

        let number = |name: &str| -> Result<u64, VersionError> {
            caps.name(name)
                .map(|m| m.as_str())
                .unwrap_or_default()
                .parse()
                .map_err(|_| VersionError::InvalidVersion(text.to_string()))
        };
        let tag = |name: &str| -> Result<Option<Identifiers>, VersionError> {
            caps.name(name)
                .map(|m| Identifiers::parse(&m.as_str()[1..]))
                .transpose()
                .map_err(|_| VersionError::InvalidVersion(text.to_string()))
        };

        Ok(Version {
            major: number("major")?,
            minor: number("minor")?,
            patch: number("patch")?,
            prerelease: tag("prerelease")?,
            build: tag("build")?,
        })
    }

    /// Parse the first embedded version found anywhere in the input, falling
    /// back to an exact parse (and its error) when none is embedded.
    pub fn parse_trimmed(text: &str) -> Result<Self, VersionError> {
        Self::parse(Self::clean(text).unwrap_or(text))
    }

    /// Whether the input is a valid version string.
    pub fn is_valid(text: &str) -> bool {
        MATCH_RE.is_match(text)
    }

    /// The first substring that is a valid version, scanning left to right.
    pub fn clean(text: &str) -> Option<&str> {
        SEARCH_RE.find(text).map(|m| m.as_str())
    }

    /// A plain version with neither prerelease nor build.
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        Version {
            major,
            minor,
            patch,
            prerelease: None,
            build: None,
        }
    }

    /// The lowest possible version of a triple: `M.m.p-`.
    pub fn floor(major: u64, minor: u64, patch: u64) -> Self {
        Version {
            prerelease: Some(Identifiers::default()),
            ..Self::new(major, minor, patch)
        }
    }

    /// The highest possible version of a triple: `M.m.p+`.
    pub fn ceiling(major: u64, minor: u64, patch: u64) -> Self {
        Version {
            build: Some(Identifiers::default()),
            ..Self::new(major, minor, patch)
        }
    }

    /// Replace the prerelease component, validating the identifier grammar.
    pub fn with_prerelease(mut self, identifiers: &str) -> Result<Self, VersionError> {
        self.prerelease = Some(Identifiers::parse(identifiers)?);
        Ok(self)
    }

    /// Replace the build component, validating the identifier grammar.
    pub fn with_build(mut self, identifiers: &str) -> Result<Self, VersionError> {
        self.build = Some(Identifiers::parse(identifiers)?);
        Ok(self)
    }

    pub fn major(&self) -> u64 {
        self.major
    }

    pub fn minor(&self) -> u64 {
        self.minor
    }

    pub fn patch(&self) -> u64 {
        self.patch
    }

    pub fn prerelease(&self) -> Option<&Identifiers> {
        self.prerelease.as_ref()
    }

    pub fn build(&self) -> Option<&Identifiers> {
        self.build.as_ref()
    }

    /// The numeric triple, used by the `~` satisfies comparison.
    pub fn triple(&self) -> (u64, u64, u64) {
        (self.major, self.minor, self.patch)
    }

    /// All five logical components.
    pub fn as_tuple(&self) -> (u64, u64, u64, Option<&Identifiers>, Option<&Identifiers>) {
        (
            self.major,
            self.minor,
            self.patch,
            self.prerelease.as_ref(),
            self.build.as_ref(),
        )
    }

    /// Positional component access, indices 0 through 4.
    pub fn component(&self, index: usize) -> Result<Component<'_>, VersionError> {
        match index {
            0 => Ok(Component::Number(self.major)),
            1 => Ok(Component::Number(self.minor)),
            2 => Ok(Component::Number(self.patch)),
            3 => Ok(Component::Tag(self.prerelease.as_ref())),
            4 => Ok(Component::Tag(self.build.as_ref())),
            _ => Err(VersionError::IndexOutOfRange(index)),
        }
    }

    /// Named component access.
    pub fn component_by_name(&self, name: &str) -> Result<Component<'_>, VersionError> {
        match name {
            "major" => Ok(Component::Number(self.major)),
            "minor" => Ok(Component::Number(self.minor)),
            "patch" => Ok(Component::Number(self.patch)),
            "prerelease" => Ok(Component::Tag(self.prerelease.as_ref())),
            "build" => Ok(Component::Tag(self.build.as_ref())),
            _ => Err(VersionError::UnknownComponent(name.to_string())),
        }
    }

    /// Number of present logical components: 3 plain, 4 with a prerelease,
    /// 5 whenever a build is set (even without a prerelease).
    pub fn component_count(&self) -> usize {
        if self.build.is_some() {
            5
        } else if self.prerelease.is_some() {
            4
        } else {
            3
        }
    }

    /// Whether the version matches a parsed selector.
    pub fn satisfies(&self, selector: &Selector) -> bool {
        selector.matches_version(self)
    }

    /// Parse the selector text and match against it.
    pub fn satisfies_str(&self, selector: &str) -> Result<bool, SelectorError> {
        Ok(Selector::parse(selector)?.matches_version(self))
    }
}

fn compare_prerelease(a: Option<&Identifiers>, b: Option<&Identifiers>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        // A prerelease lowers the version it is attached to
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(a), Some(b)) => a.cmp(b),
    }
}

fn compare_build(a: Option<&Identifiers>, b: Option<&Identifiers>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        // A build raises the version it is attached to
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        // The bare "+" outranks every concrete build
        (Some(a), Some(b)) => match (a.is_empty(), b.is_empty()) {
            (true, false) => Ordering::Greater,
            (false, true) => Ordering::Less,
            _ => a.cmp(b),
        },
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        self.major
            .cmp(&other.major)
            .then_with(|| self.minor.cmp(&other.minor))
            .then_with(|| self.patch.cmp(&other.patch))
            .then_with(|| compare_prerelease(self.prerelease.as_ref(), other.prerelease.as_ref()))
            .then_with(|| compare_build(self.build.as_ref(), other.build.as_ref()))
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)?;
        if let Some(prerelease) = &self.prerelease {
            write!(f, "-{}", prerelease)?;
        }
        if let Some(build) = &self.build {
            write!(f, "+{}", build)?;
        }
        Ok(())
    }
}

impl FromStr for Version {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
