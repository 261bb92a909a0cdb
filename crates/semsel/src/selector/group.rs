//! Conjunctive and disjunctive comparator groups

use std::fmt;

use crate::comparator::Comparator;
use crate::version::Version;

/// An ordered conjunction of comparators: matches when every comparator
/// matches. Insertion order carries no matching semantics but is preserved
/// for the canonical string form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct AndGroup {
    comparators: Vec<Comparator>,
}

impl AndGroup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, comparator: Comparator) {
        self.comparators.push(comparator);
    }

    pub(crate) fn pop(&mut self) -> Option<Comparator> {
        self.comparators.pop()
    }

    pub fn is_empty(&self) -> bool {
        self.comparators.is_empty()
    }

    pub fn comparators(&self) -> &[Comparator] {
        &self.comparators
    }

    /// Vacuously true when empty; the selector grammar never produces an
    /// empty group.
    pub fn matches(&self, version: &Version) -> bool {
        self.comparators.iter().all(|c| c.matches(version))
    }
}

impl fmt::Display for AndGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, comparator) in self.comparators.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{}", comparator)?;
        }
        Ok(())
    }
}

/// An ordered disjunction of [`AndGroup`]s: matches when any group matches.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct OrGroup {
    groups: Vec<AndGroup>,
}

impl OrGroup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, group: AndGroup) {
        self.groups.push(group);
    }

    pub fn groups(&self) -> &[AndGroup] {
        &self.groups
    }

    /// Vacuously false when empty.
    pub fn matches(&self, version: &Version) -> bool {
        self.groups.iter().any(|g| g.matches(version))
    }
}

impl fmt::Display for OrGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, group) in self.groups.iter().enumerate() {
            if i > 0 {
                f.write_str(" || ")?;
            }
            write!(f, "{}", group)?;
        }
        Ok(())
    }
}
