//! Semantic version comparing and range-selector matching
//!
//! This crate provides semantic version parsing with a strict total order
//! and npm-style range selectors (`~1.2`, `2.x`, `1.0.0 - 3.0.0`,
//! `>=1.0.0 <2.0.0 || 3.x`).

pub mod selector;
mod comparator;
mod semsel;
mod version;

pub use comparator::{Comparator, InvalidOperatorError, Op};
pub use selector::{AndGroup, OrGroup, Selector, SelectorError};
pub use semsel::Semsel;
pub use version::{Component, Identifier, Identifiers, Version, VersionError};
