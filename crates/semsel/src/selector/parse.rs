//! Selector tokenizer and shorthand expansion

use lazy_static::lazy_static;
use regex::Regex;

use crate::comparator::{Comparator, Op};
use crate::selector::group::{AndGroup, OrGroup};
use crate::selector::SelectorError;
use crate::version::{Version, VersionError};

lazy_static! {
    // X-range: version components that may be wildcards or missing, with an
    // optional operator prefix; trailing garbage lands in `other`.
    static ref XRANGE_RE: Regex = Regex::new(
        r"^(?P<op>[<>]=?|~>?=?)?(?P<major>\d+|[xX*])(?:\.(?P<minor>\d+|[xX*]))?(?:\.(?P<patch>\d+|[xX*]))?(?P<other>.*)$"
    )
    .unwrap();

    // Fuzzy range: "~", "~1", "~1.2", "~1.2.3", also "~>" and "~=" prefixes.
    static ref FUZZY_RE: Regex = Regex::new(
        r"^(?P<op>[<>]=?|~>?=?)?(?:(?P<major>\d+)(?:\.(?P<minor>\d+)(?:\.(?P<patch>\d+)(?P<other>[-+][0-9A-Za-z-+.]*)?)?)?)?$"
    )
    .unwrap();

    // Splits an operator prefix off a plain comparator token.
    static ref SPLIT_OP_RE: Regex = Regex::new(r"^(?P<op>[<>!]?=|<|>)?(?P<ver>.*)$").unwrap();
}

fn is_digits(text: &str) -> bool {
    !text.is_empty() && text.bytes().all(|b| b.is_ascii_digit())
}

pub(crate) struct SelectorParser<'a> {
    text: &'a str,
}

impl<'a> SelectorParser<'a> {
    pub(crate) fn new(text: &'a str) -> Self {
        SelectorParser { text }
    }

    fn syntax(&self, reason: impl Into<String>) -> SelectorError {
        SelectorError::Syntax {
            selector: self.text.to_string(),
            reason: reason.into(),
        }
    }

    /// Tokenize on whitespace and expand each shorthand into comparators.
    pub(crate) fn parse(&self) -> Result<OrGroup, SelectorError> {
        let tokens: Vec<&str> = self.text.split_whitespace().collect();
        if tokens.is_empty() {
            return Err(self.syntax("empty selector"));
        }

        let mut or_group = OrGroup::new();
        let mut and_group = AndGroup::new();
        let mut i = 0;

        while i < tokens.len() {
            let raw = tokens[i];
            i += 1;

            if raw == "||" {
                if and_group.is_empty() {
                    if or_group.groups().is_empty() {
                        return Err(self.syntax("selector may not start with \"||\""));
                    }
                    // Consecutive "||" collapse to one boundary
                    continue;
                }
                or_group.push(std::mem::take(&mut and_group));
                continue;
            }

            if raw == "-" {
                let bound = tokens
                    .get(i)
                    .ok_or_else(|| self.syntax("dangling \"-\" range"))?;
                i += 1;
                self.expand_dash(&mut and_group, bound)?;
                continue;
            }

            let rewritten = self.normalize_x_range(raw)?;
            let token = rewritten.as_deref().unwrap_or(raw);

            if token.starts_with('~') {
                self.expand_fuzzy(&mut and_group, token)?;
            } else {
                and_group.push(self.parse_comparator(token)?);
            }
        }

        if and_group.is_empty() {
            return Err(self.syntax("selector may not end with \"||\""));
        }
        or_group.push(and_group);
        Ok(or_group)
    }

    /// Rewrite a wildcard or incomplete version token into its tilde form
    /// ("2.x" -> "~2"). Returns `None` for tokens that are not x-ranges so
    /// the caller falls through to the plain comparator path.
    fn normalize_x_range(&self, token: &str) -> Result<Option<String>, SelectorError> {
        let caps = match XRANGE_RE.captures(token) {
            Some(caps) => caps,
            None => return Ok(None),
        };

        let components = ["major", "minor", "patch"]
            .map(|name| caps.name(name).map(|m| m.as_str()));
        if components.iter().all(|c| c.is_some_and(is_digits)) {
            // A complete numeric version; never an x-range
            return Ok(None);
        }

        let op = caps.name("op").map_or("", |m| m.as_str());
        let wildcard = components
            .iter()
            .flatten()
            .any(|c| matches!(*c, "x" | "X" | "*"));
        if op.starts_with('<') || op.starts_with('>') {
            if wildcard {
                return Err(self.syntax(format!(
                    "operator \"{}\" is not allowed on the x-range wildcard \"{}\"",
                    op, token
                )));
            }
            // Incomplete but wildcard-free ("<1.0"); leave the token to the
            // comparator parser, which rejects the truncated version.
            return Ok(None);
        }

        if caps.name("other").is_some_and(|m| !m.as_str().is_empty()) {
            return Err(self.syntax(format!(
                "x-range \"{}\" does not allow trailing pre-release or build components",
                token
            )));
        }

        let mut digits: Vec<&str> = Vec::new();
        let mut gap = false;
        for component in components {
            match component {
                Some(c) if is_digits(c) => {
                    if gap {
                        return Err(self.syntax(format!(
                            "numeric component after wildcard in x-range \"{}\"",
                            token
                        )));
                    }
                    digits.push(c);
                }
                _ => gap = true,
            }
        }

        let mut rewritten = String::from(op);
        rewritten.push_str(&digits.join("."));
        if !rewritten.starts_with('~') {
            rewritten.insert(0, '~');
        }
        Ok(Some(rewritten))
    }

    /// Expand a tilde token into a `>=M.m.p-` lower bound and, when a major
    /// component was given, a `<E-` upper bound incrementing the least
    /// specific specified component.
    fn expand_fuzzy(&self, and_group: &mut AndGroup, token: &str) -> Result<(), SelectorError> {
        let caps = FUZZY_RE
            .captures(token)
            .ok_or_else(|| self.syntax(format!("invalid fuzzy range \"{}\"", token)))?;

        if caps.name("other").is_some_and(|m| !m.as_str().is_empty()) {
            return Err(self.syntax(format!(
                "fuzzy range \"{}\" does not allow pre-release or build components",
                token
            )));
        }

        let mut components = [None; 3];
        for (slot, name) in components.iter_mut().zip(["major", "minor", "patch"]) {
            *slot = caps
                .name(name)
                .map(|m| {
                    m.as_str()
                        .parse::<u64>()
                        .map_err(|_| VersionError::InvalidVersion(token.to_string()))
                })
                .transpose()?;
        }

        and_group.push(Comparator::with_op(
            Op::Ge,
            Version::floor(
                components[0].unwrap_or(0),
                components[1].unwrap_or(0),
                components[2].unwrap_or(0),
            ),
        ));

        if components[0].is_some() {
            let mut upper = [0u64; 3];
            for j in 0..3 {
                match components[j] {
                    // The most specific component never carries over as-is
                    Some(n) if j < 2 => upper[j] = n,
                    _ => {
                        upper[j - 1] = upper[j - 1].checked_add(1).ok_or_else(|| {
                            self.syntax(format!(
                                "fuzzy range \"{}\" has no representable upper bound",
                                token
                            ))
                        })?;
                        break;
                    }
                }
            }
            and_group.push(Comparator::with_op(
                Op::Lt,
                Version::floor(upper[0], upper[1], upper[2]),
            ));
        }
        Ok(())
    }

    /// Rewrite `A - B` as `>=A <=B`, replacing the comparator already built
    /// for `A`.
    fn expand_dash(&self, and_group: &mut AndGroup, bound: &str) -> Result<(), SelectorError> {
        if matches!(bound, "-" | "||") {
            return Err(self.syntax(format!(
                "\"{}\" may not bound a \"-\" range",
                bound
            )));
        }
        let lower = and_group
            .pop()
            .ok_or_else(|| self.syntax("\"-\" range without a lower bound"))?;
        if !matches!(lower.op(), Op::Eq | Op::Satisfies) {
            return Err(self.syntax(format!(
                "lower bound \"{}\" of a \"-\" range may not carry an operator",
                lower
            )));
        }

        // The pattern is total; every token matches
        let caps = SPLIT_OP_RE.captures(bound).unwrap();
        if !matches!(caps.name("op").map(|m| m.as_str()), None | Some("=")) {
            return Err(self.syntax(format!(
                "upper bound \"{}\" of a \"-\" range may not carry an operator",
                bound
            )));
        }
        let upper = Version::parse(caps.name("ver").map_or("", |m| m.as_str()))?;

        and_group.push(Comparator::with_op(Op::Ge, lower.into_version()));
        and_group.push(Comparator::with_op(Op::Le, upper));
        Ok(())
    }

    /// A plain comparator token: optional operator prefix, then a full
    /// version string.
    fn parse_comparator(&self, token: &str) -> Result<Comparator, SelectorError> {
        let caps = SPLIT_OP_RE.captures(token).unwrap();
        let op = match caps.name("op") {
            // The pattern only captures tokens from the fixed set
            Some(m) => Some(Op::from_str(m.as_str()).map_err(|e| self.syntax(e.to_string()))?),
            None => None,
        };
        let version = Version::parse(caps.name("ver").map_or("", |m| m.as_str()))?;
        Ok(Comparator::new(op, version))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Result<OrGroup, SelectorError> {
        SelectorParser::new(text).parse()
    }

    fn canonical(text: &str) -> String {
        parse(text).unwrap().to_string()
    }

    #[test]
    fn test_xrange_and_fuzzy_canonical_forms() {
        for (selectors, expected) in [
            ("*, ~, ~>x, ~=X, x, X", ">=0.0.0-"),
            ("2.x, 2.x.x, 2, ~2, ~>2, ~2.x", ">=2.0.0- <3.0.0-"),
            ("~1.2, ~1.2.x, ~>1.2, ~>1.2.x, 1.2.x, 1.2.*", ">=1.2.0- <1.3.0-"),
            ("~1.2.3, ~>1.2.3", ">=1.2.3- <1.3.0-"),
            ("~1.2.0, ~>1.2.0", ">=1.2.0- <1.3.0-"),
            ("~0", ">=0.0.0- <1.0.0-"),
        ] {
            for selector in selectors.split(", ") {
                assert_eq!(canonical(selector), expected, "selector {:?}", selector);
            }
        }
    }

    #[test]
    fn test_dash_range_canonical_forms() {
        assert_eq!(canonical("1.0.0 - 3.0.0"), ">=1.0.0 <=3.0.0");
        assert_eq!(
            canonical("2.1.0-beta.2 - 2.1.0-beta.3+456"),
            ">=2.1.0-beta.2 <=2.1.0-beta.3+456"
        );
        // "=" on the upper bound is the one permitted prefix
        assert_eq!(canonical("1.0.0 - =3.0.0"), ">=1.0.0 <=3.0.0");
    }

    #[test]
    fn test_comparator_canonical_forms() {
        for (selector, expected) in [
            ("<0.2.6", "<0.2.6"),
            (">=0.2.6", ">=0.2.6"),
            ("<=0.2.6", "<=0.2.6"),
            ("=0.2.6", "=0.2.6"),
            ("0.2.6", "~0.2.6"),
            ("0.2.6-", "=0.2.6-"),
            ("!=0.2.6", "!=0.2.6"),
        ] {
            assert_eq!(canonical(selector), expected);
        }
    }

    #[test]
    fn test_and_or_canonical_forms() {
        assert_eq!(canonical(">1.0.0 <0.2.6"), ">1.0.0 <0.2.6");
        assert_eq!(canonical("0.0.0-pre 10.0.2+123"), "=0.0.0-pre =10.0.2+123");
        assert_eq!(canonical(">1.0.0 || <0.2.6"), ">1.0.0 || <0.2.6");
        assert_eq!(
            canonical("!=0.0.0-pre || <=10.0.2+123"),
            "!=0.0.0-pre || <=10.0.2+123"
        );
    }

    #[test]
    fn test_consecutive_or_collapses() {
        assert_eq!(canonical("1.2.3 || || 1.3.4"), "~1.2.3 || ~1.3.4");
        assert_eq!(canonical("1.2.3 || || || 1.3.4"), "~1.2.3 || ~1.3.4");
    }

    #[test]
    fn test_invalid_version_errors() {
        for selector in [
            ">1.0",
            ">=1",
            "<1.0",
            ">v1.2.3",
            "1.1.1.1",
            "a.b.c",
            "!=1.2.x",
            "!=0",
            "1.2.3-4++",
            "1.2.3++",
            "1.2.3 - 1.2.3++",
            "<",
            "-1.2.3",
        ] {
            assert!(
                matches!(parse(selector), Err(SelectorError::InvalidVersion(_))),
                "{:?} should be an invalid-version error, got {:?}",
                selector,
                parse(selector)
            );
        }
    }

    #[test]
    fn test_syntax_errors() {
        for selector in [
            "",
            "   ",
            ">1.2.3 - 1.2.3",
            "1.2.3 - >1.2.3",
            "1.2.3 - <=1.2.4",
            "~1 || - 1.2.3",
            "1.2.3 -",
            "1.2.3 - - 1.2.4",
            "1.2.3 - || 1.2.4",
            "~!1.2.0",
            "**",
            "1.2.xx",
            "1.x.2",
            "x.2",
            "1..2",
            "~1.2.3-alpha",
            "~1.2-alpha",
            ">*",
            ">2.x",
            "<2.x",
            ">=1.*",
            "|| <=10.0.2+123",
            "!=0.0.0-pre ||",
        ] {
            assert!(
                matches!(parse(selector), Err(SelectorError::Syntax { .. })),
                "{:?} should be a syntax error, got {:?}",
                selector,
                parse(selector)
            );
        }
    }

    #[test]
    fn test_fuzzy_upper_bound_at_numeric_limit() {
        // Incrementing past u64::MAX cannot produce an upper bound
        for selector in [
            "~18446744073709551615",
            "18446744073709551615.x",
            "~1.18446744073709551615",
        ] {
            assert!(
                matches!(parse(selector), Err(SelectorError::Syntax { .. })),
                "{:?} should be a syntax error, got {:?}",
                selector,
                parse(selector)
            );
        }
        // The limit only matters for the component being incremented
        assert_eq!(
            canonical("~18446744073709551614"),
            ">=18446744073709551614.0.0- <18446744073709551615.0.0-"
        );
        assert_eq!(
            canonical("~1.2.18446744073709551615"),
            ">=1.2.18446744073709551615- <1.3.0-"
        );
    }

    #[test]
    fn test_xrange_rewrite() {
        let parser = SelectorParser::new("");
        assert_eq!(parser.normalize_x_range("2.x").unwrap().unwrap(), "~2");
        assert_eq!(parser.normalize_x_range("2.1.*").unwrap().unwrap(), "~2.1");
        assert_eq!(parser.normalize_x_range("1").unwrap().unwrap(), "~1");
        assert_eq!(parser.normalize_x_range("~2.x").unwrap().unwrap(), "~2");
        assert_eq!(parser.normalize_x_range("~=X").unwrap().unwrap(), "~=");
        assert_eq!(parser.normalize_x_range("*").unwrap().unwrap(), "~");
        // Complete numeric versions and non-versions pass through untouched
        assert_eq!(parser.normalize_x_range("1.2.3").unwrap(), None);
        assert_eq!(parser.normalize_x_range("<1.2.3-pre").unwrap(), None);
        assert_eq!(parser.normalize_x_range("foo").unwrap(), None);
    }
}
