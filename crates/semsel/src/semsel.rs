use crate::selector::Selector;
use crate::version::Version;

/// Lenient string-level convenience API.
///
/// Every method here swallows parse errors instead of returning them:
/// an unparseable version or selector simply does not match and is
/// dropped from results. Use [`Version`] and [`Selector`] directly when
/// errors matter.
pub struct Semsel;

impl Semsel {
    /// Whether `version` matches `selector`. False if either fails to parse.
    pub fn satisfies(version: &str, selector: &str) -> bool {
        let Ok(selector) = Selector::parse(selector) else {
            return false;
        };
        match Version::parse(version) {
            Ok(version) => selector.matches_version(&version),
            Err(_) => false,
        }
    }

    /// All parseable versions that match `selector`, in input order.
    pub fn satisfied_by(versions: &[&str], selector: &str) -> Vec<String> {
        let Ok(selector) = Selector::parse(selector) else {
            return Vec::new();
        };
        versions
            .iter()
            .filter_map(|text| Version::parse(text).ok().map(|v| (text, v)))
            .filter(|(_, version)| selector.matches_version(version))
            .map(|(text, _)| text.to_string())
            .collect()
    }

    /// The highest version matching `selector`, or `None`.
    pub fn max_satisfying(versions: &[&str], selector: &str) -> Option<String> {
        let Ok(selector) = Selector::parse(selector) else {
            return None;
        };
        versions
            .iter()
            .filter_map(|text| Version::parse(text).ok().map(|v| (text, v)))
            .filter(|(_, version)| selector.matches_version(version))
            .max_by(|(_, a), (_, b)| a.cmp(b))
            .map(|(text, _)| text.to_string())
    }

    /// The lowest version matching `selector`, or `None`.
    pub fn min_satisfying(versions: &[&str], selector: &str) -> Option<String> {
        let Ok(selector) = Selector::parse(selector) else {
            return None;
        };
        versions
            .iter()
            .filter_map(|text| Version::parse(text).ok().map(|v| (text, v)))
            .filter(|(_, version)| selector.matches_version(version))
            .min_by(|(_, a), (_, b)| a.cmp(b))
            .map(|(text, _)| text.to_string())
    }

    /// Parseable versions sorted ascending. Unparseable entries are dropped.
    pub fn sort(versions: &[&str]) -> Vec<String> {
        Self::usort(versions, true)
    }

    /// Parseable versions sorted descending. Unparseable entries are dropped.
    pub fn rsort(versions: &[&str]) -> Vec<String> {
        Self::usort(versions, false)
    }

    // Stable in both directions: equal versions keep their input order
    fn usort(versions: &[&str], ascending: bool) -> Vec<String> {
        let mut parsed: Vec<(&str, Version)> = versions
            .iter()
            .filter_map(|text| Version::parse(text).ok().map(|v| (*text, v)))
            .collect();
        parsed.sort_by(|(_, a), (_, b)| {
            let cmp = a.cmp(b);
            if ascending {
                cmp
            } else {
                cmp.reverse()
            }
        });
        parsed.into_iter().map(|(text, _)| text.to_string()).collect()
    }
}
