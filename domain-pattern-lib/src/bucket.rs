//! Grouping of domain lists by repetition pattern.

use crate::pattern::derive_pattern;
use crate::types::ClassificationSummary;
use std::collections::BTreeMap;

/// Domains grouped by rendered pattern.
///
/// Groups iterate in ascending pattern order. Domains keep the exact text
/// they were classified with (no case folding, no suffix stripping).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PatternGroups {
    groups: BTreeMap<String, Vec<String>>,
}

impl PatternGroups {
    pub fn new() -> Self {
        Self::default()
    }

    /// Classify one domain into its group. Blank entries are skipped.
    ///
    /// Returns `false` when the entry was skipped.
    pub fn insert(&mut self, domain: &str) -> bool {
        if domain.trim().is_empty() {
            return false;
        }
        let pattern = derive_pattern(domain).to_string();
        self.groups
            .entry(pattern)
            .or_default()
            .push(domain.to_string());
        true
    }

    /// Number of distinct patterns.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Total number of domains across all groups.
    pub fn total_domains(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }

    /// Domains of one pattern, in insertion order.
    pub fn get(&self, pattern: &str) -> Option<&[String]> {
        self.groups.get(pattern).map(Vec::as_slice)
    }

    /// Iterate `(pattern, domains)` in ascending pattern order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.groups
            .iter()
            .map(|(pattern, domains)| (pattern.as_str(), domains.as_slice()))
    }

    /// Domains of one pattern sorted ascending, as written to disk.
    pub fn sorted(&self, pattern: &str) -> Option<Vec<String>> {
        self.groups.get(pattern).map(|domains| {
            let mut sorted = domains.clone();
            sorted.sort();
            sorted
        })
    }

    /// Counts per pattern, without an output directory.
    pub fn summary(&self) -> ClassificationSummary {
        ClassificationSummary {
            total_domains: self.total_domains(),
            pattern_counts: self
                .groups
                .iter()
                .map(|(pattern, domains)| (pattern.clone(), domains.len()))
                .collect(),
            output_dir: None,
        }
    }
}

/// Group domains by their repetition pattern.
///
/// Every non-blank input lands in exactly one group.
pub fn classify<I, S>(domains: I) -> PatternGroups
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut groups = PatternGroups::new();
    for domain in domains {
        groups.insert(domain.as_ref());
    }
    groups
}
