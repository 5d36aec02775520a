//! Candidate domain generation.
//!
//! Produces every label of a fixed length over a charset, appends a suffix,
//! and keeps the names accepted by the optional filters. The result is a
//! plain domain list that the classifier reads like any other input.
//!
//! # Charsets
//!
//! - `d`: digits (0-9)
//! - `D`: lowercase letters (a-z)
//! - `a`: letters then digits
//!
//! # Examples
//!
//! ```
//! use domain_pattern_lib::{generate_domains, Charset, FilterMode, GenerateConfig};
//!
//! let names = generate_domains(&GenerateConfig::new(2, Charset::Digits, "li")).unwrap();
//! assert_eq!(names.len(), 100);
//! assert_eq!(names[0], "00.li");
//!
//! let config = GenerateConfig::new(3, Charset::Letters, ".de")
//!     .with_filter("^a", FilterMode::Prefix)
//!     .with_shape("ABA");
//! let names = generate_domains(&config).unwrap();
//! assert_eq!(names.len(), 25); // aba.de .. aza.de, minus aaa.de
//! ```

use crate::error::PatternError;
use crate::pattern::derive_pattern;
use crate::persist::write_domain_list;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, info};

/// Longest accepted filter expression.
pub const MAX_FILTER_LEN: usize = 200;

/// Upper bound on the unfiltered candidate count of one run.
pub const MAX_CANDIDATES: usize = 5_000_000;

/// Characters a generated label is built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Charset {
    Digits,
    Letters,
    Alphanumeric,
}

impl Charset {
    pub fn chars(self) -> &'static [u8] {
        match self {
            Self::Digits => b"0123456789",
            Self::Letters => b"abcdefghijklmnopqrstuvwxyz",
            Self::Alphanumeric => b"abcdefghijklmnopqrstuvwxyz0123456789",
        }
    }

    /// Short flag: `d`, `D` or `a`.
    pub fn flag(self) -> &'static str {
        match self {
            Self::Digits => "d",
            Self::Letters => "D",
            Self::Alphanumeric => "a",
        }
    }
}

impl FromStr for Charset {
    type Err = PatternError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "d" | "digits" => Ok(Self::Digits),
            "D" | "letters" => Ok(Self::Letters),
            "a" | "alnum" | "alphanumeric" => Ok(Self::Alphanumeric),
            other => Err(PatternError::config(format!(
                "Unknown charset '{}'. Use d (digits), D (letters) or a (alphanumeric)",
                other
            ))),
        }
    }
}

impl fmt::Display for Charset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.flag())
    }
}

/// What the regex filter is matched against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterMode {
    /// The whole domain, suffix included
    #[default]
    Full,
    /// The generated label only
    Prefix,
}

impl FromStr for FilterMode {
    type Err = PatternError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "full" => Ok(Self::Full),
            "prefix" => Ok(Self::Prefix),
            other => Err(PatternError::config(format!(
                "Unknown filter mode '{}'. Use 'full' or 'prefix'",
                other
            ))),
        }
    }
}

/// Parameters of one generation run.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerateConfig {
    /// Label length in characters
    pub length: usize,
    pub charset: Charset,
    /// Appended to every label, always starting with `.` unless empty
    pub suffix: String,
    /// Regex the candidate must match somewhere
    pub filter: Option<String>,
    pub filter_mode: FilterMode,
    /// Repetition pattern the label must have, e.g. `ABAB`
    pub shape: Option<String>,
}

impl GenerateConfig {
    pub fn new<S: AsRef<str>>(length: usize, charset: Charset, suffix: S) -> Self {
        Self {
            length,
            charset,
            suffix: normalize_suffix(suffix.as_ref()),
            filter: None,
            filter_mode: FilterMode::Full,
            shape: None,
        }
    }

    pub fn with_filter<S: Into<String>>(mut self, filter: S, mode: FilterMode) -> Self {
        self.filter = Some(filter.into());
        self.filter_mode = mode;
        self
    }

    pub fn with_shape<S: AsRef<str>>(mut self, shape: S) -> Self {
        self.shape = Some(shape.as_ref().trim().to_uppercase());
        self
    }
}

/// Prefix a non-empty suffix with `.` when it lacks one.
pub fn normalize_suffix(suffix: &str) -> String {
    let suffix = suffix.trim();
    if suffix.is_empty() || suffix.starts_with('.') {
        suffix.to_string()
    } else {
        format!(".{}", suffix)
    }
}

/// Number of labels before filtering. Saturates instead of overflowing.
pub fn estimate_count(length: usize, charset: Charset) -> usize {
    let exponent = u32::try_from(length).unwrap_or(u32::MAX);
    charset.chars().len().saturating_pow(exponent)
}

fn compile_filter(filter: &str) -> crate::Result<Regex> {
    if filter.len() > MAX_FILTER_LEN {
        return Err(PatternError::config(format!(
            "Filter regex is too long (max {} characters)",
            MAX_FILTER_LEN
        )));
    }
    Regex::new(filter)
        .map_err(|e| PatternError::config(format!("Invalid filter regex '{}': {}", filter, e)))
}

/// Generate every candidate domain the configuration accepts.
///
/// Labels are produced in charset order, rightmost position varying
/// fastest (`aa`, `ab`, …, `ba`, …).
///
/// # Errors
///
/// `ConfigError` for a zero length, an invalid or oversized filter, or a
/// candidate space larger than [`MAX_CANDIDATES`].
pub fn generate_domains(config: &GenerateConfig) -> crate::Result<Vec<String>> {
    if config.length == 0 {
        return Err(PatternError::config("Length must be at least 1"));
    }

    let total = estimate_count(config.length, config.charset);
    if total > MAX_CANDIDATES {
        return Err(PatternError::config(format!(
            "{} candidates exceed the limit of {}; use a shorter length or a smaller charset",
            total, MAX_CANDIDATES
        )));
    }

    let filter = config.filter.as_deref().map(compile_filter).transpose()?;
    let chars = config.charset.chars();
    let mut counters = vec![0usize; config.length];
    let mut names = Vec::new();

    for _ in 0..total {
        let label: String = counters.iter().map(|&i| chars[i] as char).collect();
        let domain = format!("{}{}", label, config.suffix);

        let passes_filter = match (&filter, config.filter_mode) {
            (None, _) => true,
            (Some(re), FilterMode::Full) => re.is_match(&domain),
            (Some(re), FilterMode::Prefix) => re.is_match(&label),
        };
        let passes_shape = config
            .shape
            .as_deref()
            .map_or(true, |shape| derive_pattern(&label).to_string() == shape);

        if passes_filter && passes_shape {
            names.push(domain);
        }

        // Odometer step, rightmost first
        for counter in counters.iter_mut().rev() {
            *counter += 1;
            if *counter < chars.len() {
                break;
            }
            *counter = 0;
        }
    }

    debug!(
        charset = %config.charset,
        length = config.length,
        candidates = total,
        kept = names.len(),
        "generated domains"
    );
    Ok(names)
}

/// Write generated names as a domain list, creating parent directories.
pub fn save_candidates(path: &Path, names: &[String]) -> crate::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .map_err(|e| PatternError::directory_creation(parent, e.to_string()))?;
    }
    write_domain_list(path, names)?;
    info!(path = %path.display(), count = names.len(), "saved candidate list");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_digits_in_order() {
        let names = generate_domains(&GenerateConfig::new(2, Charset::Digits, ".li")).unwrap();
        assert_eq!(names.len(), 100);
        assert_eq!(&names[..3], ["00.li", "01.li", "02.li"]);
        assert_eq!(names.last().map(String::as_str), Some("99.li"));
    }

    #[test]
    fn test_letters_and_alphanumeric() {
        let letters = generate_domains(&GenerateConfig::new(1, Charset::Letters, "de")).unwrap();
        assert_eq!(letters.len(), 26);
        assert_eq!(letters[0], "a.de");

        let alnum =
            generate_domains(&GenerateConfig::new(2, Charset::Alphanumeric, ".li")).unwrap();
        assert_eq!(alnum.len(), 36 * 36);
        assert_eq!(alnum[35], "a9.li");
        assert_eq!(alnum[36], "ba.li");
    }

    #[test]
    fn test_filter_modes() {
        let full = GenerateConfig::new(2, Charset::Digits, ".li").with_filter(r"7\.li$", FilterMode::Full);
        assert_eq!(generate_domains(&full).unwrap().len(), 10);

        let prefix =
            GenerateConfig::new(2, Charset::Digits, ".li").with_filter(r"^1", FilterMode::Prefix);
        let names = generate_domains(&prefix).unwrap();
        assert_eq!(names.len(), 10);
        assert!(names.iter().all(|n| n.starts_with('1')));

        // `.li` only exists in the full domain
        let suffix_only =
            GenerateConfig::new(2, Charset::Digits, ".li").with_filter(r"li", FilterMode::Prefix);
        assert!(generate_domains(&suffix_only).unwrap().is_empty());
    }

    #[test]
    fn test_shape_filter() {
        let config = GenerateConfig::new(4, Charset::Digits, ".de").with_shape("abab");
        let names = generate_domains(&config).unwrap();
        assert_eq!(names.len(), 10 * 9);
        assert!(names.contains(&"1212.de".to_string()));
        assert!(!names.contains(&"1111.de".to_string()));
    }

    #[test]
    fn test_invalid_configs() {
        let zero = GenerateConfig::new(0, Charset::Digits, ".li");
        assert!(matches!(generate_domains(&zero), Err(PatternError::ConfigError { .. })));

        let huge = GenerateConfig::new(6, Charset::Alphanumeric, ".li");
        assert!(matches!(generate_domains(&huge), Err(PatternError::ConfigError { .. })));

        let bad_regex =
            GenerateConfig::new(1, Charset::Digits, ".li").with_filter("(", FilterMode::Full);
        assert!(generate_domains(&bad_regex).is_err());

        let long_regex = GenerateConfig::new(1, Charset::Digits, ".li")
            .with_filter("a".repeat(MAX_FILTER_LEN + 1), FilterMode::Full);
        assert!(generate_domains(&long_regex).is_err());
    }

    #[test]
    fn test_estimate_count_saturates() {
        assert_eq!(estimate_count(3, Charset::Letters), 26 * 26 * 26);
        assert_eq!(estimate_count(100, Charset::Alphanumeric), usize::MAX);
    }

    #[test]
    fn test_parse_charset_and_mode() {
        assert_eq!("d".parse::<Charset>().unwrap(), Charset::Digits);
        assert_eq!("D".parse::<Charset>().unwrap(), Charset::Letters);
        assert_eq!("alnum".parse::<Charset>().unwrap(), Charset::Alphanumeric);
        assert!("x".parse::<Charset>().is_err());
        assert_eq!("Prefix".parse::<FilterMode>().unwrap(), FilterMode::Prefix);
        assert!("partial".parse::<FilterMode>().is_err());
    }

    #[test]
    fn test_normalize_suffix() {
        assert_eq!(normalize_suffix("li"), ".li");
        assert_eq!(normalize_suffix(".de"), ".de");
        assert_eq!(normalize_suffix("  "), "");
    }

    #[test]
    fn test_save_candidates_creates_parent() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("lists").join("candidates.txt");
        let names = generate_domains(&GenerateConfig::new(1, Charset::Digits, ".li")).unwrap();

        save_candidates(&path, &names).unwrap();
        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 10);
        assert!(content.starts_with("0.li\n1.li\n"));
    }
}
