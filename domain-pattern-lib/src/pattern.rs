//! Character-repetition pattern derivation.
//!
//! A pattern describes which positions of a domain label hold equal
//! characters, independent of the characters themselves. Symbols are
//! assigned in first-seen order, so `abab.io` and `xyxy.net` both map
//! to `ABAB`.
//!
//! # Examples
//!
//! ```
//! use domain_pattern_lib::derive_pattern;
//!
//! assert_eq!(derive_pattern("abab.io").to_string(), "ABAB");
//! assert_eq!(derive_pattern("Hello.com").to_string(), "ABCCD");
//! assert_eq!(derive_pattern("").to_string(), "");
//! ```

use std::collections::HashMap;
use std::fmt;

/// Number of symbols that render as a single letter.
const LETTER_COUNT: u32 = 26;

/// Separator used between symbol tokens once a label exceeds 26 distinct characters.
pub const WIDE_SEPARATOR: char = '-';

/// Canonical shape of a domain label.
///
/// Symbols are stored as integers (`0` is the first distinct character,
/// `1` the second, and so on). Equality compares the symbol sequence, so two
/// patterns are equal exactly when their labels share the same
/// character-equality structure.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Pattern {
    symbols: Vec<u32>,
}

impl Pattern {
    /// Symbol sequence, one entry per label character.
    pub fn symbols(&self) -> &[u32] {
        &self.symbols
    }

    /// Number of positions (equals the label length in characters).
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Number of distinct characters in the label.
    pub fn distinct_symbols(&self) -> usize {
        self.symbols
            .iter()
            .max()
            .map(|max| *max as usize + 1)
            .unwrap_or(0)
    }

    /// Whether the rendering uses separated multi-letter tokens.
    pub fn is_wide(&self) -> bool {
        self.distinct_symbols() > LETTER_COUNT as usize
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_wide() {
            let tokens: Vec<String> = self.symbols.iter().map(|s| symbol_token(*s)).collect();
            let separator = WIDE_SEPARATOR.to_string();
            write!(f, "{}", tokens.join(&separator))
        } else {
            for symbol in &self.symbols {
                write!(f, "{}", symbol_token(*symbol))?;
            }
            Ok(())
        }
    }
}

/// Render a symbol as a bijective base-26 token: `A`..`Z`, `AA`, `AB`, ...
fn symbol_token(symbol: u32) -> String {
    let mut n = symbol;
    let mut letters = Vec::new();
    loop {
        letters.push((b'A' + (n % LETTER_COUNT) as u8) as char);
        if n < LETTER_COUNT {
            break;
        }
        n = n / LETTER_COUNT - 1;
    }
    letters.iter().rev().collect()
}

/// Extract the case-folded label (the part before the first `.`).
///
/// The whole string is used when it contains no dot.
pub fn extract_label(domain: &str) -> String {
    let label = match domain.split_once('.') {
        Some((label, _)) => label,
        None => domain,
    };
    label.to_lowercase()
}

/// Derive the repetition pattern of a domain's label.
///
/// Total over all inputs: the empty string yields the empty pattern.
pub fn derive_pattern(domain: &str) -> Pattern {
    let label = extract_label(domain);
    let mut assigned: HashMap<char, u32> = HashMap::new();
    let mut symbols = Vec::with_capacity(label.len());

    for c in label.chars() {
        let next = assigned.len() as u32;
        symbols.push(*assigned.entry(c).or_insert(next));
    }

    Pattern { symbols }
}
