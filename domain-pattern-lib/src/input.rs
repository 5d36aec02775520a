//! Reading domain lists from disk.

use crate::error::PatternError;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::debug;

/// Read a domain list: one domain per line, surrounding whitespace trimmed,
/// blank lines dropped.
///
/// A missing file is reported as [`PatternError::InputNotFound`] before any
/// other work happens.
pub fn read_domain_list(path: &Path) -> crate::Result<Vec<String>> {
    if !path.exists() {
        return Err(PatternError::input_not_found(path));
    }

    let file = File::open(path).map_err(|e| PatternError::file_error(path, e.to_string()))?;
    let reader = BufReader::new(file);
    let mut domains = Vec::new();

    for (index, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| {
            PatternError::file_error(path, format!("line {}: {}", index + 1, e))
        })?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        domains.push(trimmed.to_string());
    }

    debug!(path = %path.display(), count = domains.len(), "read domain list");
    Ok(domains)
}
