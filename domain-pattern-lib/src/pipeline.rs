//! Classification entry points.
//!
//! `classify_file` is the whole read → classify → persist pipeline for one
//! domain list. The special-status pass reuses it in-process with its own
//! input list and a `special` subdirectory under the output root.

use crate::bucket::classify;
use crate::error::PatternError;
use crate::input::read_domain_list;
use crate::persist::persist;
use crate::types::ClassificationSummary;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Name of the subdirectory the special-status pass writes into.
pub const SPECIAL_SUBDIR: &str = "special";

/// Parameters of one classification run.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifyConfig {
    /// Domain list, one domain per line
    pub input_path: PathBuf,
    /// Directory receiving one `<PATTERN>.txt` per pattern
    pub output_dir: PathBuf,
}

impl ClassifyConfig {
    pub fn new<I: Into<PathBuf>, O: Into<PathBuf>>(input_path: I, output_dir: O) -> Self {
        Self {
            input_path: input_path.into(),
            output_dir: output_dir.into(),
        }
    }
}

/// Read, classify and persist one domain list.
///
/// The input is checked before the output directory is touched, so a
/// missing list leaves the filesystem unchanged.
pub fn classify_file(config: &ClassifyConfig) -> crate::Result<ClassificationSummary> {
    let domains = read_domain_list(&config.input_path)?;
    info!(
        input = %config.input_path.display(),
        count = domains.len(),
        "classifying domains"
    );

    let groups = classify(&domains);
    persist(&groups, &config.output_dir)
}

/// Parameters of the special-status pass.
#[derive(Debug, Clone, PartialEq)]
pub struct SpecialPassConfig {
    /// Special-status domain list
    pub input_path: PathBuf,
    /// Root output directory; files land in `<output_root>/special`
    pub output_root: PathBuf,
}

impl SpecialPassConfig {
    pub fn new<I: Into<PathBuf>, O: Into<PathBuf>>(input_path: I, output_root: O) -> Self {
        Self {
            input_path: input_path.into(),
            output_root: output_root.into(),
        }
    }

    /// Directory the pass writes into.
    pub fn output_dir(&self) -> PathBuf {
        special_dir(&self.output_root)
    }

    /// Equivalent primary-classifier parameters.
    pub fn to_classify_config(&self) -> ClassifyConfig {
        ClassifyConfig::new(self.input_path.clone(), self.output_dir())
    }
}

/// `<root>/special`
pub fn special_dir(root: &Path) -> PathBuf {
    root.join(SPECIAL_SUBDIR)
}

/// Outcome of the special-status pass.
///
/// Failures are captured here instead of being propagated: the pass reports
/// them and the caller carries on.
#[derive(Debug, Clone)]
pub enum SpecialPassOutcome {
    Completed(ClassificationSummary),
    Failed(PatternError),
}

impl SpecialPassOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Completed(_))
    }
}

/// Run the classifier over the special-status list.
pub fn run_special_pass(config: &SpecialPassConfig) -> SpecialPassOutcome {
    match classify_file(&config.to_classify_config()) {
        Ok(summary) => SpecialPassOutcome::Completed(summary),
        Err(e) => {
            warn!(error = %e, "special-status pass failed");
            SpecialPassOutcome::Failed(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_classify_file_end_to_end() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("domains.txt");
        fs::write(&input, "aaaa.com\n\nbbbb.net\nabab.io\nbaba.org\n").unwrap();
        let output = dir.path().join("out");

        let summary = classify_file(&ClassifyConfig::new(&input, &output)).unwrap();
        assert_eq!(summary.total_domains, 4);
        assert_eq!(summary.pattern_counts.get("AAAA"), Some(&2));
        assert_eq!(summary.pattern_counts.get("ABAB"), Some(&2));
        assert!(output.join("AAAA.txt").is_file());
    }

    #[test]
    fn test_missing_input_creates_nothing() {
        let dir = tempdir().unwrap();
        let output = dir.path().join("never-created");
        let config = ClassifyConfig::new(dir.path().join("missing.txt"), &output);

        let err = classify_file(&config).unwrap_err();
        assert!(matches!(err, PatternError::InputNotFound { .. }));
        assert!(!output.exists());
    }

    #[test]
    fn test_special_output_dir() {
        let config = SpecialPassConfig::new("special.txt", "domain-check");
        assert_eq!(
            config.output_dir(),
            Path::new("domain-check").join("special")
        );
        assert_eq!(
            config.to_classify_config(),
            ClassifyConfig::new("special.txt", Path::new("domain-check").join("special"))
        );
    }

    #[test]
    fn test_special_pass_writes_into_subdir() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("special.txt");
        fs::write(&input, "xx.de\nyz.de\n").unwrap();

        let outcome = run_special_pass(&SpecialPassConfig::new(&input, dir.path()));
        assert!(outcome.is_success());
        assert!(dir.path().join("special").join("AA.txt").is_file());
        assert!(dir.path().join("special").join("AB.txt").is_file());
        assert!(!dir.path().join("AA.txt").exists());
    }

    #[test]
    fn test_special_pass_captures_failure() {
        let dir = tempdir().unwrap();
        let outcome = run_special_pass(&SpecialPassConfig::new(
            dir.path().join("missing.txt"),
            dir.path(),
        ));
        match outcome {
            SpecialPassOutcome::Failed(PatternError::InputNotFound { .. }) => {}
            other => panic!("unexpected outcome: {:?}", other),
        }
    }
}
