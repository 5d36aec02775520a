//! Writing pattern groups to disk, one file per pattern.

use crate::bucket::PatternGroups;
use crate::error::PatternError;
use crate::types::ClassificationSummary;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Extension of every output file.
pub const OUTPUT_EXTENSION: &str = "txt";

/// Path of the output file for `pattern` inside `destination`.
pub fn output_path(destination: &Path, pattern: &str) -> PathBuf {
    destination.join(format!("{}.{}", pattern, OUTPUT_EXTENSION))
}

/// Write every non-empty group to `<destination>/<PATTERN>.txt`.
///
/// The destination is created if needed. Existing files with the same name
/// are overwritten. A write failure stops the run; files written before it
/// stay in place.
pub fn persist(
    groups: &PatternGroups,
    destination: &Path,
) -> crate::Result<ClassificationSummary> {
    fs::create_dir_all(destination)
        .map_err(|e| PatternError::directory_creation(destination, e.to_string()))?;

    for (pattern, domains) in groups.iter() {
        if domains.is_empty() {
            continue;
        }
        let path = output_path(destination, pattern);
        let mut sorted = domains.to_vec();
        sorted.sort();
        write_domain_list(&path, &sorted)?;
        debug!(pattern, count = sorted.len(), path = %path.display(), "wrote pattern file");
    }

    let mut summary = groups.summary();
    summary.output_dir = Some(destination.to_path_buf());

    info!(
        total = summary.total_domains,
        patterns = summary.distinct_patterns(),
        dir = %destination.display(),
        "classification persisted"
    );
    Ok(summary)
}

/// Write `domains` to `path`, one per line, each line newline-terminated.
///
/// The parent directory must exist. Any failure is a `WriteError`.
pub fn write_domain_list(path: &Path, domains: &[String]) -> crate::Result<()> {
    let mut content = String::new();
    for domain in domains {
        content.push_str(domain);
        content.push('\n');
    }

    let mut file =
        fs::File::create(path).map_err(|e| PatternError::write_error(path, e.to_string()))?;
    file.write_all(content.as_bytes())
        .map_err(|e| PatternError::write_error(path, e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bucket::classify;
    use tempfile::tempdir;

    #[test]
    fn test_round_trip_four_domains() {
        let dir = tempdir().unwrap();
        let groups = classify(["aaaa.com", "bbbb.net", "abab.io", "baba.org"]);

        let summary = persist(&groups, dir.path()).unwrap();
        assert_eq!(summary.total_domains, 4);
        assert_eq!(summary.distinct_patterns(), 2);
        assert_eq!(summary.output_dir.as_deref(), Some(dir.path()));

        let aaaa = fs::read_to_string(dir.path().join("AAAA.txt")).unwrap();
        let abab = fs::read_to_string(dir.path().join("ABAB.txt")).unwrap();
        assert_eq!(aaaa, "aaaa.com\nbbbb.net\n");
        assert_eq!(abab, "abab.io\nbaba.org\n");

        let files = fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(files, 2);
    }

    #[test]
    fn test_output_sorted_regardless_of_input_order() {
        let dir = tempdir().unwrap();
        let groups = classify(["zz.de", "aa.de", "mm.de"]);
        persist(&groups, dir.path()).unwrap();

        let content = fs::read_to_string(dir.path().join("AA.txt")).unwrap();
        assert_eq!(content, "aa.de\nmm.de\nzz.de\n");
    }

    #[test]
    fn test_creates_nested_destination() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("out").join("special");
        persist(&classify(["ab.li"]), &nested).unwrap();
        assert!(nested.join("AB.txt").is_file());
    }

    #[test]
    fn test_overwrites_existing_unit() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("AB.txt"), "stale.com\nother.com\n").unwrap();

        persist(&classify(["xy.de"]), dir.path()).unwrap();
        let content = fs::read_to_string(dir.path().join("AB.txt")).unwrap();
        assert_eq!(content, "xy.de\n");
    }

    #[test]
    fn test_idempotent_output() {
        let dir = tempdir().unwrap();
        let groups = classify(["lol.de", "mom.de", "dad.de", "xyz.de"]);

        persist(&groups, dir.path()).unwrap();
        let first = fs::read(dir.path().join("ABA.txt")).unwrap();
        persist(&groups, dir.path()).unwrap();
        let second = fs::read(dir.path().join("ABA.txt")).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_destination_collides_with_file() {
        let dir = tempdir().unwrap();
        let blocker = dir.path().join("blocked");
        fs::write(&blocker, "not a directory").unwrap();

        let err = persist(&classify(["ab.de"]), &blocker).unwrap_err();
        assert!(matches!(err, PatternError::DirectoryCreation { .. }));
    }

    #[test]
    fn test_empty_groups_write_nothing() {
        let dir = tempdir().unwrap();
        let target = dir.path().join("empty");
        let summary = persist(&PatternGroups::new(), &target).unwrap();

        assert!(target.is_dir());
        assert_eq!(fs::read_dir(&target).unwrap().count(), 0);
        assert_eq!(summary.total_domains, 0);
        assert_eq!(summary.distinct_patterns(), 0);
    }

    #[test]
    fn test_write_failure_halts_and_keeps_earlier_files() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join("AB.txt")).unwrap();
        let groups = classify(["aa.de", "ab.de", "abc.de"]);

        let err = persist(&groups, dir.path()).unwrap_err();
        match &err {
            PatternError::WriteError { path, .. } => assert!(path.ends_with("AB.txt")),
            other => panic!("expected WriteError, got {:?}", other),
        }
        assert!(!err.is_clean_halt());

        assert_eq!(fs::read_to_string(dir.path().join("AA.txt")).unwrap(), "aa.de\n");
        assert!(!dir.path().join("ABC.txt").exists());
    }

    #[test]
    fn test_write_domain_list() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("list.txt");
        write_domain_list(&path, &["b.li".to_string(), "a.li".to_string()]).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "b.li\na.li\n");

        let missing_parent = dir.path().join("nope").join("list.txt");
        let err = write_domain_list(&missing_parent, &[]).unwrap_err();
        assert!(matches!(err, PatternError::WriteError { .. }));
    }

    #[test]
    fn test_output_path() {
        let path = output_path(Path::new("domain-check"), "ABBA");
        assert_eq!(path, Path::new("domain-check").join("ABBA.txt"));
    }
}
